//! RSVP CLI - sign in to RSVP and manage the local session
//!
//! Builds one session manager per invocation and hands it to the command
//! that needs it.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use rsvp_core::config::{API_URL_ENV, DB_PATH_ENV, TIMEOUT_ENV};
use rsvp_core::AuthConfig;

#[derive(Parser)]
#[command(name = "rsvp")]
#[command(author, version, about = "Campus event discovery - account and session CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Auth service base URL (or set RSVP_API_URL env var)
    #[arg(long, env = API_URL_ENV, global = true)]
    api_url: Option<String>,

    /// Override client storage path (or set RSVP_DB_PATH env var)
    #[arg(long, env = DB_PATH_ENV, global = true)]
    db: Option<String>,

    /// Request timeout in seconds (or set RSVP_HTTP_TIMEOUT_SECS env var)
    #[arg(long, env = TIMEOUT_ENV, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password (or set RSVP_PASSWORD env var)
        #[arg(long, env = "RSVP_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Create an account and sign in
    Register(commands::auth::RegisterArgs),

    /// Show the signed-in user
    Whoami,

    /// Re-check the stored session with the auth service
    Refresh,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = resolve_config(&cli, |key| std::env::var(key).ok())?;

    let ctx = commands::Context {
        config,
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Config { action } => commands::config::execute(&ctx, action).await,
        Commands::Login { email, password } => {
            let session = ctx.open_session().await?;
            commands::auth::login(&ctx, &session, &email, &password).await
        }
        Commands::Logout => {
            let session = ctx.open_session().await?;
            commands::auth::logout(&ctx, &session).await
        }
        Commands::Register(args) => {
            let session = ctx.open_session().await?;
            commands::auth::register(&ctx, &session, args).await
        }
        Commands::Whoami => {
            let session = ctx.open_session().await?;
            commands::auth::whoami(&ctx, &session).await
        }
        Commands::Refresh => {
            let session = ctx.open_session().await?;
            commands::auth::refresh(&ctx, &session).await
        }
    }
}

/// Flags win over the environment. A flag value is consulted before any
/// default is computed, so `--db` works even without a resolvable data dir.
fn resolve_config<F>(cli: &Cli, env: F) -> rsvp_core::Result<AuthConfig>
where
    F: Fn(&str) -> Option<String>,
{
    AuthConfig::from_lookup(|key| {
        let flag = match key {
            API_URL_ENV => cli.api_url.clone(),
            DB_PATH_ENV => cli.db.clone(),
            TIMEOUT_ENV => cli.timeout.map(|secs| secs.to_string()),
            _ => None,
        };
        flag.or_else(|| env(key))
    })
}
