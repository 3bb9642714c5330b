//! Config commands
//!
//! Show the effective client configuration. Never touches the network.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{print_rows, OutputFormat};
use rsvp_core::config::{API_URL_ENV, DB_PATH_ENV, TIMEOUT_ENV};
use rsvp_core::AuthConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
}

/// Config row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

pub async fn execute(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(ctx),
        ConfigAction::Get { key } => get_config(ctx, &key),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    print_rows(&config_rows(ctx), ctx.format)
}

fn get_config(ctx: &Context, key: &str) -> Result<()> {
    let rows = config_rows(ctx);

    match rows.iter().find(|r| r.key.eq_ignore_ascii_case(key)) {
        Some(row) if ctx.format == OutputFormat::Json => print_rows(std::slice::from_ref(row), ctx.format),
        Some(row) => {
            println!("{} = {}", row.key, row.value);
            Ok(())
        }
        None => {
            let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
            anyhow::bail!("Config key not found: {} (available: {})", key, keys.join(", "))
        }
    }
}

fn config_rows(ctx: &Context) -> Vec<ConfigRow> {
    // Values the environment alone would produce; anything else came from a flag
    let from_env = AuthConfig::from_env().ok();
    let source = |key: &str, matches_env: bool| -> String {
        let label = if !matches_env {
            "flag"
        } else if std::env::var(key).is_ok() {
            "env"
        } else {
            "default"
        };
        label.to_string()
    };

    vec![
        ConfigRow {
            key: API_URL_ENV.to_string(),
            value: ctx.config.base_url.clone(),
            source: source(
                API_URL_ENV,
                from_env.as_ref().map_or(true, |c| c.base_url == ctx.config.base_url),
            ),
        },
        ConfigRow {
            key: DB_PATH_ENV.to_string(),
            value: ctx.config.db_path.to_string_lossy().to_string(),
            source: source(
                DB_PATH_ENV,
                from_env.as_ref().map_or(true, |c| c.db_path == ctx.config.db_path),
            ),
        },
        ConfigRow {
            key: TIMEOUT_ENV.to_string(),
            value: ctx.config.timeout.as_secs().to_string(),
            source: source(
                TIMEOUT_ENV,
                from_env.as_ref().map_or(true, |c| c.timeout == ctx.config.timeout),
            ),
        },
    ]
}
