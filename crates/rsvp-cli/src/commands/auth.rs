//! Session commands
//!
//! login, logout, register, whoami and refresh. Each takes the session built
//! by `main` explicitly.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{print_rows, print_status, print_warning};
use rsvp_core::{Error, RegistrationData, SessionManager, SessionStatus, User};

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// First name
    #[arg(long)]
    pub first_name: String,

    /// Last name
    #[arg(long)]
    pub last_name: String,

    /// College email
    #[arg(long)]
    pub email: String,

    /// Account password (or set RSVP_PASSWORD env var)
    #[arg(long, env = "RSVP_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Campus identifier, e.g. iit-delhi
    #[arg(long)]
    pub campus: Option<String>,

    /// Year of study, e.g. "2nd Year"
    #[arg(long)]
    pub year: Option<String>,

    /// Field of study
    #[arg(long)]
    pub major: Option<String>,

    /// Interest tag (repeatable)
    #[arg(long = "interest")]
    pub interests: Vec<String>,

    /// Accept the terms of service
    #[arg(long)]
    pub agree_to_terms: bool,
}

impl From<RegisterArgs> for RegistrationData {
    fn from(args: RegisterArgs) -> Self {
        RegistrationData {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            password: args.password,
            campus_id: args.campus,
            year: args.year,
            major: args.major,
            interests: args.interests,
            agree_to_terms: args.agree_to_terms,
        }
    }
}

/// Session row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct SessionRow {
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "User ID")]
    pub user_id: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Role")]
    pub role: String,
    #[tabled(rename = "Campus")]
    pub campus: String,
    #[tabled(rename = "Verified")]
    pub verified: String,
}

impl SessionRow {
    fn new(status: SessionStatus, user: Option<&User>) -> Self {
        match user {
            Some(user) => Self {
                status: status.to_string(),
                user_id: user.id.clone(),
                email: user.email.clone(),
                name: user.display_name().to_string(),
                role: user.role.to_string(),
                campus: user.campus_id.clone().unwrap_or_else(|| "-".to_string()),
                verified: if user.is_verified { "yes" } else { "no" }.to_string(),
            },
            None => Self {
                status: status.to_string(),
                user_id: "-".to_string(),
                email: "-".to_string(),
                name: "-".to_string(),
                role: "-".to_string(),
                campus: "-".to_string(),
                verified: "-".to_string(),
            },
        }
    }

    fn from_session(session: &SessionManager) -> Self {
        let state = session.state();
        Self::new(state.status(), state.current_user.as_ref())
    }
}

/// Point at the configured base URL when the service could not be reached
fn hint_if_unreachable(ctx: &Context, err: &Error) {
    if err.is_transport() {
        print_warning(
            &format!("Could not reach the auth service at {} (see --api-url)", ctx.config.base_url),
            ctx.quiet,
        );
    }
}

fn print_session(ctx: &Context, session: &SessionManager) -> Result<()> {
    print_rows(&[SessionRow::from_session(session)], ctx.format)
}

pub async fn login(ctx: &Context, session: &SessionManager, email: &str, password: &str) -> Result<()> {
    let user = session.login(email, password).await.inspect_err(|e| hint_if_unreachable(ctx, e))?;
    print_status(session.status(), &format!("Signed in as {}", user.display_name()), ctx.quiet);
    print_session(ctx, session)
}

pub async fn logout(ctx: &Context, session: &SessionManager) -> Result<()> {
    let was_signed_in = session.is_authenticated();
    session.logout().await;

    let message = if was_signed_in { "Signed out" } else { "No active session" };
    print_status(session.status(), message, ctx.quiet);
    Ok(())
}

pub async fn register(ctx: &Context, session: &SessionManager, args: RegisterArgs) -> Result<()> {
    if !args.agree_to_terms {
        print_warning("Registering without --agree-to-terms; the service may reject the request", ctx.quiet);
    }

    let data = RegistrationData::from(args);
    let user = session.register(&data).await.inspect_err(|e| hint_if_unreachable(ctx, e))?;
    print_status(
        session.status(),
        &format!("Welcome, {}! Your account is ready.", user.display_name()),
        ctx.quiet,
    );
    print_session(ctx, session)
}

pub async fn whoami(ctx: &Context, session: &SessionManager) -> Result<()> {
    if !session.is_authenticated() {
        print_status(session.status(), "Not signed in", ctx.quiet);
    }
    print_session(ctx, session)
}

pub async fn refresh(ctx: &Context, session: &SessionManager) -> Result<()> {
    let was_signed_in = session.is_authenticated();
    session.refresh().await;

    match (was_signed_in, session.is_authenticated()) {
        (_, true) => print_status(session.status(), "Session is valid", ctx.quiet),
        (true, false) => print_warning("Session expired; please sign in again", ctx.quiet),
        (false, false) => print_status(session.status(), "Not signed in", ctx.quiet),
    }
    print_session(ctx, session)
}
