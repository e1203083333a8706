//! User account management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use eventdesk_core::config::AppConfig;
use eventdesk_core::error::AppError;
use eventdesk_entity::user::User;

use crate::output::{self, OutputFormat};

use super::Context;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Show a user's profile
    Show {
        /// Email
        email: String,
    },
    /// Allow a user to log in again
    Activate {
        /// Email
        email: String,
    },
    /// Block a user from logging in and end their sessions
    Deactivate {
        /// Email
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    email: String,
    full_name: String,
    role: String,
    active: bool,
    verified: bool,
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email.clone(),
            full_name: u.full_name.clone(),
            role: u.role.to_string(),
            active: u.is_active,
            verified: u.email_verified,
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = Context::connect(config).await?;

    match &args.command {
        UserCommand::Show { email } => {
            let user = ctx.accounts.by_email(email).await?;
            output::print_item(&UserRow::from(&user), format);
        }
        UserCommand::Activate { email } => {
            let user = ctx.accounts.by_email(email).await?;
            ctx.accounts.set_active(&user, true).await?;
            tracing::info!(user_id = %user.id, "User activated");
            output::print_success(&format!("User '{}' activated", user.email));
        }
        UserCommand::Deactivate { email } => {
            let user = ctx.accounts.by_email(email).await?;
            ctx.accounts.set_active(&user, false).await?;
            let revoked = ctx.sessions.logout_all(user.id).await?;
            tracing::info!(user_id = %user.id, revoked, "User deactivated");
            output::print_success(&format!(
                "User '{}' deactivated ({revoked} session(s) revoked)",
                user.email
            ));
        }
    }

    ctx.pool.close().await;
    Ok(())
}
