//! Admin account bootstrap.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use eventdesk_core::config::AppConfig;
use eventdesk_core::error::AppError;
use eventdesk_entity::user::{NewUser, User, UserRole};

use crate::output::{self, OutputFormat};

use super::{Context, text_or_prompt};

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create a new admin user
    Create {
        /// Email
        #[arg(short, long)]
        email: Option<String>,
        /// Full name
        #[arg(short = 'n', long)]
        full_name: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Created admin row
#[derive(Debug, Serialize, Tabled)]
struct AdminRow {
    id: String,
    email: String,
    full_name: String,
    role: String,
}

/// Execute admin commands
pub async fn execute(
    args: &AdminArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = Context::connect(config).await?;

    match &args.command {
        AdminCommand::Create {
            email,
            full_name,
            password,
        } => {
            let email = User::normalize_email(&text_or_prompt(email, "Admin email")?);
            let full_name = text_or_prompt(full_name, "Full name")?;

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Admin password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            if email.is_empty() || password.is_empty() || full_name.trim().is_empty() {
                return Err(AppError::validation(
                    "Email, full name and password are required",
                ));
            }

            let password_hash = ctx.sessions.password_hasher().hash_password(&password)?;

            let user = ctx
                .accounts
                .create(NewUser {
                    email,
                    password_hash,
                    full_name: full_name.trim().to_string(),
                    role: UserRole::Admin,
                    phone_number: None,
                })
                .await?;

            tracing::info!(user_id = %user.id, "Admin user created");
            output::print_item(
                &AdminRow {
                    id: user.id.to_string(),
                    email: user.email.clone(),
                    full_name: user.full_name.clone(),
                    role: user.role.to_string(),
                },
                format,
            );
            output::print_success("Admin user created");
        }
    }

    ctx.pool.close().await;
    Ok(())
}
