//! Refresh-token inspection and revocation commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use eventdesk_auth::TokenCleanup;
use eventdesk_core::config::AppConfig;
use eventdesk_core::error::AppError;
use eventdesk_entity::token::RefreshTokenRecord;

use crate::output::{self, OutputFormat};

use super::{Context, confirm};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokensArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokensCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokensCommand {
    /// List a user's refresh tokens, newest first
    List {
        /// Email
        email: String,
    },
    /// Revoke every refresh token of a user
    Revoke {
        /// Email
        email: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// Delete expired refresh-token records
    Purge,
}

/// Refresh-token display row. The digest is shortened; raw tokens are never stored.
#[derive(Debug, Serialize, Tabled)]
struct TokenRow {
    token_id: String,
    digest: String,
    issued_at: String,
    expires_at: String,
    revoked: bool,
}

impl From<&RefreshTokenRecord> for TokenRow {
    fn from(r: &RefreshTokenRecord) -> Self {
        Self {
            token_id: r.token_id.to_string(),
            digest: r.token_hash.chars().take(12).collect(),
            issued_at: r.issued_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            expires_at: r.expires_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            revoked: r.revoked,
        }
    }
}

/// Execute token commands
pub async fn execute(
    args: &TokensArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = Context::connect(config).await?;
    let store = ctx.sessions.token_store();

    match &args.command {
        TokensCommand::List { email } => {
            let user = ctx.accounts.by_email(email).await?;
            let records = store.list_for_user(user.id).await?;
            let rows: Vec<TokenRow> = records.iter().map(TokenRow::from).collect();
            output::print_list(&rows, format);
        }
        TokensCommand::Revoke { email, force } => {
            let user = ctx.accounts.by_email(email).await?;
            if !confirm(
                *force,
                &format!("Revoke every session of '{}'?", user.email),
            )? {
                println!("Cancelled.");
            } else {
                let revoked = ctx.sessions.logout_all(user.id).await?;
                output::print_success(&format!("Revoked {revoked} refresh token(s)"));
            }
        }
        TokensCommand::Purge => {
            let removed = TokenCleanup::new(store.clone()).run_cleanup().await?;
            output::print_success(&format!("Purged {removed} expired refresh token(s)"));
        }
    }

    ctx.pool.close().await;
    Ok(())
}
