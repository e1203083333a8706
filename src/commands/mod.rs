//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod tokens;
pub mod user;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use eventdesk_auth::SessionManager;
use eventdesk_core::config::AppConfig;
use eventdesk_core::error::AppError;
use eventdesk_database::repositories::UserRepository;
use eventdesk_database::{DatabasePool, with_timeout};
use eventdesk_entity::user::{NewUser, User};

use crate::output::OutputFormat;

/// EventDesk: accounts and sessions administration
#[derive(Debug, Parser)]
#[command(name = "eventdesk", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Admin account bootstrap
    Admin(admin::AdminArgs),
    /// User account management
    User(user::UserArgs),
    /// Refresh-token inspection and revocation
    Tokens(tokens::TokensArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, config).await,
            Commands::Admin(args) => admin::execute(args, config, self.format).await,
            Commands::User(args) => user::execute(args, config, self.format).await,
            Commands::Tokens(args) => tokens::execute(args, config, self.format).await,
        }
    }
}

/// Stores and session manager backed by PostgreSQL.
pub struct Context {
    pub pool: DatabasePool,
    pub accounts: Accounts,
    pub sessions: SessionManager,
}

impl Context {
    /// Connect to the database and build the session manager.
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let pool = DatabasePool::connect(&config.database).await?;
        let users = pool.user_repository();
        let sessions = SessionManager::new(&config.auth, users.clone(), pool.token_repository())?;
        let accounts = Accounts::new(
            users,
            Duration::from_millis(config.auth.store_timeout_ms),
        );

        Ok(Self {
            pool,
            accounts,
            sessions,
        })
    }
}

/// Direct user-store access for the admin commands, bounded like the
/// session manager's own calls.
#[derive(Clone)]
pub struct Accounts {
    users: Arc<dyn UserRepository>,
    store_timeout: Duration,
}

impl Accounts {
    /// Wraps `users`; every call is bounded by `store_timeout`.
    pub fn new(users: Arc<dyn UserRepository>, store_timeout: Duration) -> Self {
        Self {
            users,
            store_timeout,
        }
    }

    /// Look up a user by email, failing with `NotFound`.
    pub async fn by_email(&self, email: &str) -> Result<User, AppError> {
        let email = User::normalize_email(email);
        with_timeout(
            self.store_timeout,
            "user.find_by_email",
            self.users.find_by_email(&email),
        )
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))
    }

    /// Set the active flag, failing with `NotFound` if no row changed.
    pub async fn set_active(&self, user: &User, active: bool) -> Result<(), AppError> {
        let updated = with_timeout(
            self.store_timeout,
            "user.set_active",
            self.users.set_active(user.id, active),
        )
        .await?;

        if !updated {
            return Err(AppError::not_found(format!(
                "User '{}' no longer exists",
                user.email
            )));
        }
        Ok(())
    }

    /// Insert a user.
    pub async fn create(&self, data: NewUser) -> Result<User, AppError> {
        with_timeout(self.store_timeout, "user.create", self.users.create(data)).await
    }
}

/// Helper: read a value from the flag or prompt for it
pub fn text_or_prompt(value: &Option<String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}

/// Helper: ask for confirmation unless `force` is set
pub fn confirm(force: bool, prompt: &str) -> Result<bool, AppError> {
    if force {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use eventdesk_core::error::ErrorKind;
    use eventdesk_core::result::AppResult;
    use eventdesk_core::types::UserId;
    use eventdesk_database::MemoryCredentialStore;
    use eventdesk_entity::user::{ProfilePatch, UserRole};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            full_name: "Ops Person".to_string(),
            role: UserRole::Admin,
            phone_number: None,
        }
    }

    #[tokio::test]
    async fn test_set_active_on_vanished_user_is_not_found() {
        let store = MemoryCredentialStore::new();
        let accounts = Accounts::new(Arc::new(store), Duration::from_secs(1));
        let ghost = new_user("ghost@x.com").into_user(chrono::Utc::now());

        let err = accounts.set_active(&ghost, false).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_lookup_normalizes_email() {
        let accounts = Accounts::new(
            Arc::new(MemoryCredentialStore::new()),
            Duration::from_secs(1),
        );
        let created = accounts.create(new_user("ops@x.com")).await.unwrap();

        let found = accounts.by_email("  OPS@x.com ").await.unwrap();
        assert_eq!(found.id, created.id);
        accounts.set_active(&found, false).await.unwrap();
        assert!(!accounts.by_email("ops@x.com").await.unwrap().is_active);
    }

    /// User store that never answers.
    #[derive(Debug)]
    struct Unresponsive;

    async fn hang<T>() -> AppResult<T> {
        std::future::pending().await
    }

    #[async_trait]
    impl UserRepository for Unresponsive {
        async fn find_by_id(&self, _id: UserId) -> AppResult<Option<User>> {
            hang().await
        }

        async fn find_by_email(&self, _email: &str) -> AppResult<Option<User>> {
            hang().await
        }

        async fn create(&self, _data: NewUser) -> AppResult<User> {
            hang().await
        }

        async fn update_profile(
            &self,
            _id: UserId,
            _patch: &ProfilePatch,
        ) -> AppResult<Option<User>> {
            hang().await
        }

        async fn update_password(&self, _id: UserId, _password_hash: &str) -> AppResult<bool> {
            hang().await
        }

        async fn set_active(&self, _id: UserId, _active: bool) -> AppResult<bool> {
            hang().await
        }
    }

    #[tokio::test]
    async fn test_unresponsive_store_is_store_unavailable() {
        let accounts = Accounts::new(Arc::new(Unresponsive), Duration::from_millis(20));

        let err = accounts.by_email("ops@x.com").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);

        let err = accounts.create(new_user("ops@x.com")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);

        let user = new_user("ops@x.com").into_user(chrono::Utc::now());
        let err = accounts.set_active(&user, true).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    }
}
