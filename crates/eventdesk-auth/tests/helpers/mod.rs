//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use eventdesk_auth::SessionManager;
use eventdesk_auth::session::{AuthSession, LoginRequest, SignupRequest};
use eventdesk_core::config::{AuthConfig, PasswordHashConfig};
use eventdesk_database::MemoryCredentialStore;
use eventdesk_database::repositories::UserRepository;
use eventdesk_entity::user::UserRole;

/// Test application context
pub struct TestApp {
    /// Session manager under test
    pub manager: SessionManager,
    /// Backing store, for direct inspection
    pub store: MemoryCredentialStore,
}

/// Auth configuration with a cheap hash cost.
pub fn test_config() -> AuthConfig {
    AuthConfig {
        access_token_secret: "integration-access-secret".to_string(),
        refresh_token_secret: "integration-refresh-secret".to_string(),
        password_hash: PasswordHashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        ..AuthConfig::default()
    }
}

impl TestApp {
    /// Create a new test application over an empty memory store
    pub fn new() -> Self {
        Self::with_config(&test_config())
    }

    /// Create a test application with a custom configuration
    pub fn with_config(config: &AuthConfig) -> Self {
        let store = MemoryCredentialStore::new();
        let manager =
            SessionManager::new(config, Arc::new(store.clone()), Arc::new(store.clone()))
                .expect("Failed to build session manager");
        Self { manager, store }
    }

    /// Sign up a user with the default role
    pub async fn signup(&self, email: &str, password: &str) -> AuthSession {
        self.manager
            .signup(SignupRequest {
                email: email.to_string(),
                password: password.to_string(),
                full_name: "Test User".to_string(),
                role: None,
                phone_number: None,
            })
            .await
            .expect("Signup failed")
    }

    /// Sign up a user with an explicit role
    pub async fn signup_as(&self, email: &str, password: &str, role: UserRole) -> AuthSession {
        self.manager
            .signup(SignupRequest {
                email: email.to_string(),
                password: password.to_string(),
                full_name: "Test User".to_string(),
                role: Some(role),
                phone_number: None,
            })
            .await
            .expect("Signup failed")
    }

    /// Log in and return the session
    pub async fn login(&self, email: &str, password: &str) -> AuthSession {
        self.manager
            .login(login_request(email, password))
            .await
            .expect("Login failed")
    }

    /// Deactivate a user directly in the store
    pub async fn deactivate(&self, email: &str) {
        let user = self
            .store
            .find_by_email(email)
            .await
            .unwrap()
            .expect("User not found");
        assert!(self.store.set_active(user.id, false).await.unwrap());
    }
}

/// Build a login request
pub fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}
