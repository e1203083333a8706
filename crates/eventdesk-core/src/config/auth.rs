//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted access token lifetime: seven days.
pub const MAX_ACCESS_TOKEN_TTL_MINUTES: u64 = 7 * 24 * 60;

/// Longest accepted refresh token lifetime: ten years.
pub const MAX_REFRESH_TOKEN_TTL_DAYS: u64 = 3_650;

/// Token signing, lifetime, and credential-store settings.
///
/// Access and refresh tokens are signed with independent secrets so that
/// leaking one does not allow forging the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret for access tokens.
    #[serde(default = "default_access_secret")]
    pub access_token_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: u64,
    /// HMAC-SHA256 secret for refresh tokens.
    #[serde(default = "default_refresh_secret")]
    pub refresh_token_secret: String,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_days: u64,
    /// Clock-skew leeway applied when checking `exp`, in seconds.
    #[serde(default)]
    pub token_leeway_seconds: u64,
    /// Role assigned on signup when none is requested.
    #[serde(default = "default_role")]
    pub default_role: String,
    /// Argon2id cost parameters.
    #[serde(default)]
    pub password_hash: PasswordHashConfig,
    /// Upper bound for a single credential-store call, in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

/// Argon2id cost factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordHashConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl AuthConfig {
    /// Checks the invariants that must hold before any token is issued.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.access_token_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.access_token_secret is empty"));
        }
        if self.refresh_token_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.refresh_token_secret is empty"));
        }
        if self.access_token_secret == self.refresh_token_secret {
            return Err(AppError::configuration(
                "auth.access_token_secret and auth.refresh_token_secret must differ",
            ));
        }
        if !(1..=MAX_ACCESS_TOKEN_TTL_MINUTES).contains(&self.access_token_ttl_minutes) {
            return Err(AppError::configuration(format!(
                "auth.access_token_ttl_minutes must be between 1 and {MAX_ACCESS_TOKEN_TTL_MINUTES}"
            )));
        }
        if !(1..=MAX_REFRESH_TOKEN_TTL_DAYS).contains(&self.refresh_token_ttl_days) {
            return Err(AppError::configuration(format!(
                "auth.refresh_token_ttl_days must be between 1 and {MAX_REFRESH_TOKEN_TTL_DAYS}"
            )));
        }
        if self.store_timeout_ms == 0 {
            return Err(AppError::configuration(
                "auth.store_timeout_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: default_access_secret(),
            access_token_ttl_minutes: default_access_ttl(),
            refresh_token_secret: default_refresh_secret(),
            refresh_token_ttl_days: default_refresh_ttl(),
            token_leeway_seconds: 0,
            default_role: default_role(),
            password_hash: PasswordHashConfig::default(),
            store_timeout_ms: default_store_timeout(),
        }
    }
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_access_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

fn default_refresh_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_role() -> String {
    "planner".to_string()
}

fn default_memory_kib() -> u32 {
    19_456
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

fn default_store_timeout() -> u64 {
    5_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AuthConfig::default().validate().is_ok());
    }

    #[test]
    fn test_shared_secret_rejected() {
        let config = AuthConfig {
            refresh_token_secret: "same".to_string(),
            access_token_secret: "same".to_string(),
            ..AuthConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = AuthConfig {
            access_token_ttl_minutes: 0,
            ..AuthConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_ttl_rejected() {
        for config in [
            AuthConfig {
                access_token_ttl_minutes: MAX_ACCESS_TOKEN_TTL_MINUTES + 1,
                ..AuthConfig::default()
            },
            AuthConfig {
                refresh_token_ttl_days: 1 << 60,
                ..AuthConfig::default()
            },
            AuthConfig {
                refresh_token_ttl_days: u64::MAX,
                ..AuthConfig::default()
            },
        ] {
            let err = config.validate().unwrap_err();
            assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
        }

        let config = AuthConfig {
            access_token_ttl_minutes: MAX_ACCESS_TOKEN_TTL_MINUTES,
            refresh_token_ttl_days: MAX_REFRESH_TOKEN_TTL_DAYS,
            ..AuthConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
