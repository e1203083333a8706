//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use eventdesk_core::config::PasswordHashConfig;
use eventdesk_core::error::AppError;
use eventdesk_core::result::AppResult;

/// Plaintext behind the decoy hash. It is never a real user's hash.
const DECOY_PASSWORD: &str = "eventdesk-decoy-credential";

/// Hashes and verifies passwords with Argon2id at a configured cost.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    /// Hash at the configured cost, verified against when there is no real
    /// hash to check.
    decoy_hash: String,
}

impl PasswordHasher {
    /// Creates a hasher from the configured cost factor.
    pub fn new(config: &PasswordHashConfig) -> AppResult<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| {
                AppError::configuration(format!("Invalid auth.password_hash parameters: {e}"))
            })?;
        let mut hasher = Self {
            params,
            decoy_hash: String::new(),
        };
        hasher.decoy_hash = hasher.hash_password(DECOY_PASSWORD)?;
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password with a random salt.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    /// The cost parameters are read from the stored hash itself.
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }

    /// Runs a full verification against the decoy hash and discards the
    /// outcome, so a login for an unknown or inactive account costs the
    /// same as one with a wrong password.
    pub fn verify_decoy(&self, password: &str) -> AppResult<()> {
        self.verify_password(password, &self.decoy_hash).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&PasswordHashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash_password("secret1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("secret1", &hash).unwrap());
        assert!(!hasher.verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn test_salt_is_random() {
        let hasher = hasher();
        assert_ne!(
            hasher.hash_password("secret1").unwrap(),
            hasher.hash_password("secret1").unwrap()
        );
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(hasher().verify_password("secret1", "plaintext").is_err());
    }

    #[test]
    fn test_decoy_uses_configured_cost() {
        let hasher = hasher();
        assert!(hasher.decoy_hash.starts_with("$argon2id$"));
        assert!(hasher.decoy_hash.contains("m=1024,t=1,p=1"));
        assert!(hasher.verify_decoy("anything").is_ok());
        assert!(hasher.verify_decoy("").is_ok());
    }

    #[test]
    fn test_rejects_invalid_params() {
        let config = PasswordHashConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(PasswordHasher::new(&config).is_err());
    }
}
