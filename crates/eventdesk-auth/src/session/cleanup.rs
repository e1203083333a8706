//! Garbage collection of expired refresh-token records.

use tracing::info;

use eventdesk_core::result::AppResult;

use super::store::RefreshTokenStore;

/// Deletes refresh-token records past their expiry.
#[derive(Debug, Clone)]
pub struct TokenCleanup {
    store: RefreshTokenStore,
}

impl TokenCleanup {
    /// Creates a cleanup handler over the given store.
    pub fn new(store: RefreshTokenStore) -> Self {
        Self { store }
    }

    /// Runs one cleanup cycle. Returns the number of records removed.
    pub async fn run_cleanup(&self) -> AppResult<u64> {
        let removed = self.store.purge_expired().await?;

        if removed > 0 {
            info!(removed, "Expired refresh tokens purged");
        }

        Ok(removed)
    }
}
