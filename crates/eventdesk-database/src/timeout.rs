//! Bounded store calls.
//!
//! Every credential-store call made by the auth core goes through
//! [`with_timeout`], so an unresponsive store surfaces as
//! `StoreUnavailable` instead of hanging the caller.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use eventdesk_core::error::AppError;
use eventdesk_core::result::AppResult;

/// Default bound for a single store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Run a store operation, failing with `StoreUnavailable` once `duration` elapses.
///
/// The inner future is dropped on timeout; any effect it already applied
/// is kept.
pub async fn with_timeout<F, T>(duration: Duration, operation: &'static str, future: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                timeout_ms = duration.as_millis() as u64,
                "Credential store call timed out"
            );
            Err(AppError::store_unavailable(format!(
                "Credential store did not answer '{operation}' within {duration:?}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_core::ErrorKind;

    #[tokio::test]
    async fn test_passes_through_result() {
        let value = with_timeout(DEFAULT_STORE_TIMEOUT, "noop", async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_passes_through_inner_error() {
        let err = with_timeout(DEFAULT_STORE_TIMEOUT, "noop", async {
            Err::<(), _>(AppError::conflict("dup"))
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_becomes_store_unavailable() {
        let err = with_timeout(Duration::from_millis(50), "slow", async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert!(err.kind.is_retryable());
    }
}
