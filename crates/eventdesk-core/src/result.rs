//! Convenience result type alias for EventDesk.

use crate::error::AppError;

/// A specialized `Result` type for EventDesk operations.
pub type AppResult<T> = Result<T, AppError>;
