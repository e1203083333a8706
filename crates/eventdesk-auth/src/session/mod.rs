//! Refresh-token persistence and the session lifecycle built on it.

pub mod cleanup;
pub mod manager;
pub mod requests;
pub mod store;

pub use cleanup::TokenCleanup;
pub use manager::{AuthSession, SessionManager};
pub use requests::{ChangePasswordRequest, LoginRequest, SignupRequest, UpdateProfileRequest};
pub use store::RefreshTokenStore;
