//! # eventdesk-auth
//!
//! Authentication and session lifecycle for the EventDesk platform.
//!
//! ## Modules
//!
//! - `jwt`: access and refresh token issuing and verification
//! - `password`: Argon2id password hashing
//! - `session`: refresh-token persistence, rotation, and the signup/login/refresh flows
//! - `rbac`: role sets and the authorization guard

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;

pub use jwt::{AccessClaims, JwtDecoder, JwtEncoder, RefreshClaims};
pub use password::PasswordHasher;
pub use rbac::{Identity, RoleSet};
pub use session::{AuthSession, RefreshTokenStore, SessionManager, TokenCleanup};
