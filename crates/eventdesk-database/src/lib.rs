//! # eventdesk-database
//!
//! The credential store: repository traits for users and refresh tokens,
//! their PostgreSQL implementations, an in-memory implementation for
//! single-node deployments and tests, and the bounded-timeout helper every
//! store call goes through.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod timeout;

pub use connection::DatabasePool;
pub use memory::MemoryCredentialStore;
pub use repositories::{RefreshTokenRepository, UserRepository};
pub use timeout::with_timeout;
