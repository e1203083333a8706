//! User domain entities.

pub mod model;
pub mod role;

pub use model::{NewUser, ProfilePatch, User, UserProfile};
pub use role::UserRole;
