//! Role-based authorization.

pub mod guard;
pub mod identity;
pub mod roles;

pub use guard::{authorize, authorize_owner_or_admin, authorize_owner_or_role};
pub use identity::Identity;
pub use roles::RoleSet;
