//! Role and ownership checks applied before a protected action.
//!
//! A missing identity is always `Unauthenticated`; a present identity that
//! fails the check is `Authorization`. Roles carry no hierarchy.

use tracing::debug;

use eventdesk_core::error::AppError;
use eventdesk_core::result::AppResult;
use eventdesk_core::types::UserId;

use super::identity::Identity;
use super::roles::RoleSet;

fn require_identity(identity: Option<&Identity>) -> AppResult<&Identity> {
    identity.ok_or_else(|| AppError::unauthenticated("Authentication required"))
}

/// Allows the caller if their role is in `allowed`.
pub fn authorize(identity: Option<&Identity>, allowed: &RoleSet) -> AppResult<()> {
    let identity = require_identity(identity)?;

    if allowed.contains(identity.role) {
        return Ok(());
    }

    debug!(user_id = %identity.user_id, role = %identity.role, required = %allowed, "Role check denied");
    Err(AppError::forbidden(format!(
        "Access denied. Required roles: {allowed}. Your role: {}",
        identity.role
    )))
}

/// Allows the caller if they own the resource or their role is in `privileged`.
pub fn authorize_owner_or_role(
    identity: Option<&Identity>,
    owner_id: UserId,
    privileged: &RoleSet,
) -> AppResult<()> {
    let identity = require_identity(identity)?;

    if identity.user_id == owner_id || privileged.contains(identity.role) {
        return Ok(());
    }

    debug!(user_id = %identity.user_id, owner_id = %owner_id, "Ownership check denied");
    Err(AppError::forbidden(
        "Access denied. You can only access your own resources",
    ))
}

/// Allows the resource owner or any admin.
pub fn authorize_owner_or_admin(identity: Option<&Identity>, owner_id: UserId) -> AppResult<()> {
    authorize_owner_or_role(identity, owner_id, &RoleSet::ADMIN)
}
