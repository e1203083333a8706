//! Non-empty role sets.

use std::fmt;

use eventdesk_core::error::AppError;
use eventdesk_core::result::AppResult;
use eventdesk_entity::user::UserRole;

/// A non-empty set of roles allowed to perform an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleSet(u8);

impl RoleSet {
    /// Admins only.
    pub const ADMIN: Self = Self(UserRole::Admin.bit());
    /// Planners only.
    pub const PLANNER: Self = Self(UserRole::Planner.bit());
    /// Vendors only.
    pub const VENDOR: Self = Self(UserRole::Vendor.bit());
    /// Planners and admins.
    pub const PLANNER_OR_ADMIN: Self = Self(UserRole::Planner.bit() | UserRole::Admin.bit());
    /// Vendors and planners.
    pub const VENDOR_OR_PLANNER: Self = Self(UserRole::Vendor.bit() | UserRole::Planner.bit());

    /// Builds a set from roles. Fails if no role is given.
    pub fn new(roles: impl IntoIterator<Item = UserRole>) -> AppResult<Self> {
        let bits = roles.into_iter().fold(0u8, |acc, role| acc | role.bit());
        if bits == 0 {
            return Err(AppError::validation("Role set must contain at least one role"));
        }
        Ok(Self(bits))
    }

    /// Returns `true` if `role` is a member.
    pub fn contains(&self, role: UserRole) -> bool {
        self.0 & role.bit() != 0
    }

    /// Members in declaration order.
    pub fn roles(self) -> impl Iterator<Item = UserRole> {
        UserRole::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.roles().map(|r| r.as_str()).collect();
        write!(f, "{}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_rejected() {
        assert!(RoleSet::new(Vec::new()).is_err());
    }

    #[test]
    fn test_presets() {
        assert!(RoleSet::PLANNER_OR_ADMIN.contains(UserRole::Admin));
        assert!(RoleSet::PLANNER_OR_ADMIN.contains(UserRole::Planner));
        assert!(!RoleSet::PLANNER_OR_ADMIN.contains(UserRole::Vendor));
        assert_eq!(
            RoleSet::new([UserRole::Planner, UserRole::Vendor]).unwrap(),
            RoleSet::VENDOR_OR_PLANNER
        );
    }

    #[test]
    fn test_display_lists_members() {
        assert_eq!(RoleSet::VENDOR_OR_PLANNER.to_string(), "planner, vendor");
    }
}
