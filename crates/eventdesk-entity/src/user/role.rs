//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the RBAC system.
///
/// Roles carry no hierarchy: authorization is exact membership in an
/// allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator.
    Admin,
    /// Organizes events.
    Planner,
    /// Supplies services to events.
    Vendor,
}

impl UserRole {
    /// Every role, in declaration order.
    pub const ALL: [UserRole; 3] = [Self::Admin, Self::Planner, Self::Vendor];

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Planner => "planner",
            Self::Vendor => "vendor",
        }
    }

    /// Single-bit mask used by role sets.
    pub const fn bit(self) -> u8 {
        match self {
            Self::Admin => 1 << 0,
            Self::Planner => 1 << 1,
            Self::Vendor => 1 << 2,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = eventdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "planner" => Ok(Self::Planner),
            "vendor" => Ok(Self::Vendor),
            _ => Err(eventdesk_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, planner, vendor"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("VENDOR".parse::<UserRole>().unwrap(), UserRole::Vendor);
        assert!("manager".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_bits_are_distinct() {
        let combined = UserRole::ALL.iter().fold(0u8, |acc, r| acc | r.bit());
        assert_eq!(combined.count_ones(), 3);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&UserRole::Planner).unwrap();
        assert_eq!(json, "\"planner\"");
    }
}
