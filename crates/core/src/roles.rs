//! The role model: a closed set of roles plus the capability predicates
//! every authorization decision is built from.
//!
//! Role names must match the `ck_users_role` CHECK constraint in
//! `20260301000001_create_users_table.sql`.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

pub const ROLE_USER: &str = "user";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_ADMIN: &str = "admin";

/// A user's stored role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    /// Parse a stored role name. Unknown names are rejected rather than
    /// defaulted so a corrupted row or claim cannot silently gain or lose
    /// capabilities.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            ROLE_USER => Some(Role::User),
            ROLE_MODERATOR => Some(Role::Moderator),
            ROLE_ADMIN => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Moderator => ROLE_MODERATOR,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

/// The acting principal behind an authenticated request.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub id: DbId,
    pub role: Role,
    /// Superuser override: behaves as admin regardless of stored role.
    pub is_superuser: bool,
}

impl Principal {
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }

    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role, is_superuser: bool) -> Principal {
        Principal {
            id: 1,
            role,
            is_superuser,
        }
    }

    #[test]
    fn test_role_round_trips_through_strings() {
        for role in [Role::User, Role::Moderator, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse("ADMIN"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_moderator_predicate() {
        assert!(principal(Role::Moderator, false).is_moderator());
        assert!(!principal(Role::User, false).is_moderator());
        assert!(!principal(Role::Admin, false).is_moderator());
    }

    #[test]
    fn test_admin_predicate_includes_superuser_override() {
        assert!(principal(Role::Admin, false).is_admin());
        assert!(principal(Role::User, true).is_admin());
        assert!(principal(Role::Moderator, true).is_admin());
        assert!(!principal(Role::User, false).is_admin());
        assert!(!principal(Role::Moderator, false).is_admin());
    }
}
