//! Account roles.
//!
//! A user holds exactly one role, recorded as a marker row in either the
//! `viewers` or the `admins` table. The names below must match the strings
//! stored in session tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_VIEWER: &str = "viewer";
pub const ROLE_ADMIN: &str = "admin";

/// The closed set of roles a signed-in user can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Viewer => ROLE_VIEWER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Path of the landing page for this role.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Viewer => "/dashboard",
            Role::Admin => "/admin",
        }
    }

    /// Name of the marker table holding this role.
    pub fn marker_table(self) -> &'static str {
        match self {
            Role::Viewer => "viewers",
            Role::Admin => "admins",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ROLE_VIEWER => Ok(Role::Viewer),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(format!("Unknown role '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        assert_eq!("viewer".parse::<Role>().unwrap(), Role::Viewer);
        assert_eq!(" admin ".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn rejects_unknown_role() {
        let err = "unknown".parse::<Role>().unwrap_err();
        assert!(err.contains("unknown"));
    }

    #[test]
    fn home_paths_differ_by_role() {
        assert_eq!(Role::Viewer.home_path(), "/dashboard");
        assert_eq!(Role::Admin.home_path(), "/admin");
    }
}
