//! User entity model and DTOs.

use cinestream_core::preference::Preference;
use cinestream_core::roles::Role;
use cinestream_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- never render this struct directly.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub age: Option<i32>,
    pub email: String,
    pub password_hash: String,
    pub preference: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Stored preference as the domain enum. The column is CHECK-constrained,
    /// so the fallback only guards against manual edits.
    pub fn preference(&self) -> Preference {
        self.preference.parse().unwrap_or_default()
    }
}

/// User row joined with its resolved role, for the admin user list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserWithRole {
    pub id: DbId,
    pub name: String,
    pub age: Option<i32>,
    pub email: String,
    pub preference: String,
    /// `viewer`, `admin`, or `None` when no marker row exists.
    pub role: Option<String>,
    pub created_at: Timestamp,
}

impl UserWithRole {
    pub fn role_label(&self) -> &str {
        self.role.as_deref().unwrap_or("none")
    }

    pub fn age_label(&self) -> String {
        self.age.map(|a| a.to_string()).unwrap_or_default()
    }
}

/// DTO for creating a new user together with its role marker.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub age: Option<i32>,
    pub email: String,
    pub password_hash: String,
    pub preference: Preference,
    pub role: Role,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub preference: Option<Preference>,
}
