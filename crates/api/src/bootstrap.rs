//! Startup provisioning of the first admin account.
//!
//! Admins cannot register themselves. When `BOOTSTRAP_ADMIN_EMAIL` and
//! `BOOTSTRAP_ADMIN_PASSWORD` are set, the server makes sure an account
//! with that email exists before it starts serving.

use cinestream_core::error::CoreError;
use cinestream_core::input;
use cinestream_core::preference::Preference;
use cinestream_core::roles::Role;
use cinestream_db::models::user::CreateUser;
use cinestream_db::repositories::UserRepo;
use cinestream_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Whether [`ensure_admin`] created a new account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    AlreadyExists,
}

/// Create the bootstrap admin unless a user with that email already exists.
///
/// An existing account is left untouched, whatever its role.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<BootstrapOutcome> {
    let email = input::parse_email(&admin.email)?;

    if UserRepo::find_by_email(pool, &email).await?.is_some() {
        return Ok(BootstrapOutcome::AlreadyExists);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: admin.name.clone(),
            age: None,
            email,
            password_hash,
            preference: Preference::Both,
            role: Role::Admin,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Bootstrap admin created");
    Ok(BootstrapOutcome::Created)
}
