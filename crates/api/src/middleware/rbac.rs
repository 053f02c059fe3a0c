//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`SessionUser`] and rejects requests whose role does
//! not match. [`SessionUser`] resolves the role from the marker tables on
//! every request, so a deleted account or a changed role takes effect
//! without waiting for the session to expire.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cinestream_core::error::CoreError;
use cinestream_core::roles::Role;

use super::auth::SessionUser;
use crate::error::AppError;
use crate::state::AppState;

/// Load the session and confirm the user currently holds `required`.
async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    required: Role,
) -> Result<SessionUser, AppError> {
    let user = SessionUser::from_request_parts(parts, state).await?;

    if user.role != required {
        tracing::warn!(
            user_id = user.user_id,
            required = %required,
            path = %parts.uri.path(),
            "Access refused"
        );
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "{required} role required"
        ))));
    }

    Ok(user)
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin): RequireAdmin) -> AppResult<Response> {
///     // admin is guaranteed to be an admin here
/// }
/// ```
pub struct RequireAdmin(pub SessionUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Admin).await.map(RequireAdmin)
    }
}

/// Requires the `viewer` role. Rejects with 403 Forbidden otherwise.
pub struct RequireViewer(pub SessionUser);

impl FromRequestParts<AppState> for RequireViewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Viewer).await.map(RequireViewer)
    }
}
