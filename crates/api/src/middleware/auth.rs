//! Cookie-session authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use cinestream_core::error::CoreError;
use cinestream_core::preference::Preference;
use cinestream_core::roles::Role;
use cinestream_core::types::DbId;
use cinestream_db::repositories::UserRepo;
use cinestream_db::DbPool;

use crate::auth::cookie::{read_cookie, SESSION_COOKIE};
use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::AppError;
use crate::state::AppState;

/// Signed-in user taken from the `session` cookie.
///
/// Use this as an extractor parameter in any handler that requires a
/// session. Requests without a valid session are redirected to `/login`.
/// The extractor reloads the account on every request: a deleted account
/// is sent back to login, and name, preference and role come from the
/// database rather than the token.
///
/// ```ignore
/// async fn my_handler(user: SessionUser) -> AppResult<Html<String>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub preference: Preference,
    pub role: Role,
}

impl SessionUser {
    /// Decode the session cookie in `headers`.
    ///
    /// Handlers that serve both anonymous and signed-in visitors (`/`,
    /// `/login`) call this directly and treat an error as "anonymous".
    pub fn from_headers(headers: &HeaderMap, config: &JwtConfig) -> Result<Self, AppError> {
        let token = read_cookie(headers, SESSION_COOKIE)
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Not signed in".into())))?;

        let claims = validate_token(token, config).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

        Ok(claims.into())
    }

    /// Replace the token's copy of the account with the stored one.
    async fn reload(self, pool: &DbPool) -> Result<Self, AppError> {
        let Some(stored) = UserRepo::find_by_id(pool, self.user_id).await? else {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Account no longer exists".into(),
            )));
        };

        let Some(role) = UserRepo::resolve_role(pool, stored.id).await? else {
            tracing::warn!(user_id = stored.id, "Session for account without a role");
            return Err(AppError::Core(CoreError::Forbidden(
                "Account has no role assigned".into(),
            )));
        };

        Ok(SessionUser {
            user_id: stored.id,
            preference: stored.preference(),
            name: stored.name,
            email: stored.email,
            role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_viewer(&self) -> bool {
        self.role == Role::Viewer
    }

    pub fn shows_cinema(&self) -> bool {
        self.preference.shows_cinema()
    }

    pub fn shows_streaming(&self) -> bool {
        self.preference.shows_streaming()
    }
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        SessionUser::from_headers(&parts.headers, &state.config.jwt)?
            .reload(&state.pool)
            .await
    }
}
