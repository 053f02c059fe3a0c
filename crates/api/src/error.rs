use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use cinestream_core::error::CoreError;

use crate::response::Layout;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`]: unauthenticated requests are redirected to
/// the login page, forbidden ones get a terse 403, everything else renders
/// the HTML error page.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cinestream_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Generic text shown for any 500.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Text of every 403 response.
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied";

impl AppError {
    /// HTTP status and user-facing message for this error.
    ///
    /// Internal details are logged here and replaced with
    /// [`INTERNAL_ERROR_MESSAGE`].
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, core.to_string()),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                CoreError::Forbidden(_) => {
                    (StatusCode::FORBIDDEN, ACCESS_DENIED_MESSAGE.to_string())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_ERROR_MESSAGE.to_string(),
                    )
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        }
    }

    /// Whether a form page may show this error inline and keep its form.
    ///
    /// True for 400, 404 and 409; authentication, authorization and
    /// internal failures always take the full error path.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self.status_and_message().0,
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::CONFLICT
        )
    }

    /// Name of the violated database constraint, if any.
    pub fn violated_constraint(&self) -> Option<&str> {
        match self {
            AppError::Database(err) => cinestream_db::violated_constraint(err),
            _ => None,
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage {
    layout: Layout,
    status: u16,
    reason: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        match status {
            StatusCode::UNAUTHORIZED => Redirect::to("/login").into_response(),
            StatusCode::FORBIDDEN => (status, ACCESS_DENIED_MESSAGE).into_response(),
            _ => error_page(status, message),
        }
    }
}

/// Render the HTML error page, falling back to plain text if the template
/// fails.
fn error_page(status: StatusCode, message: String) -> Response {
    let page = ErrorPage {
        layout: Layout::anonymous(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Error").to_string(),
        message,
    };
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render error page");
            (status, page.message).into_response()
        }
    }
}

/// Router fallback for paths no route matches.
pub async fn page_not_found() -> Response {
    error_page(StatusCode::NOT_FOUND, "Page not found".to_string())
}

/// Friendly message for a violated unique constraint.
fn unique_violation_message(constraint: &str) -> String {
    match constraint {
        "uq_users_email" => "An account with this email already exists".to_string(),
        "uq_bookings_seat" => {
            "Seat unavailable: that seat is already booked for that show".to_string()
        }
        "uq_cinema_types_type_name" => "A cinema type with this name already exists".to_string(),
        "uq_showtimes_slot" => {
            "That cinema already has a showing at this date and time".to_string()
        }
        "uq_streaming_platforms_name" => "A platform with this name already exists".to_string(),
        "uq_streaming_services_movie_platform" => {
            "This movie already has prices on that platform".to_string()
        }
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

/// Friendly message for a violated check constraint. Constraint names are
/// never shown.
fn check_violation_message(constraint: &str) -> String {
    match constraint {
        "ck_subscriptions_dates" => "The end date cannot be before the start date".to_string(),
        _ => "One of the submitted values is out of range".to_string(),
    }
}

/// Classify a sqlx error into an HTTP status and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (23505) on a `uq_` constraint map to 409.
/// - Foreign key violations (23503) map to 409 when deleting a referenced
///   row and to 400 when pointing at a row that does not exist.
/// - Check violations (23514) map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") if constraint.starts_with("uq_") => {
                    return (StatusCode::CONFLICT, unique_violation_message(constraint));
                }
                Some("23503") => {
                    tracing::warn!(constraint, error = %db_err, "Foreign key violation");
                    return if db_err.message().starts_with("update or delete") {
                        (
                            StatusCode::CONFLICT,
                            "This record is still referenced by other records".to_string(),
                        )
                    } else {
                        (
                            StatusCode::BAD_REQUEST,
                            "A referenced record does not exist".to_string(),
                        )
                    };
                }
                Some("23514") => {
                    tracing::warn!(constraint, "Check constraint violation");
                    return (StatusCode::BAD_REQUEST, check_violation_message(constraint));
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_statuses() {
        let cases = [
            (
                AppError::Core(CoreError::NotFound { entity: "Movie", id: 7 }),
                StatusCode::NOT_FOUND,
                "Movie with id 7 not found",
            ),
            (
                AppError::Core(CoreError::Validation("Title is required".into())),
                StatusCode::BAD_REQUEST,
                "Title is required",
            ),
            (
                AppError::Core(CoreError::Conflict("taken".into())),
                StatusCode::CONFLICT,
                "taken",
            ),
            (
                AppError::Core(CoreError::Forbidden("Admin role required".into())),
                StatusCode::FORBIDDEN,
                ACCESS_DENIED_MESSAGE,
            ),
            (
                AppError::InternalError("disk on fire".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE,
            ),
        ];

        for (err, status, message) in cases {
            assert_eq!(err.status_and_message(), (status, message.to_string()));
        }
    }

    #[test]
    fn row_not_found_is_404() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.status_and_message().0, StatusCode::NOT_FOUND);
        assert!(err.is_user_facing());
    }

    #[test]
    fn internal_errors_are_not_user_facing() {
        assert!(!AppError::InternalError("boom".into()).is_user_facing());
        assert!(!AppError::Core(CoreError::Unauthorized("no session".into())).is_user_facing());
        assert!(AppError::BadRequest("bad".into()).is_user_facing());
    }

    #[test]
    fn unauthorized_redirects_to_login() {
        let response =
            AppError::Core(CoreError::Unauthorized("no session".into())).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");
    }

    #[test]
    fn forbidden_is_terse() {
        let response = AppError::Core(CoreError::Forbidden("Admin role required".into())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn unique_messages_are_friendly() {
        assert_eq!(
            unique_violation_message("uq_users_email"),
            "An account with this email already exists"
        );
        assert!(unique_violation_message("uq_bookings_seat").starts_with("Seat unavailable"));
        assert!(unique_violation_message("uq_other").contains("uq_other"));
    }
}
