//! Shared HTML rendering helpers.
//!
//! Every page template embeds a [`Layout`] (the signed-in user and an
//! optional [`Notice`]) consumed by `base.html`. Handlers render templates
//! through [`render`] / [`render_with_status`] so template failures become
//! ordinary [`AppError`]s.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use cinestream_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::SessionUser;

/// Severity of an inline notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

/// A one-line message shown above the page content.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// CSS class used by `base.html`.
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "notice-success",
            NoticeKind::Warning => "notice-warning",
            NoticeKind::Error => "notice-error",
        }
    }
}

/// Data every page passes to `base.html`.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub user: Option<SessionUser>,
    pub notice: Option<Notice>,
}

impl Layout {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user: &SessionUser) -> Self {
        Self {
            user: Some(user.clone()),
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: Option<Notice>) -> Self {
        self.notice = notice;
        self
    }
}

/// Outcome of a form submission, ready to be shown inline.
#[derive(Debug)]
pub struct Submission {
    pub status: StatusCode,
    pub notice: Notice,
}

impl Submission {
    /// Turn the result of a form action into a status and notice.
    ///
    /// Success renders a green notice with 200. Validation, not-found and
    /// conflict errors render inline with their own status (404 for a
    /// missing target is shown as a warning). Anything else is returned as
    /// an error for the full error path.
    pub fn from_result(result: AppResult<String>) -> AppResult<Self> {
        match result {
            Ok(message) => Ok(Self {
                status: StatusCode::OK,
                notice: Notice::success(message),
            }),
            Err(err) if err.is_user_facing() => {
                let (status, message) = err.status_and_message();
                let notice = if status == StatusCode::NOT_FOUND {
                    Notice::warning(message)
                } else {
                    Notice::error(message)
                };
                Ok(Self { status, notice })
            }
            Err(err) => Err(err),
        }
    }
}

impl Submission {
    /// Status and notice for a page render, with or without a submission.
    pub fn into_parts(submission: Option<Self>) -> (StatusCode, Option<Notice>) {
        match submission {
            Some(s) => (s.status, Some(s.notice)),
            None => (StatusCode::OK, None),
        }
    }

    /// A warning for an edit target that does not exist.
    pub fn missing(err: CoreError) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            notice: Notice::warning(err.to_string()),
        }
    }
}

/// Render a template into an HTML response body.
pub fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::InternalError(format!("Template render error: {e}")))
}

/// Render a template with an explicit status code.
pub fn render_with_status<T: Template>(status: StatusCode, template: &T) -> AppResult<Response> {
    Ok((status, render(template)?).into_response())
}
