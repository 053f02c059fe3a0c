//! HTML page handlers.
//!
//! Each page is served by a GET handler that renders it and, where it has
//! forms, a POST handler that applies the submitted `action` and renders
//! the same page again with an inline notice.

pub mod admin_bookings;
pub mod admin_cinemas;
pub mod admin_dashboard;
pub mod admin_movies;
pub mod admin_platforms;
pub mod admin_recommendations;
pub mod admin_showtimes;
pub mod admin_subscriptions;
pub mod admin_users;
pub mod auth;
pub mod booking;
pub mod catalog;
pub mod home;
pub mod profile;
pub mod recommendation;
pub mod subscription;

use chrono::{NaiveDate, Utc};
use cinestream_core::error::CoreError;
use cinestream_core::types::DbId;
use serde::Deserialize;

/// Error for a form whose hidden `action` field is not recognised.
pub(crate) fn unknown_action(action: &str) -> CoreError {
    CoreError::Validation(format!("Unknown action: {action}"))
}

/// `?edit=<id>` on admin pages.
#[derive(Debug, Default, Deserialize)]
pub struct EditQuery {
    #[serde(default)]
    pub edit: Option<String>,
}

impl EditQuery {
    /// The id to edit; anything that is not a positive id is ignored.
    pub fn id(&self) -> Option<DbId> {
        parse_edit_id(self.edit.as_deref())
    }
}

/// Parse an `edit`-style query value; anything that is not a positive id is
/// treated as absent.
pub(crate) fn parse_edit_id(raw: Option<&str>) -> Option<DbId> {
    raw.and_then(|raw| raw.trim().parse::<DbId>().ok())
        .filter(|id| *id > 0)
}

/// Today's date in UTC.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
