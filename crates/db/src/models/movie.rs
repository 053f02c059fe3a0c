//! Movie entity model and DTOs.

use chrono::NaiveDate;
use cinestream_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A movie row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub genre: String,
    pub release_date: NaiveDate,
    pub language: String,
    pub duration_mins: i32,
    pub rating: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Movie {
    /// Rating with one decimal place, e.g. `"8.5"`.
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }
}

/// DTO for creating a new movie.
#[derive(Debug, Clone)]
pub struct CreateMovie {
    pub title: String,
    pub genre: String,
    pub release_date: NaiveDate,
    pub language: String,
    pub duration_mins: i32,
    pub rating: f64,
}

/// DTO for updating an existing movie. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub language: Option<String>,
    pub duration_mins: Option<i32>,
    pub rating: Option<f64>,
}
