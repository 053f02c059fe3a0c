//! Recommendation / activity log model and DTOs.

use cinestream_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `recommendations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Recommendation {
    pub id: DbId,
    pub user_id: DbId,
    pub movie_id: DbId,
    pub reason: String,
}

/// Activity row joined with the user and movie, for admin and dashboards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecommendationDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub movie_id: DbId,
    pub movie_title: String,
    pub genre: String,
    pub reason: String,
}

/// One `(movie_id, genre)` pair from a user's activity history.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityEntry {
    pub movie_id: DbId,
    pub genre: String,
}

/// DTO for logging an activity row.
#[derive(Debug, Clone)]
pub struct CreateRecommendation {
    pub user_id: DbId,
    pub movie_id: DbId,
    pub reason: String,
}

/// DTO for editing an activity row. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateRecommendation {
    pub movie_id: Option<DbId>,
    pub reason: Option<String>,
}
