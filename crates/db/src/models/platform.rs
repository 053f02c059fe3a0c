//! Streaming platform and per-movie streaming price models.

use cinestream_core::money::format_cents;
use cinestream_core::types::{Cents, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `streaming_platforms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StreamingPlatform {
    pub id: DbId,
    pub platform_name: String,
    /// Opaque external URL, rendered as a link.
    pub website: String,
}

/// DTO for creating a streaming platform.
#[derive(Debug, Clone)]
pub struct CreatePlatform {
    pub platform_name: String,
    pub website: String,
}

/// DTO for updating a streaming platform. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdatePlatform {
    pub platform_name: Option<String>,
    pub website: Option<String>,
}

/// A row from the `streaming_services` join table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StreamingService {
    pub id: DbId,
    pub movie_id: DbId,
    pub platform_id: DbId,
    pub price_720p_cents: Cents,
    pub price_1080p_cents: Cents,
    pub price_4k_cents: Cents,
}

/// Streaming service joined with its movie and platform.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StreamingServiceDetail {
    pub id: DbId,
    pub movie_id: DbId,
    pub movie_title: String,
    pub genre: String,
    pub rating: f64,
    pub platform_id: DbId,
    pub platform_name: String,
    pub website: String,
    pub price_720p_cents: Cents,
    pub price_1080p_cents: Cents,
    pub price_4k_cents: Cents,
}

impl StreamingServiceDetail {
    pub fn price_720p_label(&self) -> String {
        format_cents(self.price_720p_cents)
    }

    pub fn price_1080p_label(&self) -> String {
        format_cents(self.price_1080p_cents)
    }

    pub fn price_4k_label(&self) -> String {
        format_cents(self.price_4k_cents)
    }

    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }
}

/// DTO for pricing a movie on a platform.
#[derive(Debug, Clone)]
pub struct CreateStreamingService {
    pub movie_id: DbId,
    pub platform_id: DbId,
    pub price_720p_cents: Cents,
    pub price_1080p_cents: Cents,
    pub price_4k_cents: Cents,
}

/// DTO for repricing a streaming service. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateStreamingService {
    pub price_720p_cents: Option<Cents>,
    pub price_1080p_cents: Option<Cents>,
    pub price_4k_cents: Option<Cents>,
}
