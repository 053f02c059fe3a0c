//! Repository for the `streaming_services` table (movie x platform pricing).

use cinestream_core::types::DbId;
use sqlx::PgPool;

use crate::models::platform::{
    CreateStreamingService, StreamingService, StreamingServiceDetail, UpdateStreamingService,
};

const COLUMNS: &str =
    "id, movie_id, platform_id, price_720p_cents, price_1080p_cents, price_4k_cents";

const DETAIL_SELECT: &str = "SELECT ss.id, ss.movie_id, m.title AS movie_title, m.genre, m.rating, \
        ss.platform_id, p.platform_name, p.website, \
        ss.price_720p_cents, ss.price_1080p_cents, ss.price_4k_cents \
     FROM streaming_services ss \
     JOIN movies m ON m.id = ss.movie_id \
     JOIN streaming_platforms p ON p.id = ss.platform_id";

/// Provides CRUD operations for streaming services.
pub struct StreamingServiceRepo;

impl StreamingServiceRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateStreamingService,
    ) -> Result<StreamingService, sqlx::Error> {
        let query = format!(
            "INSERT INTO streaming_services
                (movie_id, platform_id, price_720p_cents, price_1080p_cents, price_4k_cents)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StreamingService>(&query)
            .bind(input.movie_id)
            .bind(input.platform_id)
            .bind(input.price_720p_cents)
            .bind(input.price_1080p_cents)
            .bind(input.price_4k_cents)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StreamingService>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM streaming_services WHERE id = $1");
        sqlx::query_as::<_, StreamingService>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every priced movie/platform pair.
    pub async fn list_detailed(
        pool: &PgPool,
    ) -> Result<Vec<StreamingServiceDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY p.platform_name, m.title");
        sqlx::query_as::<_, StreamingServiceDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Platforms streaming one movie, ordered by platform name.
    pub async fn list_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Vec<StreamingServiceDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE ss.movie_id = $1 ORDER BY p.platform_name");
        sqlx::query_as::<_, StreamingServiceDetail>(&query)
            .bind(movie_id)
            .fetch_all(pool)
            .await
    }

    /// Movies streamed on one platform, ordered by title.
    pub async fn list_for_platform(
        pool: &PgPool,
        platform_id: DbId,
    ) -> Result<Vec<StreamingServiceDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE ss.platform_id = $1 ORDER BY m.title");
        sqlx::query_as::<_, StreamingServiceDetail>(&query)
            .bind(platform_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStreamingService,
    ) -> Result<Option<StreamingService>, sqlx::Error> {
        let query = format!(
            "UPDATE streaming_services SET
                price_720p_cents = COALESCE($2, price_720p_cents),
                price_1080p_cents = COALESCE($3, price_1080p_cents),
                price_4k_cents = COALESCE($4, price_4k_cents)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StreamingService>(&query)
            .bind(id)
            .bind(input.price_720p_cents)
            .bind(input.price_1080p_cents)
            .bind(input.price_4k_cents)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM streaming_services WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
