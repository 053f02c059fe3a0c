//! Repository for the `streaming_platforms` table.

use cinestream_core::types::DbId;
use sqlx::PgPool;

use crate::models::platform::{CreatePlatform, StreamingPlatform, UpdatePlatform};

const COLUMNS: &str = "id, platform_name, website";

/// Provides CRUD operations for streaming platforms.
pub struct PlatformRepo;

impl PlatformRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePlatform,
    ) -> Result<StreamingPlatform, sqlx::Error> {
        let query = format!(
            "INSERT INTO streaming_platforms (platform_name, website)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StreamingPlatform>(&query)
            .bind(&input.platform_name)
            .bind(&input.website)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StreamingPlatform>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM streaming_platforms WHERE id = $1");
        sqlx::query_as::<_, StreamingPlatform>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all platforms ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<StreamingPlatform>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM streaming_platforms ORDER BY platform_name ASC");
        sqlx::query_as::<_, StreamingPlatform>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlatform,
    ) -> Result<Option<StreamingPlatform>, sqlx::Error> {
        let query = format!(
            "UPDATE streaming_platforms SET
                platform_name = COALESCE($2, platform_name),
                website = COALESCE($3, website)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StreamingPlatform>(&query)
            .bind(id)
            .bind(&input.platform_name)
            .bind(&input.website)
            .fetch_optional(pool)
            .await
    }

    /// Delete a platform. Its streaming prices and subscriptions cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM streaming_platforms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
