//! Repository for the `cinema_types` table.

use cinestream_core::types::DbId;
use sqlx::PgPool;

use crate::models::cinema::{CinemaType, CreateCinemaType, UpdateCinemaType};

const COLUMNS: &str = "id, type_name, price_cents";

/// Provides CRUD operations for cinema pricing tiers.
pub struct CinemaTypeRepo;

impl CinemaTypeRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateCinemaType,
    ) -> Result<CinemaType, sqlx::Error> {
        let query = format!(
            "INSERT INTO cinema_types (type_name, price_cents)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CinemaType>(&query)
            .bind(&input.type_name)
            .bind(input.price_cents)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CinemaType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cinema_types WHERE id = $1");
        sqlx::query_as::<_, CinemaType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all cinema types ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<CinemaType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cinema_types ORDER BY type_name ASC");
        sqlx::query_as::<_, CinemaType>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCinemaType,
    ) -> Result<Option<CinemaType>, sqlx::Error> {
        let query = format!(
            "UPDATE cinema_types SET
                type_name = COALESCE($2, type_name),
                price_cents = COALESCE($3, price_cents)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CinemaType>(&query)
            .bind(id)
            .bind(&input.type_name)
            .bind(input.price_cents)
            .fetch_optional(pool)
            .await
    }

    /// Delete a cinema type.
    ///
    /// Fails with a foreign-key violation while any cinema still uses it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cinema_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
