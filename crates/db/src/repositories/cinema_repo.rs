//! Repository for the `cinemas` table.

use cinestream_core::types::DbId;
use sqlx::PgPool;

use crate::models::cinema::{Cinema, CinemaWithType, CreateCinema, UpdateCinema};

const COLUMNS: &str = "id, name, location, type_id";

/// Column list for cinemas joined with `cinema_types` (aliases `c`, `ct`).
const DETAIL_COLUMNS: &str = "c.id, c.name, c.location, c.type_id, ct.type_name, ct.price_cents";

/// Provides CRUD operations for cinemas.
pub struct CinemaRepo;

impl CinemaRepo {
    pub async fn create(pool: &PgPool, input: &CreateCinema) -> Result<Cinema, sqlx::Error> {
        let query = format!(
            "INSERT INTO cinemas (name, location, type_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cinema>(&query)
            .bind(&input.name)
            .bind(&input.location)
            .bind(input.type_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Cinema>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cinemas WHERE id = $1");
        sqlx::query_as::<_, Cinema>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a cinema together with its type and ticket price.
    pub async fn find_with_type(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CinemaWithType>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS}
             FROM cinemas c
             JOIN cinema_types ct ON ct.id = c.type_id
             WHERE c.id = $1"
        );
        sqlx::query_as::<_, CinemaWithType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all cinemas with their type, ordered by name.
    pub async fn list_with_types(pool: &PgPool) -> Result<Vec<CinemaWithType>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS}
             FROM cinemas c
             JOIN cinema_types ct ON ct.id = c.type_id
             ORDER BY c.name ASC, c.id ASC"
        );
        sqlx::query_as::<_, CinemaWithType>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCinema,
    ) -> Result<Option<Cinema>, sqlx::Error> {
        let query = format!(
            "UPDATE cinemas SET
                name = COALESCE($2, name),
                location = COALESCE($3, location),
                type_id = COALESCE($4, type_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cinema>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.location)
            .bind(input.type_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a cinema. Showtimes and bookings at it cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cinemas WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
