//! Repository for the `showtimes` table.

use chrono::{NaiveDate, NaiveTime};
use cinestream_core::types::DbId;
use sqlx::PgPool;

use crate::models::showtime::{CreateShowtime, Showtime, ShowtimeDetail};

const COLUMNS: &str = "id, cinema_id, movie_id, show_date, show_time, capacity";

/// Showtime joined with cinema, type and movie, plus the number of seats
/// already booked for that exact show.
const DETAIL_SELECT: &str = "SELECT s.id, s.cinema_id, c.name AS cinema_name, c.location, \
        ct.type_name, ct.price_cents, s.movie_id, m.title AS movie_title, \
        s.show_date, s.show_time, s.capacity, \
        (SELECT COUNT(*) FROM bookings b \
          WHERE b.cinema_id = s.cinema_id \
            AND b.movie_id = s.movie_id \
            AND b.booking_date = s.show_date \
            AND b.show_time = s.show_time) AS booked_seats \
     FROM showtimes s \
     JOIN cinemas c ON c.id = s.cinema_id \
     JOIN cinema_types ct ON ct.id = c.type_id \
     JOIN movies m ON m.id = s.movie_id";

/// Provides CRUD operations for showtimes.
pub struct ShowtimeRepo;

impl ShowtimeRepo {
    pub async fn create(pool: &PgPool, input: &CreateShowtime) -> Result<Showtime, sqlx::Error> {
        let query = format!(
            "INSERT INTO showtimes (cinema_id, movie_id, show_date, show_time, capacity)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Showtime>(&query)
            .bind(input.cinema_id)
            .bind(input.movie_id)
            .bind(input.show_date)
            .bind(input.show_time)
            .bind(input.capacity)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Showtime>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM showtimes WHERE id = $1");
        sqlx::query_as::<_, Showtime>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All showtimes, soonest first.
    pub async fn list_detailed(pool: &PgPool) -> Result<Vec<ShowtimeDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY s.show_date, s.show_time, c.name");
        sqlx::query_as::<_, ShowtimeDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// The showing of `movie_id` at `cinema_id` on that date and time, if any.
    pub async fn find_slot(
        pool: &PgPool,
        cinema_id: DbId,
        movie_id: DbId,
        show_date: NaiveDate,
        show_time: NaiveTime,
    ) -> Result<Option<ShowtimeDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE s.cinema_id = $1 AND s.movie_id = $2 AND s.show_date = $3 AND s.show_time = $4"
        );
        sqlx::query_as::<_, ShowtimeDetail>(&query)
            .bind(cinema_id)
            .bind(movie_id)
            .bind(show_date)
            .bind(show_time)
            .fetch_optional(pool)
            .await
    }

    /// Showtimes of one movie on or after `from`.
    pub async fn list_for_movie(
        pool: &PgPool,
        movie_id: DbId,
        from: NaiveDate,
    ) -> Result<Vec<ShowtimeDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE s.movie_id = $1 AND s.show_date >= $2
             ORDER BY s.show_date, s.show_time, c.name"
        );
        sqlx::query_as::<_, ShowtimeDetail>(&query)
            .bind(movie_id)
            .bind(from)
            .fetch_all(pool)
            .await
    }

    /// Showtimes at one cinema on or after `from`.
    pub async fn list_for_cinema(
        pool: &PgPool,
        cinema_id: DbId,
        from: NaiveDate,
    ) -> Result<Vec<ShowtimeDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE s.cinema_id = $1 AND s.show_date >= $2
             ORDER BY s.show_date, s.show_time, m.title"
        );
        sqlx::query_as::<_, ShowtimeDetail>(&query)
            .bind(cinema_id)
            .bind(from)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM showtimes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
