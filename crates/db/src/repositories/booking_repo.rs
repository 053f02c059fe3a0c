//! Repository for the `bookings` table.

use chrono::{NaiveDate, NaiveTime};
use cinestream_core::types::DbId;
use sqlx::PgPool;

use crate::models::booking::{Booking, BookingDetail, CreateBooking, UpdateBooking};
use crate::models::recommendation::CreateRecommendation;
use crate::repositories::RecommendationRepo;

/// Unique constraint on (cinema_id, booking_date, show_time, seat_number).
pub const SEAT_CONSTRAINT: &str = "uq_bookings_seat";

const COLUMNS: &str =
    "id, user_id, movie_id, cinema_id, booking_date, show_time, seat_number, created_at";

const DETAIL_SELECT: &str = "SELECT b.id, b.user_id, u.name AS user_name, \
        b.movie_id, m.title AS movie_title, b.cinema_id, c.name AS cinema_name, c.location, \
        b.booking_date, b.show_time, b.seat_number \
     FROM bookings b \
     JOIN users u ON u.id = b.user_id \
     JOIN movies m ON m.id = b.movie_id \
     JOIN cinemas c ON c.id = b.cinema_id";

/// Why a booking write was refused.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// No showtime matches the cinema, movie, date and time.
    #[error("No showing of that movie at that cinema at that date and time")]
    NoShowing,

    /// Every seat of the showing is taken.
    #[error("That showing is sold out")]
    SoldOut,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// The cinema, movie, date and time that identify one showing.
struct ShowKey {
    cinema_id: DbId,
    movie_id: DbId,
    show_date: NaiveDate,
    show_time: NaiveTime,
}

/// Provides CRUD operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Book a seat and log it to the user's activity in one transaction.
    ///
    /// The matching showtime row is locked for the duration of the
    /// transaction, so concurrent bookings for the same show are counted
    /// against its capacity one at a time. A second booking of the same
    /// seat fails with a unique violation on [`SEAT_CONSTRAINT`].
    pub async fn create_with_activity(
        pool: &PgPool,
        input: &CreateBooking,
        reason: &str,
    ) -> Result<Booking, BookingError> {
        let mut tx = pool.begin().await?;

        let show = ShowKey {
            cinema_id: input.cinema_id,
            movie_id: input.movie_id,
            show_date: input.booking_date,
            show_time: input.show_time,
        };
        Self::claim_seat(&mut tx, &show, None).await?;

        let booking = Self::insert(&mut tx, input).await?;
        let activity = CreateRecommendation {
            user_id: input.user_id,
            movie_id: input.movie_id,
            reason: reason.to_string(),
        };
        RecommendationRepo::insert(&mut tx, &activity).await?;

        tx.commit().await?;
        Ok(booking)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's bookings, latest show first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE b.user_id = $1
             ORDER BY b.booking_date DESC, b.show_time DESC, b.id DESC"
        );
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Every booking, newest first.
    pub async fn list_detailed(pool: &PgPool) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY b.id DESC");
        sqlx::query_as::<_, BookingDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial edit to a booking.
    ///
    /// The show the booking ends up on must exist and have a free seat,
    /// not counting the booking itself. Returns `Ok(None)` if the booking
    /// does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBooking,
    ) -> Result<Option<Booking>, BookingError> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let show = ShowKey {
            cinema_id: input.cinema_id.unwrap_or(current.cinema_id),
            movie_id: input.movie_id.unwrap_or(current.movie_id),
            show_date: input.booking_date.unwrap_or(current.booking_date),
            show_time: input.show_time.unwrap_or(current.show_time),
        };
        Self::claim_seat(&mut tx, &show, Some(id)).await?;

        let query = format!(
            "UPDATE bookings SET
                movie_id = $2,
                cinema_id = $3,
                booking_date = $4,
                show_time = $5,
                seat_number = COALESCE($6, seat_number)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(show.movie_id)
            .bind(show.cinema_id)
            .bind(show.show_date)
            .bind(show.show_time)
            .bind(&input.seat_number)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(booking))
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a booking only if it belongs to `user_id`.
    pub async fn delete_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Lock the showtime for `show` and make sure it has a seat left.
    ///
    /// `moving` is a booking already counted against the show that is
    /// being edited in place; it does not take up a second seat.
    async fn claim_seat(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        show: &ShowKey,
        moving: Option<DbId>,
    ) -> Result<(), BookingError> {
        let capacity: Option<i32> = sqlx::query_scalar(
            "SELECT capacity FROM showtimes
             WHERE cinema_id = $1 AND movie_id = $2 AND show_date = $3 AND show_time = $4
             FOR UPDATE",
        )
        .bind(show.cinema_id)
        .bind(show.movie_id)
        .bind(show.show_date)
        .bind(show.show_time)
        .fetch_optional(&mut **tx)
        .await?;
        let capacity = capacity.ok_or(BookingError::NoShowing)?;

        let booked: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings
             WHERE cinema_id = $1 AND movie_id = $2 AND booking_date = $3 AND show_time = $4
               AND ($5::BIGINT IS NULL OR id <> $5)",
        )
        .bind(show.cinema_id)
        .bind(show.movie_id)
        .bind(show.show_date)
        .bind(show.show_time)
        .bind(moving)
        .fetch_one(&mut **tx)
        .await?;

        if booked >= i64::from(capacity) {
            return Err(BookingError::SoldOut);
        }
        Ok(())
    }

    async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateBooking,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings (user_id, movie_id, cinema_id, booking_date, show_time, seat_number)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.user_id)
            .bind(input.movie_id)
            .bind(input.cinema_id)
            .bind(input.booking_date)
            .bind(input.show_time)
            .bind(&input.seat_number)
            .fetch_one(&mut **tx)
            .await
    }
}
