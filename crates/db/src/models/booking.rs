//! Booking entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use cinestream_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub user_id: DbId,
    pub movie_id: DbId,
    pub cinema_id: DbId,
    /// Date of the show.
    pub booking_date: NaiveDate,
    pub show_time: NaiveTime,
    pub seat_number: String,
    pub created_at: Timestamp,
}

/// Booking joined with the user, movie and cinema names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub movie_id: DbId,
    pub movie_title: String,
    pub cinema_id: DbId,
    pub cinema_name: String,
    pub location: String,
    pub booking_date: NaiveDate,
    pub show_time: NaiveTime,
    pub seat_number: String,
}

impl BookingDetail {
    pub fn time_label(&self) -> String {
        self.show_time.format("%H:%M").to_string()
    }
}

/// DTO for creating a booking.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub user_id: DbId,
    pub movie_id: DbId,
    pub cinema_id: DbId,
    pub booking_date: NaiveDate,
    pub show_time: NaiveTime,
    pub seat_number: String,
}

/// DTO for editing a booking. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateBooking {
    pub movie_id: Option<DbId>,
    pub cinema_id: Option<DbId>,
    pub booking_date: Option<NaiveDate>,
    pub show_time: Option<NaiveTime>,
    pub seat_number: Option<String>,
}
