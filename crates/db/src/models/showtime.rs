//! Showtime model and DTOs.
//!
//! A showtime is what makes a movie "available" at a cinema.

use chrono::{NaiveDate, NaiveTime};
use cinestream_core::money::format_cents;
use cinestream_core::types::{Cents, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `showtimes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Showtime {
    pub id: DbId,
    pub cinema_id: DbId,
    pub movie_id: DbId,
    pub show_date: NaiveDate,
    pub show_time: NaiveTime,
    pub capacity: i32,
}

/// Showtime joined with its cinema, cinema type, movie and booking count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShowtimeDetail {
    pub id: DbId,
    pub cinema_id: DbId,
    pub cinema_name: String,
    pub location: String,
    pub type_name: String,
    pub price_cents: Cents,
    pub movie_id: DbId,
    pub movie_title: String,
    pub show_date: NaiveDate,
    pub show_time: NaiveTime,
    pub capacity: i32,
    pub booked_seats: i64,
}

impl ShowtimeDetail {
    pub fn price_label(&self) -> String {
        format_cents(self.price_cents)
    }

    /// `HH:MM` without seconds.
    pub fn time_label(&self) -> String {
        self.show_time.format("%H:%M").to_string()
    }

    pub fn seats_left(&self) -> i64 {
        (i64::from(self.capacity) - self.booked_seats).max(0)
    }
}

/// DTO for scheduling a showtime.
#[derive(Debug, Clone)]
pub struct CreateShowtime {
    pub cinema_id: DbId,
    pub movie_id: DbId,
    pub show_date: NaiveDate,
    pub show_time: NaiveTime,
    pub capacity: i32,
}
