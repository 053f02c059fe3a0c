//! Aggregates shown on the admin dashboard.

use cinestream_core::money::format_cents;
use cinestream_core::types::Cents;
use serde::Serialize;
use sqlx::FromRow;

/// Row counts and revenue across the whole catalog.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct AdminStats {
    pub users: i64,
    pub viewers: i64,
    pub admins: i64,
    pub movies: i64,
    pub cinemas: i64,
    pub showtimes: i64,
    pub platforms: i64,
    pub bookings: i64,
    pub subscriptions: i64,
    pub revenue_cents: Cents,
}

impl AdminStats {
    pub fn revenue_label(&self) -> String {
        format_cents(self.revenue_cents)
    }
}
