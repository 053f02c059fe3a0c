//! Aggregate queries for the admin dashboard.

use sqlx::PgPool;

use crate::models::dashboard::AdminStats;

/// Provides read-only aggregate queries.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Row counts per entity and total payment revenue.
    pub async fn stats(pool: &PgPool) -> Result<AdminStats, sqlx::Error> {
        sqlx::query_as::<_, AdminStats>(
            "SELECT \
                (SELECT COUNT(*) FROM users) AS users, \
                (SELECT COUNT(*) FROM viewers) AS viewers, \
                (SELECT COUNT(*) FROM admins) AS admins, \
                (SELECT COUNT(*) FROM movies) AS movies, \
                (SELECT COUNT(*) FROM cinemas) AS cinemas, \
                (SELECT COUNT(*) FROM showtimes) AS showtimes, \
                (SELECT COUNT(*) FROM streaming_platforms) AS platforms, \
                (SELECT COUNT(*) FROM bookings) AS bookings, \
                (SELECT COUNT(*) FROM subscriptions) AS subscriptions, \
                (SELECT COALESCE(SUM(amount_cents), 0) FROM payments)::BIGINT AS revenue_cents",
        )
        .fetch_one(pool)
        .await
    }
}
