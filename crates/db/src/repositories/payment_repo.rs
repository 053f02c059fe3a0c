//! Repository for the `payments` table.
//!
//! Payments are only ever written as part of a subscription (see
//! [`SubscriptionRepo::subscribe`](crate::repositories::SubscriptionRepo::subscribe)).

use cinestream_core::types::{Cents, DbId};
use sqlx::PgPool;

use crate::models::payment::{Payment, PaymentDetail};

const COLUMNS: &str = "id, user_id, amount_cents, payment_method, payment_date, purpose";

/// Provides read access to payments and the transactional insert.
pub struct PaymentRepo;

impl PaymentRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's payments, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments WHERE user_id = $1 ORDER BY payment_date DESC, id DESC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Every payment with the payer's name, newest first.
    pub async fn list_detailed(pool: &PgPool) -> Result<Vec<PaymentDetail>, sqlx::Error> {
        sqlx::query_as::<_, PaymentDetail>(
            "SELECT p.id, p.user_id, u.name AS user_name, p.amount_cents, p.payment_method, \
                    p.payment_date, p.purpose \
             FROM payments p \
             JOIN users u ON u.id = p.user_id \
             ORDER BY p.payment_date DESC, p.id DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub(crate) async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        amount_cents: Cents,
        payment_method: &str,
        purpose: &str,
    ) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments (user_id, amount_cents, payment_method, purpose)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(user_id)
            .bind(amount_cents)
            .bind(payment_method)
            .bind(purpose)
            .fetch_one(&mut **tx)
            .await
    }
}
