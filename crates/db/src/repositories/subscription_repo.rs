//! Repository for the `subscriptions` table.

use cinestream_core::types::DbId;
use sqlx::PgPool;

use crate::models::payment::Payment;
use crate::models::subscription::{
    NewPaidSubscription, Subscription, SubscriptionDetail, UpdateSubscription,
};
use crate::repositories::PaymentRepo;

const COLUMNS: &str = "id, user_id, platform_id, start_date, end_date, plan_type, payment_id";

const DETAIL_SELECT: &str = "SELECT s.id, s.user_id, u.name AS user_name, \
        s.platform_id, p.platform_name, p.website, \
        s.start_date, s.end_date, s.plan_type, pay.amount_cents \
     FROM subscriptions s \
     JOIN users u ON u.id = s.user_id \
     JOIN streaming_platforms p ON p.id = s.platform_id \
     LEFT JOIN payments pay ON pay.id = s.payment_id";

/// Provides CRUD operations for subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Record the payment and then the subscription it pays for, in one
    /// transaction. Either both rows are committed or neither is.
    pub async fn subscribe(
        pool: &PgPool,
        input: &NewPaidSubscription,
    ) -> Result<(Payment, Subscription), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let payment = PaymentRepo::insert(
            &mut tx,
            input.user_id,
            input.amount_cents,
            &input.payment_method,
            &input.purpose,
        )
        .await?;

        let query = format!(
            "INSERT INTO subscriptions (user_id, platform_id, start_date, end_date, plan_type, payment_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let subscription = sqlx::query_as::<_, Subscription>(&query)
            .bind(input.user_id)
            .bind(input.platform_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.plan_type)
            .bind(payment.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((payment, subscription))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscriptions WHERE id = $1");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's subscriptions, most recent start first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SubscriptionDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE s.user_id = $1
             ORDER BY s.start_date DESC, s.id DESC"
        );
        sqlx::query_as::<_, SubscriptionDetail>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Every subscription, newest first.
    pub async fn list_detailed(pool: &PgPool) -> Result<Vec<SubscriptionDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY s.id DESC");
        sqlx::query_as::<_, SubscriptionDetail>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubscription,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET
                platform_id = COALESCE($2, platform_id),
                start_date = COALESCE($3, start_date),
                end_date = COALESCE($4, end_date),
                plan_type = COALESCE($5, plan_type)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(id)
            .bind(input.platform_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.plan_type)
            .fetch_optional(pool)
            .await
    }

    /// Delete a subscription. Its payment row is kept as financial history.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
