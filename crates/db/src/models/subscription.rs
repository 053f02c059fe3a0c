//! Subscription model and DTOs.

use chrono::NaiveDate;
use cinestream_core::money::format_cents;
use cinestream_core::types::{Cents, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `subscriptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub user_id: DbId,
    pub platform_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub plan_type: String,
    pub payment_id: Option<DbId>,
}

/// Subscription joined with its platform, user and the amount paid.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubscriptionDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub platform_id: DbId,
    pub platform_name: String,
    pub website: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub plan_type: String,
    /// `None` when the payment row has been deleted.
    pub amount_cents: Option<Cents>,
}

impl SubscriptionDetail {
    pub fn amount_label(&self) -> String {
        self.amount_cents.map(format_cents).unwrap_or_else(|| "-".to_string())
    }

    /// Whether the subscription covers `today`.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.start_date <= today && today <= self.end_date
    }
}

/// DTO for the paired payment + subscription write.
#[derive(Debug, Clone)]
pub struct NewPaidSubscription {
    pub user_id: DbId,
    pub platform_id: DbId,
    pub plan_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub amount_cents: Cents,
    pub payment_method: String,
    pub purpose: String,
}

/// DTO for editing a subscription. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateSubscription {
    pub platform_id: Option<DbId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub plan_type: Option<String>,
}
