//! Payment model.

use cinestream_core::money::format_cents;
use cinestream_core::types::{Cents, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub user_id: DbId,
    pub amount_cents: Cents,
    pub payment_method: String,
    pub payment_date: Timestamp,
    pub purpose: String,
}

impl Payment {
    pub fn amount_label(&self) -> String {
        format_cents(self.amount_cents)
    }

    pub fn date_label(&self) -> String {
        self.payment_date.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Payment joined with the paying user's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub amount_cents: Cents,
    pub payment_method: String,
    pub payment_date: Timestamp,
    pub purpose: String,
}

impl PaymentDetail {
    pub fn amount_label(&self) -> String {
        format_cents(self.amount_cents)
    }

    pub fn date_label(&self) -> String {
        self.payment_date.format("%Y-%m-%d %H:%M").to_string()
    }
}
