//! Cinema and cinema type models and DTOs.

use cinestream_core::money::format_cents;
use cinestream_core::types::{Cents, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A pricing tier from the `cinema_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CinemaType {
    pub id: DbId,
    pub type_name: String,
    pub price_cents: Cents,
}

impl CinemaType {
    pub fn price_label(&self) -> String {
        format_cents(self.price_cents)
    }
}

/// DTO for creating a cinema type.
#[derive(Debug, Clone)]
pub struct CreateCinemaType {
    pub type_name: String,
    pub price_cents: Cents,
}

/// DTO for updating a cinema type. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateCinemaType {
    pub type_name: Option<String>,
    pub price_cents: Option<Cents>,
}

/// A cinema row from the `cinemas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cinema {
    pub id: DbId,
    pub name: String,
    pub location: String,
    pub type_id: DbId,
}

/// Cinema joined with its type name and ticket price.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CinemaWithType {
    pub id: DbId,
    pub name: String,
    pub location: String,
    pub type_id: DbId,
    pub type_name: String,
    pub price_cents: Cents,
}

impl CinemaWithType {
    pub fn price_label(&self) -> String {
        format_cents(self.price_cents)
    }
}

/// DTO for creating a cinema.
#[derive(Debug, Clone)]
pub struct CreateCinema {
    pub name: String,
    pub location: String,
    pub type_id: DbId,
}

/// DTO for updating a cinema. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateCinema {
    pub name: Option<String>,
    pub location: Option<String>,
    pub type_id: Option<DbId>,
}
