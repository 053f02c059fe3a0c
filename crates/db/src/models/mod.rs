//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Joined "detail" rows used by listing pages
//! - Create DTOs for inserts and update DTOs (all `Option` fields) for edits

pub mod booking;
pub mod cinema;
pub mod dashboard;
pub mod movie;
pub mod payment;
pub mod platform;
pub mod recommendation;
pub mod showtime;
pub mod subscription;
pub mod user;
