//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed session tokens.
//! - [`cookie`] -- the `session` cookie that carries the token.

pub mod cookie;
pub mod jwt;
pub mod password;
