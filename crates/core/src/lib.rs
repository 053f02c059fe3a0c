//! Domain building blocks shared by the database and HTTP layers.
//!
//! Nothing in this crate performs I/O. It holds the closed role and
//! preference enums, the domain error type, and the parsing rules applied to
//! every form field before it reaches SQL.

pub mod error;
pub mod input;
pub mod money;
pub mod preference;
pub mod recommendation;
pub mod roles;
pub mod subscription;
pub mod types;
