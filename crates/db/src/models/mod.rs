//! Row models and request DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - The `Deserialize` request DTOs for the operations on that table

pub mod activity;
pub mod cursor;
pub mod lock;
pub mod presence;
pub mod session;
