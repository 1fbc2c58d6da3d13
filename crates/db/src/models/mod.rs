//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Serialize` response shape (camelCase on the wire)
//! - Input DTOs used by the repositories

pub mod cart;
pub mod course;
pub mod enrollment;
pub mod notification;
pub mod user;
