//! Pure domain logic for the EduVillage backend.
//!
//! Nothing in this crate touches the database or HTTP; handlers and
//! repositories call into it for validation and derived values.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod course;
pub mod enrollment;
pub mod error;
pub mod notification;
pub mod roles;
pub mod types;
