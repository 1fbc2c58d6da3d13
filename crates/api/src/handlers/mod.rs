//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod cart;
pub mod course;
pub mod enrollment;
pub mod notification;

use serde::Serialize;

/// `{ "message": ... }` body returned by delete-style endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
