use std::sync::Arc;

use eduvillage_mail::EmailDelivery;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: eduvillage_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// SMTP mailer; `None` when email is not configured.
    pub mailer: Option<Arc<EmailDelivery>>,
}
