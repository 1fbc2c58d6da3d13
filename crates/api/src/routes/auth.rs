use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /register    -> register
/// POST   /login       -> login
/// GET    /profile     -> get_profile
/// PUT    /profile     -> update_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/profile",
            get(auth::get_profile).put(auth::update_profile),
        )
}
