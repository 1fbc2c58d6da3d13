use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::enrollment;
use crate::state::AppState;

/// Routes mounted at `/enrollments`.
///
/// ```text
/// GET    /                 -> list_mine
/// POST   /                 -> enroll
/// PUT    /{id}/progress    -> update_progress
/// DELETE /{id}             -> unenroll
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(enrollment::list_mine).post(enrollment::enroll))
        .route("/{id}/progress", put(enrollment::update_progress))
        .route("/{id}", delete(enrollment::unenroll))
}
