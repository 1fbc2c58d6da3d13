use axum::routing::get;
use axum::Router;

use crate::handlers::{course, enrollment};
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /enrolled/my-courses    -> enrollment::list_mine
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(course::list).post(course::create))
        .route("/enrolled/my-courses", get(enrollment::list_mine))
        .route(
            "/{id}",
            get(course::get_by_id)
                .put(course::update)
                .delete(course::delete),
        )
}
