use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notify`.
///
/// ```text
/// POST   /cart                         -> notify_cart_add
/// GET    /user/{user_id}               -> list_for_user
/// GET    /user/{user_id}/unread-count  -> unread_count
/// POST   /{id}/read                    -> mark_read
/// POST   /read-all                     -> mark_all_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart", post(notification::notify_cart_add))
        .route("/user/{user_id}", get(notification::list_for_user))
        .route(
            "/user/{user_id}/unread-count",
            get(notification::unread_count),
        )
        .route("/{id}/read", post(notification::mark_read))
        .route("/read-all", post(notification::mark_all_read))
}
