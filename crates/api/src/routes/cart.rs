use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::cart;
use crate::state::AppState;

/// Routes mounted at `/cart`.
///
/// ```text
/// GET    /                      -> get_cart
/// DELETE /                      -> clear
/// POST   /items                 -> add_item
/// PUT    /items                 -> set_quantity
/// DELETE /items/{course_id}     -> remove_item
/// POST   /checkout              -> checkout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::get_cart).delete(cart::clear))
        .route("/items", post(cart::add_item).put(cart::set_quantity))
        .route("/items/{course_id}", delete(cart::remove_item))
        .route("/checkout", post(cart::checkout))
}
