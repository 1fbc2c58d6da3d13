pub mod auth;
pub mod cart;
pub mod course;
pub mod enrollment;
pub mod health;
pub mod notification;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                         register (public)
/// /auth/login                            login (public)
/// /auth/profile                          get, update (auth required)
///
/// /courses                               list (public), create (teacher/admin)
/// /courses/{id}                          get (public), update (teacher/admin), delete (admin)
/// /courses/enrolled/my-courses           own enrollments (auth required)
///
/// /enrollments                           list own, enroll (auth required)
/// /enrollments/{id}                      unenroll (auth required)
/// /enrollments/{id}/progress             update progress (auth required)
///
/// /cart                                  get, clear (auth required)
/// /cart/items                            add, set quantity (auth required)
/// /cart/items/{course_id}                remove line (auth required)
/// /cart/checkout                         enroll in cart courses (auth required)
///
/// /notify/cart                           cart-add notification (public)
/// /notify/user/{id}                      list (configurable auth)
/// /notify/user/{id}/unread-count         unread count (configurable auth)
/// /notify/{id}/read                      mark read (auth required)
/// /notify/read-all                       mark all read (auth required)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/courses", course::router())
        .nest("/enrollments", enrollment::router())
        .nest("/cart", cart::router())
        .nest("/notify", notification::router())
}
