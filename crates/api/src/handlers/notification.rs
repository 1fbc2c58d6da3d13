//! Handlers for in-app notifications.
//!
//! Notifications are polled by the client. The cart-add notification also
//! tries to send an email, but a mail failure never undoes the stored
//! notification.

use axum::extract::{Path, State};
use axum::Json;
use eduvillage_core::error::CoreError;
use eduvillage_core::notification::{
    cart_add_email_body, cart_add_message, CART_ADD_EMAIL_SUBJECT, CART_ADD_TITLE,
};
use eduvillage_core::types::DbId;
use eduvillage_db::models::notification::{CreateNotification, Notification};
use eduvillage_db::models::user::User;
use eduvillage_db::repositories::{NotificationRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /notify/cart`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartNotificationRequest {
    pub user_id: DbId,
    pub course_name: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct CartNotificationResponse {
    pub success: bool,
    pub notification: Notification,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Gate for reading another user's notifications.
///
/// Open unless `NOTIFICATIONS_REQUIRE_AUTH` is set, in which case the caller
/// must be the addressee or an admin. While open, the `Authorization` header
/// is not looked at, so a stale token does not turn into a 401.
fn authorize_listing(
    state: &AppState,
    caller: Result<MaybeAuthUser, AppError>,
    user_id: DbId,
) -> AppResult<()> {
    if !state.config.notifications_require_auth {
        return Ok(());
    }
    let MaybeAuthUser(caller) = caller?;
    let caller = caller.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("No token provided".into()))
    })?;
    if caller.user_id != user_id && !caller.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot read another user's notifications".into(),
        )));
    }
    Ok(())
}

/// Send the cart-add email, logging instead of failing.
async fn send_cart_email(state: &AppState, user: &User, course_name: &str, price: f64) {
    let Some(mailer) = state.mailer.as_ref() else {
        tracing::debug!(user_id = user.id, "Email not configured, skipping cart email");
        return;
    };
    let body = cart_add_email_body(&user.name, course_name, price);
    if let Err(e) = mailer
        .send(&user.email, CART_ADD_EMAIL_SUBJECT, &body)
        .await
    {
        tracing::warn!(user_id = user.id, error = %e, "Failed to send cart email");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/notify/cart
pub async fn notify_cart_add(
    State(state): State<AppState>,
    Json(input): Json<CartNotificationRequest>,
) -> AppResult<Json<CartNotificationResponse>> {
    let user = UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;

    let notification = NotificationRepo::create(
        &state.pool,
        &CreateNotification {
            user_id: user.id,
            title: CART_ADD_TITLE.to_string(),
            message: cart_add_message(&input.course_name, input.price),
        },
    )
    .await?;

    send_cart_email(&state, &user, &input.course_name, input.price).await;

    Ok(Json(CartNotificationResponse {
        success: true,
        notification,
    }))
}

/// GET /api/notify/user/{user_id}
pub async fn list_for_user(
    caller: Result<MaybeAuthUser, AppError>,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<Vec<Notification>>> {
    authorize_listing(&state, caller, user_id)?;
    let notifications = NotificationRepo::list_for_user(&state.pool, user_id).await?;
    Ok(Json(notifications))
}

/// GET /api/notify/user/{user_id}/unread-count
pub async fn unread_count(
    caller: Result<MaybeAuthUser, AppError>,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<UnreadCountResponse>> {
    authorize_listing(&state, caller, user_id)?;
    let count = NotificationRepo::unread_count(&state.pool, user_id).await?;
    Ok(Json(UnreadCountResponse { count }))
}

/// POST /api/notify/{id}/read
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Notification>> {
    let notification = NotificationRepo::mark_read(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }))?;
    Ok(Json(notification))
}

/// POST /api/notify/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<MarkAllReadResponse>> {
    let updated = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
