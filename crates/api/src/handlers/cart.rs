//! Handlers for the `/cart` resource.
//!
//! Every mutation responds with the full cart so clients can re-render
//! lines and totals from one payload.

use axum::extract::{Path, State};
use axum::Json;
use eduvillage_core::cart::{
    validate_add_quantity, validate_set_quantity, QuantityChange, DEFAULT_ADD_QUANTITY,
};
use eduvillage_core::error::CoreError;
use eduvillage_core::types::DbId;
use eduvillage_db::models::cart::{Cart, CartItemInput, CheckoutReceipt};
use eduvillage_db::repositories::{CartRepo, CourseRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// GET /api/cart
pub async fn get_cart(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Cart>> {
    Ok(Json(CartRepo::get_cart(&state.pool, auth.user_id).await?))
}

/// POST /api/cart/items
///
/// Adds `quantity` (default 1, at most 99) of a course; an existing line is
/// incremented up to the same cap.
pub async fn add_item(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CartItemInput>,
) -> AppResult<Json<Cart>> {
    let quantity = input.quantity.unwrap_or(DEFAULT_ADD_QUANTITY);
    validate_add_quantity(quantity)?;

    if CourseRepo::find_by_id(&state.pool, input.course_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: input.course_id,
        }));
    }

    let line = CartRepo::add_item(&state.pool, auth.user_id, input.course_id, quantity).await?;
    tracing::debug!(
        user_id = auth.user_id,
        course_id = input.course_id,
        quantity = line.quantity,
        "Cart line added"
    );
    Ok(Json(CartRepo::get_cart(&state.pool, auth.user_id).await?))
}

/// PUT /api/cart/items
///
/// Overwrites a line's quantity; zero or less removes the line.
pub async fn set_quantity(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CartItemInput>,
) -> AppResult<Json<Cart>> {
    let quantity = input.quantity.ok_or_else(|| {
        AppError::Core(CoreError::Validation("quantity is required".into()))
    })?;
    validate_set_quantity(quantity)?;

    let found = match QuantityChange::from_requested(quantity) {
        QuantityChange::Remove => {
            CartRepo::remove_item(&state.pool, auth.user_id, input.course_id).await?
        }
        QuantityChange::Set(quantity) => {
            CartRepo::set_quantity(&state.pool, auth.user_id, input.course_id, quantity).await?
        }
    };
    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Cart item",
            id: input.course_id,
        }));
    }

    Ok(Json(CartRepo::get_cart(&state.pool, auth.user_id).await?))
}

/// DELETE /api/cart/items/{course_id}
pub async fn remove_item(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<Cart>> {
    CartRepo::remove_item(&state.pool, auth.user_id, course_id).await?;
    Ok(Json(CartRepo::get_cart(&state.pool, auth.user_id).await?))
}

/// DELETE /api/cart
pub async fn clear(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Cart>> {
    let removed = CartRepo::clear(&state.pool, auth.user_id).await?;
    tracing::debug!(user_id = auth.user_id, removed, "Cart cleared");
    Ok(Json(Cart::new(auth.user_id, Vec::new())))
}

/// POST /api/cart/checkout
///
/// Enrolls the caller in every course in the cart and empties it.
pub async fn checkout(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<CheckoutReceipt>> {
    let receipt = CartRepo::checkout(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Validation("Cart is empty".into())))?;

    tracing::info!(
        user_id = auth.user_id,
        enrolled = receipt.enrollments.len(),
        skipped = receipt.skipped_course_ids.len(),
        total_price = receipt.totals.total_price,
        "Checkout completed"
    );
    Ok(Json(receipt))
}
