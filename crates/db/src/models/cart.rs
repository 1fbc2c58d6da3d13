//! Cart line model and the assembled cart response.

use eduvillage_core::cart::{compute_totals, CartTotals};
use eduvillage_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::course::Course;
use crate::models::enrollment::EnrollmentDetail;

/// A row from the `cart_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct CartItem {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub quantity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart line with the live course attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub course_id: DbId,
    pub quantity: i32,
    pub course: Course,
}

/// A user's cart. An absent cart is an empty one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: DbId,
    pub items: Vec<CartLine>,
    #[serde(flatten)]
    pub totals: CartTotals,
}

impl Cart {
    pub fn new(user_id: DbId, items: Vec<CartLine>) -> Self {
        let totals = compute_totals(items.iter().map(|line| (line.course.price, line.quantity)));
        Self {
            user_id,
            items,
            totals,
        }
    }
}

/// Body of add-to-cart and set-quantity requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    pub course_id: DbId,
    pub quantity: Option<i32>,
}

/// Result of a checkout: the enrollments it created and what was charged.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub enrollments: Vec<EnrollmentDetail>,
    pub skipped_course_ids: Vec<DbId>,
    #[serde(flatten)]
    pub totals: CartTotals,
}
