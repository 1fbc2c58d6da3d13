//! Repository for the `cart_items` table.
//!
//! A cart has no row of its own: it is the set of a user's `cart_items`,
//! created implicitly by the first add and emptied by clear or checkout.

use std::collections::HashMap;

use eduvillage_core::cart::{compute_totals, MAX_LINE_QUANTITY};
use eduvillage_core::types::DbId;
use sqlx::{FromRow, PgPool};

use crate::models::cart::{Cart, CartItem, CartLine, CheckoutReceipt};
use crate::models::enrollment::EnrollmentRow;
use crate::repositories::{CourseRepo, EnrollmentRepo};

/// Column list for `cart_items` queries.
const COLUMNS: &str = "id, user_id, course_id, quantity, created_at, updated_at";

/// Cart line joined with the course's current price, read during checkout.
#[derive(Debug, FromRow)]
struct PricedLine {
    course_id: DbId,
    quantity: i32,
    price: f64,
}

/// Provides CRUD operations for shopping carts.
pub struct CartRepo;

impl CartRepo {
    /// List a user's cart lines in insertion order.
    pub async fn list_items(pool: &PgPool, user_id: DbId) -> Result<Vec<CartItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cart_items \
             WHERE user_id = $1 \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Load a user's cart with live course data and totals.
    ///
    /// A user who never added anything gets an empty cart.
    pub async fn get_cart(pool: &PgPool, user_id: DbId) -> Result<Cart, sqlx::Error> {
        let items = Self::list_items(pool, user_id).await?;
        let course_ids: Vec<DbId> = items.iter().map(|item| item.course_id).collect();
        let courses: HashMap<DbId, _> = CourseRepo::find_by_ids(pool, &course_ids)
            .await?
            .into_iter()
            .map(|course| (course.id, course))
            .collect();

        let lines = items
            .into_iter()
            .filter_map(|item| {
                courses.get(&item.course_id).map(|course| CartLine {
                    course_id: item.course_id,
                    quantity: item.quantity,
                    course: course.clone(),
                })
            })
            .collect();
        Ok(Cart::new(user_id, lines))
    }

    /// Add `quantity` of a course, incrementing an existing line.
    ///
    /// The line's quantity saturates at [`MAX_LINE_QUANTITY`].
    pub async fn add_item(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        quantity: i32,
    ) -> Result<CartItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO cart_items (user_id, course_id, quantity) \
             VALUES ($1, $2, LEAST($3, $4)) \
             ON CONFLICT ON CONSTRAINT uq_cart_items_user_course \
             DO UPDATE SET quantity = LEAST(cart_items.quantity + EXCLUDED.quantity, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(quantity)
            .bind(MAX_LINE_QUANTITY)
            .fetch_one(pool)
            .await
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// Returns `true` if the line exists.
    pub async fn set_quantity(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        quantity: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $3 WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(quantity)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a line. Returns `true` if it existed.
    pub async fn remove_item(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND course_id = $2")
            .bind(user_id)
            .bind(course_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every line. Returns the number of lines removed.
    pub async fn clear(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Enroll the user in every course in the cart and empty it.
    ///
    /// Runs in one transaction. Courses the user is already enrolled in are
    /// reported in `skipped_course_ids` and left out of the totals. Returns
    /// `None` for an empty cart.
    pub async fn checkout(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<CheckoutReceipt>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let lines = sqlx::query_as::<_, PricedLine>(
            "SELECT ci.course_id, ci.quantity, c.price \
             FROM cart_items ci \
             JOIN courses c ON c.id = ci.course_id \
             WHERE ci.user_id = $1 \
             ORDER BY ci.id ASC \
             FOR UPDATE OF ci",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            tx.rollback().await?;
            return Ok(None);
        }

        let enroll = "INSERT INTO enrollments (user_id, course_id) \
             VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_enrollments_user_course DO NOTHING \
             RETURNING id, user_id, course_id, progress, status, enrolled_at, \
                 last_accessed_at, created_at, updated_at";

        let mut enrolled = Vec::new();
        let mut skipped_course_ids = Vec::new();
        for line in &lines {
            let row = sqlx::query_as::<_, EnrollmentRow>(enroll)
                .bind(user_id)
                .bind(line.course_id)
                .fetch_optional(&mut *tx)
                .await?;
            match row {
                Some(row) => enrolled.push(row),
                None => skipped_course_ids.push(line.course_id),
            }
        }

        // Only the lines read above; a line committed meanwhile stays in the cart.
        let checked_out: Vec<DbId> = lines.iter().map(|line| line.course_id).collect();
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND course_id = ANY($2)")
            .bind(user_id)
            .bind(&checked_out)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let totals = compute_totals(
            lines
                .iter()
                .filter(|line| !skipped_course_ids.contains(&line.course_id))
                .map(|line| (line.price, line.quantity)),
        );
        let enrollments = EnrollmentRepo::with_details(pool, enrolled).await?;
        Ok(Some(CheckoutReceipt {
            enrollments,
            skipped_course_ids,
            totals,
        }))
    }
}
