//! Cart quantity rules and totals.
//!
//! Totals are computed from the *current* course prices each time a cart is
//! read; prices are never snapshotted into cart lines, so a price change
//! after add-to-cart is reflected in the displayed total.

use serde::Serialize;

use crate::error::CoreError;

/// Quantity used when an add-to-cart request omits it.
pub const DEFAULT_ADD_QUANTITY: i32 = 1;

/// Upper bound on the quantity of a single cart line.
pub const MAX_LINE_QUANTITY: i32 = 99;

/// Outcome of a set-quantity request on an existing cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// Quantity was zero or negative: drop the line.
    Remove,
    /// Overwrite the line's quantity.
    Set(i32),
}

impl QuantityChange {
    pub fn from_requested(quantity: i32) -> Self {
        if quantity <= 0 {
            QuantityChange::Remove
        } else {
            QuantityChange::Set(quantity)
        }
    }
}

/// Validate the quantity of an add-to-cart request.
pub fn validate_add_quantity(quantity: i32) -> Result<(), CoreError> {
    if quantity < 1 {
        return Err(CoreError::Validation(format!(
            "quantity must be at least 1, got {quantity}"
        )));
    }
    validate_set_quantity(quantity)
}

/// Validate the quantity of a set-quantity request. Zero or less is allowed
/// and removes the line.
pub fn validate_set_quantity(quantity: i32) -> Result<(), CoreError> {
    if quantity > MAX_LINE_QUANTITY {
        return Err(CoreError::Validation(format!(
            "quantity must be at most {MAX_LINE_QUANTITY}, got {quantity}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub total_items: i64,
    pub total_price: f64,
}

/// Sum quantities and `price * quantity` over `(unit_price, quantity)` pairs.
pub fn compute_totals<I>(lines: I) -> CartTotals
where
    I: IntoIterator<Item = (f64, i32)>,
{
    lines
        .into_iter()
        .fold(CartTotals::default(), |acc, (price, quantity)| CartTotals {
            total_items: acc.total_items + i64::from(quantity),
            total_price: acc.total_price + price * f64::from(quantity),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_negative_quantity_removes() {
        assert_eq!(QuantityChange::from_requested(0), QuantityChange::Remove);
        assert_eq!(QuantityChange::from_requested(-3), QuantityChange::Remove);
        assert_eq!(QuantityChange::from_requested(2), QuantityChange::Set(2));
    }

    #[test]
    fn totals_sum_price_times_quantity() {
        let totals = compute_totals([(50.0, 2), (75.0, 1), (100.0, 3)]);
        assert_eq!(totals.total_items, 6);
        assert_eq!(totals.total_price, 475.0);
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        assert_eq!(compute_totals(Vec::new()), CartTotals::default());
    }

    #[test]
    fn add_quantity_must_be_positive() {
        assert!(validate_add_quantity(1).is_ok());
        assert!(validate_add_quantity(0).is_err());
    }

    #[test]
    fn quantities_are_capped_per_line() {
        assert!(validate_add_quantity(MAX_LINE_QUANTITY).is_ok());
        assert!(validate_add_quantity(MAX_LINE_QUANTITY + 1).is_err());
        assert!(validate_add_quantity(i32::MAX).is_err());
        assert!(validate_set_quantity(0).is_ok());
        assert!(validate_set_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }
}
