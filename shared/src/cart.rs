//! Cart lines and the pure arithmetic over them
//!
//! A cart is an ordered sequence of [`CartLine`]s. A line is identified by
//! the combination `(productId, size, color)`; adding the same combination
//! again accumulates quantity instead of appending a duplicate line. The
//! functions here are pure; persistence and per-owner locking live in the
//! server's cart store.

use crate::error::DomainError;
use crate::money::{self, MAX_QUANTITY};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a cart: an immutable product snapshot plus a quantity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product ID in the catalog
    pub product_id: String,
    /// Product name snapshot
    pub name: String,
    /// Product image URL snapshot
    #[serde(default)]
    pub image: String,
    /// Unit price snapshot at the time the line was added
    pub price: f64,
    /// Selected size
    pub size: String,
    /// Selected color
    pub color: String,
    /// Quantity (>= 1)
    pub quantity: i32,
}

impl CartLine {
    /// Whether this line carries the given `(productId, size, color)` key
    pub fn matches(&self, product_id: &str, size: &str, color: &str) -> bool {
        self.product_id == product_id && self.size == size && self.color == color
    }
}

/// Add a line: accumulate quantity onto a matching line, else append
///
/// Validates the price and quantity bounds first; an accumulation that
/// would push the line past [`MAX_QUANTITY`] is rejected.
pub fn add_line(lines: &mut Vec<CartLine>, line: CartLine) -> Result<(), DomainError> {
    money::validate_price(line.price)?;
    money::validate_quantity(line.quantity)?;

    if let Some(existing) = lines
        .iter_mut()
        .find(|l| l.matches(&line.product_id, &line.size, &line.color))
    {
        let merged = existing.quantity.saturating_add(line.quantity);
        if merged > MAX_QUANTITY {
            return Err(DomainError::validation(format!(
                "quantity exceeds maximum allowed ({}), got {}",
                MAX_QUANTITY, merged
            )));
        }
        existing.quantity = merged;
    } else {
        lines.push(line);
    }
    Ok(())
}

/// Set the quantity of an existing line
///
/// Fails NotFound if no line carries the key. Quantities below 1 are the
/// caller's cue to remove the line instead; this function rejects them.
pub fn set_line_quantity(
    lines: &mut [CartLine],
    product_id: &str,
    size: &str,
    color: &str,
    quantity: i32,
) -> Result<(), DomainError> {
    money::validate_quantity(quantity)?;
    let line = lines
        .iter_mut()
        .find(|l| l.matches(product_id, size, color))
        .ok_or_else(|| {
            DomainError::not_found(format!(
                "cart line {product_id} ({size}/{color}) not found"
            ))
        })?;
    line.quantity = quantity;
    Ok(())
}

/// Remove a line; removing an absent line is a successful no-op
///
/// Returns whether a line was actually removed.
pub fn remove_line(lines: &mut Vec<CartLine>, product_id: &str, size: &str, color: &str) -> bool {
    let before = lines.len();
    lines.retain(|l| !l.matches(product_id, size, color));
    lines.len() != before
}

/// Merge guest lines into user lines
///
/// Matching keys get their quantities summed (clamped at [`MAX_QUANTITY`]
/// so the merge is total and never fails); unmatched guest lines are
/// appended in their original order.
pub fn merge_lines(user_lines: &mut Vec<CartLine>, guest_lines: Vec<CartLine>) {
    for guest_line in guest_lines {
        if let Some(existing) = user_lines.iter_mut().find(|l| {
            l.matches(&guest_line.product_id, &guest_line.size, &guest_line.color)
        }) {
            existing.quantity = existing
                .quantity
                .saturating_add(guest_line.quantity)
                .min(MAX_QUANTITY);
        } else {
            user_lines.push(guest_line);
        }
    }
}

/// Total price: Σ line.price × line.quantity, computed in Decimal
pub fn compute_total(lines: &[CartLine]) -> f64 {
    let total: Decimal = lines
        .iter()
        .map(|l| money::line_total(l.price, l.quantity))
        .sum();
    money::to_f64(total)
}
