//! Decimal money arithmetic.
//!
//! Monetary amounts travel through the API and the database as plain JSON
//! numbers (`f64`). Anything that adds or multiplies them lifts the value
//! into `Decimal` first and rounds half-up to cents before it leaves this
//! module, so accumulated float error never reaches a stored total.

use crate::error::DomainError;
use rust_decimal::prelude::*;

/// Highest unit price a line may carry (1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Highest quantity a line may carry
pub const MAX_QUANTITY: i32 = 9999;

/// Round to cents, midpoint away from zero
#[inline]
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Lift an `f64` into `Decimal`; unrepresentable values collapse to zero.
/// [`validate_price`] rejects those before any arithmetic sees them.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Back to `f64` for storage, rounded to cents
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round2(value).to_f64().unwrap_or_default()
}

/// Validate that a unit price is finite, positive and within bounds
pub fn validate_price(price: f64) -> Result<(), DomainError> {
    if !price.is_finite() {
        return Err(DomainError::validation(format!(
            "price must be a finite number, got {}",
            price
        )));
    }
    if price <= 0.0 {
        return Err(DomainError::validation(format!(
            "price must be positive, got {}",
            price
        )));
    }
    if price > MAX_PRICE {
        return Err(DomainError::validation(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        )));
    }
    Ok(())
}

/// Validate that a quantity is positive and within bounds
pub fn validate_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity < 1 {
        return Err(DomainError::validation(format!(
            "quantity must be at least 1, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(DomainError::validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// Price × quantity as exact decimal, rounded to cents
pub fn line_total(price: f64, quantity: i32) -> Decimal {
    round2(to_decimal(price) * Decimal::from(quantity))
}
