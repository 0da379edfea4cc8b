//! Request text limits.
//!
//! SurrealDB does not enforce field lengths, so every free-text input is
//! capped at the HTTP boundary. The caps are generous for honest clients
//! and mainly stop multi-megabyte strings from reaching storage.

use shared::ShippingAddress;

use crate::utils::AppError;

/// Product names and product ids
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: size, color, city, country, recipient names
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Street addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Phone numbers
pub const MAX_PHONE_LEN: usize = 32;

/// Postal codes
pub const MAX_POSTAL_CODE_LEN: usize = 20;

fn over_limit(field: &str, len: usize, max_len: usize) -> AppError {
    AppError::validation(format!("{field} is {len} chars, limit is {max_len}"))
}

/// Required text: reject blank and over-length values
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be blank")));
    }
    validate_text_len(value, field, max_len)
}

/// Length cap only; empty passes
pub fn validate_text_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.len() > max_len {
        return Err(over_limit(field, value.len(), max_len));
    }
    Ok(())
}

/// Optional text: absent passes, present goes through the length cap
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_text_len(v, field, max_len),
        None => Ok(()),
    }
}

/// Validate a shipping address: every field required, each within its cap.
///
/// Presence is re-checked by `ShippingAddress::validate` at checkout
/// creation; the length caps only exist at this boundary.
pub fn validate_shipping_address(addr: &ShippingAddress) -> Result<(), AppError> {
    validate_required_text(&addr.first_name, "firstName", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&addr.last_name, "lastName", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&addr.address, "address", MAX_ADDRESS_LEN)?;
    validate_required_text(&addr.city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&addr.postal_code, "postalCode", MAX_POSTAL_CODE_LEN)?;
    validate_required_text(&addr.country, "country", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&addr.phone, "phone", MAX_PHONE_LEN)?;
    Ok(())
}
