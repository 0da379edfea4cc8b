//! Shipping address carried on a checkout

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Shipping address snapshot; every field is required and non-blank
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Recipient first name
    pub first_name: String,
    /// Recipient last name
    pub last_name: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Postal code
    pub postal_code: String,
    /// Country
    pub country: String,
    /// Contact phone number
    pub phone: String,
}

impl ShippingAddress {
    /// Check that every field carries a non-blank value
    ///
    /// Length caps are the server's concern; here only presence is
    /// enforced so a checkout can never be created with a hole in its
    /// delivery data.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
            ("phone", &self.phone),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "shipping address field '{name}' is required"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_address() -> ShippingAddress {
        ShippingAddress {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address: "12 Analytical Row".to_string(),
            city: "London".to_string(),
            postal_code: "EC1A 1AA".to_string(),
            country: "UK".to_string(),
            phone: "+44 20 0000 0000".to_string(),
        }
    }

    #[test]
    fn test_full_address_is_valid() {
        assert!(full_address().validate().is_ok());
    }

    #[test]
    fn test_blank_field_is_rejected() {
        let mut addr = full_address();
        addr.city = "   ".to_string();
        let err = addr.validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("city")));
    }

    #[test]
    fn test_missing_wire_field_fails_deserialization() {
        let json = r#"{
            "firstName": "Ada",
            "lastName": "Lovelace",
            "address": "12 Analytical Row",
            "city": "London",
            "postalCode": "EC1A 1AA",
            "country": "UK"
        }"#;
        assert!(serde_json::from_str::<ShippingAddress>(json).is_err());
    }
}
