//! Payment and order status enums shared across the backend

use serde::{Deserialize, Serialize};

/// Payment status of a checkout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Awaiting payment capture
    #[default]
    Pending,
    /// Payment captured
    Paid,
}

impl PaymentStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

/// Supported payment method
///
/// Cash on delivery is the only method today; it captures immediately
/// when payment is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    Cod,
}

/// Fulfillment status of an order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Newly created, being prepared
    #[default]
    Processing,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer (terminal)
    Delivered,
    /// Cancelled before delivery (terminal)
    Cancelled,
}

impl OrderStatus {
    /// Whether a transition to `next` is allowed
    ///
    /// Status only moves forward: PROCESSING → SHIPPED → DELIVERED, with
    /// CANCELLED reachable until the order is delivered. Terminal states
    /// admit nothing, including themselves.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Processing, Shipped)
                | (Processing, Delivered)
                | (Processing, Cancelled)
                | (Shipped, Delivered)
                | (Shipped, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Paid).unwrap(),
            "\"PAID\""
        );
        assert_eq!(serde_json::to_string(&PaymentMethod::Cod).unwrap(), "\"COD\"");
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).unwrap(),
            "\"PROCESSING\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"CANCELLED\"").unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn test_forward_transitions_allowed() {
        use OrderStatus::*;
        assert!(Processing.can_transition_to(Shipped));
        assert!(Processing.can_transition_to(Delivered));
        assert!(Processing.can_transition_to(Cancelled));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Shipped.can_transition_to(Cancelled));
    }

    #[test]
    fn test_backward_and_terminal_transitions_rejected() {
        use OrderStatus::*;
        assert!(!Shipped.can_transition_to(Processing));
        assert!(!Delivered.can_transition_to(Shipped));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Processing));
        // Self-transitions are not moves
        assert!(!Processing.can_transition_to(Processing));
        assert!(!Delivered.can_transition_to(Delivered));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
        assert_eq!(OrderStatus::default(), OrderStatus::Processing);
    }

    #[test]
    fn test_terminal_predicates() {
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Delivered.is_delivered());
        assert!(!OrderStatus::Shipped.is_delivered());
    }
}
