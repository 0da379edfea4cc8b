//! Order document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{CartLine, OrderStatus, PaymentMethod, ShippingAddress};
use surrealdb::RecordId;

use super::serde_helpers;

/// Durable post-purchase record, created once per finalized checkout
///
/// `checkout_id` is unique across the table; the finalize compare-and-set
/// on the checkout guarantees a single creation. `is_delivered` is
/// monotonic: once true it never reverts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Originating checkout reference
    #[serde(with = "serde_helpers::record_id")]
    pub checkout_id: RecordId,
    pub user_id: String,
    pub items: Vec<CartLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub total_price: f64,
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
