//! Checkout document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{CartLine, OwnerKey, PaymentMethod, PaymentStatus, ShippingAddress};
use surrealdb::RecordId;

use super::serde_helpers;

/// Intent-to-purchase record with an immutable snapshot of the cart
///
/// Exactly one of `user_id` / `guest_id` is set at creation; a
/// guest-created checkout keeps its `guest_id` and additionally gets
/// `user_id` stamped when an authenticated user finalizes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
    /// Value copy of the cart lines at creation; never mutated afterwards
    pub items: Vec<CartLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    /// Snapshot total, recomputed from the lines at creation
    pub total_price: f64,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub is_finalized: bool,
    pub created_at: DateTime<Utc>,
}

impl Checkout {
    /// Build a new pending checkout from a cart snapshot
    pub fn new(
        owner: &OwnerKey,
        items: Vec<CartLine>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
        total_price: f64,
    ) -> Self {
        let (user_id, guest_id) = match owner {
            OwnerKey::User(id) => (Some(id.clone()), None),
            OwnerKey::Guest(id) => (None, Some(id.clone())),
        };
        Self {
            id: None,
            user_id,
            guest_id,
            items,
            shipping_address,
            payment_method,
            total_price,
            payment_status: PaymentStatus::Pending,
            payment_details: None,
            paid_at: None,
            is_finalized: false,
            created_at: Utc::now(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status.is_paid()
    }

    /// Whether `owner` created this checkout
    ///
    /// User checkouts match on `user_id`, guest checkouts on `guest_id`.
    pub fn owned_by(&self, owner: &OwnerKey) -> bool {
        match owner {
            OwnerKey::User(id) => self.user_id.as_deref() == Some(id.as_str()),
            OwnerKey::Guest(id) => {
                self.user_id.is_none() && self.guest_id.as_deref() == Some(id.as_str())
            }
        }
    }
}
