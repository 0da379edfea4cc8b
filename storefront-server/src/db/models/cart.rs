//! Cart document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{CartLine, OwnerKey};
use surrealdb::RecordId;

use super::serde_helpers;

/// One cart per owner key ("guest:{id}" / "user:{id}")
///
/// `total_price` is derived: every mutation recomputes it from the lines
/// before the document is persisted, so it is never trusted from input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owner key, unique across the cart table
    pub owner_key: String,
    pub lines: Vec<CartLine>,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Fresh empty cart for an owner (not yet persisted)
    pub fn empty_for(owner: &OwnerKey) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            owner_key: owner.storage_key(),
            lines: Vec::new(),
            total_price: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Recompute `total_price` from the lines and bump `updated_at`
    pub fn refresh_totals(&mut self) {
        self.total_price = shared::cart::compute_total(&self.lines);
        self.updated_at = Utc::now();
    }
}
