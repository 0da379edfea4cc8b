//! Checkout Repository
//!
//! Checkouts are append-mostly: items, address and totals are frozen at
//! creation; only payment fields and the finalize flag ever change.
//! Finalization runs as a conditional update so that exactly one of two
//! racing callers observes the flag flip.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::Checkout;
use chrono::{DateTime, Utc};
use shared::PaymentStatus;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "checkout";

#[derive(Clone, Debug)]
pub struct CheckoutRepository {
    base: BaseRepository,
}

impl CheckoutRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new checkout record
    pub async fn create(&self, checkout: Checkout) -> RepoResult<Checkout> {
        let created: Option<Checkout> = self.base.db().create(TABLE).content(checkout).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create checkout".to_string()))
    }

    /// Find a checkout by its record id (`checkout:xxx`)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Checkout>> {
        let record_id = parse_record_id(TABLE, id)?;
        let checkout: Option<Checkout> = self.base.db().select(record_id).await?;
        Ok(checkout)
    }

    /// Overwrite the payment fields of a checkout
    pub async fn set_payment(
        &self,
        id: &RecordId,
        status: PaymentStatus,
        details: Option<serde_json::Value>,
        paid_at: Option<DateTime<Utc>>,
    ) -> RepoResult<Checkout> {
        let updated: Vec<Checkout> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET paymentStatus = $status, paymentDetails = $details, \
                 paidAt = $paid RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("status", status))
            .bind(("details", details))
            .bind(("paid", paid_at))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("Checkout no longer exists".to_string()))
    }

    /// Atomically flip `isFinalized` and bind the checkout to a user
    ///
    /// The update only applies while the flag is still false, so under a
    /// race exactly one caller gets the row back; the other gets `None`
    /// and must look up the order the winner created.
    pub async fn finalize_cas(
        &self,
        id: &RecordId,
        user_id: &str,
    ) -> RepoResult<Option<Checkout>> {
        let updated: Vec<Checkout> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET isFinalized = true, userId = $user \
                 WHERE isFinalized = false RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }
}
