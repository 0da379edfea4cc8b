//! Order Repository
//!
//! Orders are created exactly once per finalized checkout; `checkoutId`
//! is the logical unique key that finalize retries look up.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Checkout, Order};
use chrono::{DateTime, Utc};
use shared::OrderStatus;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "shop_order";

#[derive(Clone, Debug)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Materialize an order from a finalized checkout
    ///
    /// Items, address, payment method and totals carry over verbatim;
    /// the order always starts in PROCESSING.
    pub async fn create_from_checkout(
        &self,
        checkout: &Checkout,
        user_id: &str,
    ) -> RepoResult<Order> {
        let checkout_id = checkout
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Checkout record has no id".to_string()))?;
        let order = Order {
            id: None,
            checkout_id,
            user_id: user_id.to_string(),
            items: checkout.items.clone(),
            shipping_address: checkout.shipping_address.clone(),
            payment_method: checkout.payment_method,
            total_price: checkout.total_price,
            is_paid: checkout.payment_status.is_paid(),
            paid_at: checkout.paid_at,
            is_delivered: false,
            delivered_at: None,
            status: OrderStatus::Processing,
            created_at: Utc::now(),
        };
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find an order by its record id (`shop_order:xxx`)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_record_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// Find the order created from a given checkout, if any
    ///
    /// `checkoutId` is stored in its string form, so the lookup binds the
    /// string too.
    pub async fn find_by_checkout(&self, checkout_id: &RecordId) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM shop_order WHERE checkoutId = $checkout LIMIT 1")
            .bind(("checkout", checkout_id.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// All orders belonging to a user, newest first
    pub async fn list_by_user(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM shop_order WHERE userId = $user ORDER BY createdAt DESC")
            .bind(("user", user_id.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// All orders in the store, newest first
    pub async fn list_all(&self) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM shop_order ORDER BY createdAt DESC")
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Overwrite the fulfillment fields of an order
    pub async fn update_status(
        &self,
        id: &RecordId,
        status: OrderStatus,
        is_delivered: bool,
        delivered_at: Option<DateTime<Utc>>,
    ) -> RepoResult<Order> {
        let updated: Vec<Order> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET status = $status, isDelivered = $delivered, \
                 deliveredAt = $deliveredAt RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("status", status))
            .bind(("delivered", is_delivered))
            .bind(("deliveredAt", delivered_at))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("Order no longer exists".to_string()))
    }

    /// Delete an order by id; returns whether a record existed
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing: Option<Order> = self.base.db().select(record_id.clone()).await?;
        if existing.is_none() {
            return Ok(false);
        }
        let _: Option<Order> = self.base.db().delete(record_id).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::TABLE;

    #[test]
    fn table_name_avoids_reserved_word() {
        // `order` is a SurrealQL keyword (ORDER BY), hence the prefix
        assert_eq!(TABLE, "shop_order");
    }
}
