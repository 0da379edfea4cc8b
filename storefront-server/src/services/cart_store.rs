//! Cart store - per-owner cart lifecycle
//!
//! Wraps [`CartRepository`] with a per-owner async mutex so concurrent
//! mutations of the same cart serialize instead of losing updates. Locks
//! are keyed by the owner storage key; different owners never contend.
//!
//! Every mutation recomputes `totalPrice` before persisting. A stored
//! total is never trusted or patched incrementally.

use dashmap::DashMap;
use shared::cart::{self, CartLine};
use shared::OwnerKey;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::Mutex;

use crate::AppResult;
use crate::db::models::Cart;
use crate::db::repository::CartRepository;

#[derive(Clone, Debug)]
pub struct CartStore {
    repo: CartRepository,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl CartStore {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: CartRepository::new(db),
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Mutex guarding one owner's cart
    ///
    /// The map entry guard is dropped before the caller awaits the lock.
    fn owner_lock(&self, owner_key: &str) -> Arc<Mutex<()>> {
        self.locks.entry(owner_key.to_string()).or_default().clone()
    }

    /// Load an owner's cart; owners without a stored cart get an empty one
    ///
    /// Reading never creates a record.
    pub async fn get_cart(&self, owner: &OwnerKey) -> AppResult<Cart> {
        let cart = self.repo.find_by_owner(&owner.storage_key()).await?;
        Ok(cart.unwrap_or_else(|| Cart::empty_for(owner)))
    }

    /// Add a line (product snapshot + quantity) to an owner's cart
    ///
    /// An existing `(productId, size, color)` line accumulates quantity.
    pub async fn add_item(&self, owner: &OwnerKey, line: CartLine) -> AppResult<Cart> {
        let key = owner.storage_key();
        let lock = self.owner_lock(&key);
        let _guard = lock.lock().await;

        let mut cart = self.get_cart(owner).await?;
        cart::add_line(&mut cart.lines, line)?;
        cart.refresh_totals();
        Ok(self.repo.upsert(cart).await?)
    }

    /// Set the quantity of an existing line
    ///
    /// Quantities below 1 degrade to a remove, so the operation succeeds
    /// even when the line is already gone.
    pub async fn update_quantity(
        &self,
        owner: &OwnerKey,
        product_id: &str,
        size: &str,
        color: &str,
        quantity: i32,
    ) -> AppResult<Cart> {
        if quantity < 1 {
            return self.remove_item(owner, product_id, size, color).await;
        }

        let key = owner.storage_key();
        let lock = self.owner_lock(&key);
        let _guard = lock.lock().await;

        let mut cart = self.get_cart(owner).await?;
        cart::set_line_quantity(&mut cart.lines, product_id, size, color, quantity)?;
        cart.refresh_totals();
        Ok(self.repo.upsert(cart).await?)
    }

    /// Remove a line; removing an absent line is a successful no-op
    pub async fn remove_item(
        &self,
        owner: &OwnerKey,
        product_id: &str,
        size: &str,
        color: &str,
    ) -> AppResult<Cart> {
        let key = owner.storage_key();
        let lock = self.owner_lock(&key);
        let _guard = lock.lock().await;

        let mut cart = self.get_cart(owner).await?;
        let removed = cart::remove_line(&mut cart.lines, product_id, size, color);
        if !removed {
            // Nothing changed; do not create a record for a no-op
            return Ok(cart);
        }
        cart.refresh_totals();
        Ok(self.repo.upsert(cart).await?)
    }

    /// Delete an owner's cart; deleting an absent cart is a no-op
    pub async fn clear(&self, owner: &OwnerKey) -> AppResult<Cart> {
        let key = owner.storage_key();
        let lock = self.owner_lock(&key);
        let _guard = lock.lock().await;

        self.repo.delete_by_owner(&key).await?;
        Ok(Cart::empty_for(owner))
    }

    /// Merge a guest cart into a user cart, then delete the guest cart
    ///
    /// Matching lines sum quantities, unmatched guest lines append. The
    /// guest cart is deleted only after the merged user cart is persisted,
    /// so a retry after the delete finds no guest cart and is a no-op.
    pub async fn merge(&self, user: &OwnerKey, guest: &OwnerKey) -> AppResult<Cart> {
        let user_key = user.storage_key();
        let guest_key = guest.storage_key();
        if user_key == guest_key {
            // Same key would deadlock the double lock below
            return self.get_cart(user).await;
        }

        // Lock both owners in key order so crossing merges cannot deadlock
        let (first, second) = if user_key <= guest_key {
            (user_key.clone(), guest_key.clone())
        } else {
            (guest_key.clone(), user_key.clone())
        };
        let first_lock = self.owner_lock(&first);
        let _first_guard = first_lock.lock().await;
        let second_lock = self.owner_lock(&second);
        let _second_guard = second_lock.lock().await;

        let guest_cart = self.repo.find_by_owner(&guest_key).await?;
        let Some(guest_cart) = guest_cart else {
            // Already merged (or never existed): return the user cart as-is
            return self.get_cart(user).await;
        };

        let mut user_cart = self.get_cart(user).await?;
        cart::merge_lines(&mut user_cart.lines, guest_cart.lines);
        user_cart.refresh_totals();
        let merged = self.repo.upsert(user_cart).await?;

        self.repo.delete_by_owner(&guest_key).await?;
        tracing::info!(user = %user_key, guest = %guest_key, "Guest cart merged into user cart");

        Ok(merged)
    }
}
