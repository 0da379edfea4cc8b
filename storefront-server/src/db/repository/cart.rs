//! Cart Repository
//!
//! One cart document per owner key; the service layer serializes
//! mutations per owner, so plain read-modify-write is safe here.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Cart;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "cart";

#[derive(Clone, Debug)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the cart for an owner key
    pub async fn find_by_owner(&self, owner_key: &str) -> RepoResult<Option<Cart>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE ownerKey = $owner LIMIT 1")
            .bind(("owner", owner_key.to_string()))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Persist a cart: update in place when it has an id, insert otherwise
    ///
    /// Only the mutable fields are written on update; `ownerKey` and
    /// `createdAt` never change after insertion.
    pub async fn upsert(&self, cart: Cart) -> RepoResult<Cart> {
        match cart.id.clone() {
            Some(id) => {
                let updated: Vec<Cart> = self
                    .base
                    .db()
                    .query(
                        "UPDATE $thing SET lines = $lines, totalPrice = $total, \
                         updatedAt = $updated RETURN AFTER",
                    )
                    .bind(("thing", id))
                    .bind(("lines", cart.lines))
                    .bind(("total", cart.total_price))
                    .bind(("updated", cart.updated_at))
                    .await?
                    .take(0)?;
                updated
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepoError::NotFound("Cart no longer exists".to_string()))
            }
            None => {
                let created: Option<Cart> = self.base.db().create(TABLE).content(cart).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
            }
        }
    }

    /// Delete the cart for an owner key; absent carts are a no-op
    ///
    /// Returns whether a cart was actually deleted.
    pub async fn delete_by_owner(&self, owner_key: &str) -> RepoResult<bool> {
        let deleted: Vec<Cart> = self
            .base
            .db()
            .query("DELETE cart WHERE ownerKey = $owner RETURN BEFORE")
            .bind(("owner", owner_key.to_string()))
            .await?
            .take(0)?;
        Ok(!deleted.is_empty())
    }
}
