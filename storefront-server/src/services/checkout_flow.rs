//! Checkout flow - cart to order state machine
//!
//! Drives a checkout through `PENDING → PAID → finalized` and materializes
//! the order. The finalize step is the single irreversible transition: the
//! `isFinalized` flag flips through a storage-level compare-and-set, so two
//! racing callers produce exactly one order and both receive it.

use shared::{OwnerKey, PaymentMethod, PaymentStatus, ShippingAddress};
use std::time::Duration;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use crate::auth::CurrentUser;
use crate::db::models::{Checkout, Order};
use crate::db::repository::{CheckoutRepository, OrderRepository};
use crate::services::CartStore;
use crate::utils::{AppError, AppResult};
use crate::security_log;

/// How often and how long a losing finalize polls for the winner's order
const FINALIZE_LOOKUP_RETRIES: usize = 5;
const FINALIZE_LOOKUP_DELAY: Duration = Duration::from_millis(20);

#[derive(Clone, Debug)]
pub struct CheckoutFlow {
    checkouts: CheckoutRepository,
    orders: OrderRepository,
    carts: CartStore,
}

impl CheckoutFlow {
    pub fn new(db: Surreal<Db>, carts: CartStore) -> Self {
        Self {
            checkouts: CheckoutRepository::new(db.clone()),
            orders: OrderRepository::new(db),
            carts,
        }
    }

    /// Create a checkout from the owner's stored cart
    ///
    /// Items and total are snapshotted server-side; whatever the client
    /// believes the cart contains is irrelevant. The checkout starts in
    /// `PENDING` and the cart stays untouched until finalize.
    pub async fn create_checkout(
        &self,
        owner: &OwnerKey,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> AppResult<Checkout> {
        // 1. Required shipping fields must be present
        shipping_address.validate()?;

        // 2. Snapshot the stored cart; an empty cart cannot check out
        let cart = self.carts.get_cart(owner).await?;
        if cart.is_empty() {
            return Err(AppError::validation(
                "Cannot create a checkout from an empty cart",
            ));
        }

        // 3. Recompute the total from the lines, never trust the stored value
        let total = shared::cart::compute_total(&cart.lines);

        // 4. Persist
        let checkout = Checkout::new(owner, cart.lines, shipping_address, payment_method, total);
        let created = self.checkouts.create(checkout).await?;

        tracing::info!(
            checkout_id = %record_id_str(&created.id),
            owner = %owner,
            total = created.total_price,
            "Checkout created"
        );
        Ok(created)
    }

    /// Record a payment result against a checkout
    ///
    /// COD is the only capture path: the flip to `PAID` happens here with
    /// no gateway round trip. Re-confirming an already paid checkout is an
    /// idempotent no-op that keeps the original `paidAt`.
    pub async fn record_payment(
        &self,
        caller: &OwnerKey,
        checkout_id: &str,
        new_status: PaymentStatus,
        details: Option<serde_json::Value>,
    ) -> AppResult<Checkout> {
        // 1. Load and check ownership
        let checkout = self
            .checkouts
            .find_by_id(checkout_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Checkout {} not found", checkout_id)))?;
        if !checkout.owned_by(caller) {
            security_log!(
                "WARN",
                "payment_ownership_denied",
                checkout_id = checkout_id.to_string(),
                caller = caller.to_string()
            );
            return Err(AppError::forbidden("Checkout belongs to another caller"));
        }

        // 2. Finalized checkouts are immutable
        if checkout.is_finalized {
            return Err(AppError::conflict("Checkout is already finalized"));
        }

        // 3. No backward transition; PAID → PAID keeps the original paidAt
        if checkout.is_paid() {
            return match new_status {
                PaymentStatus::Paid => Ok(checkout),
                PaymentStatus::Pending => Err(AppError::conflict(
                    "Checkout is already paid and cannot go back to pending",
                )),
            };
        }

        // 4. Stamp paidAt on capture; COD mints a reference when none given
        let id = record_id(&checkout)?;
        let (details, paid_at) = match new_status {
            PaymentStatus::Paid => {
                let details = details.unwrap_or_else(|| {
                    serde_json::json!({
                        "method": "COD",
                        "reference": uuid::Uuid::new_v4().to_string(),
                    })
                });
                (Some(details), Some(chrono::Utc::now()))
            }
            PaymentStatus::Pending => (details, None),
        };

        let updated = self
            .checkouts
            .set_payment(&id, new_status, details, paid_at)
            .await?;

        if updated.is_paid() {
            security_log!(
                "INFO",
                "payment_recorded",
                checkout_id = checkout_id.to_string(),
                amount = updated.total_price
            );
        }
        Ok(updated)
    }

    /// Finalize a paid checkout into an order
    ///
    /// Idempotent: reinvocation (or losing a race) returns the order the
    /// first successful call created. A guest-created checkout is adopted
    /// by the authenticated caller here.
    pub async fn finalize(&self, user: &CurrentUser, checkout_id: &str) -> AppResult<Order> {
        // 1. Load and check ownership; guest checkouts accept any
        //    authenticated caller, who becomes the owner
        let checkout = self
            .checkouts
            .find_by_id(checkout_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Checkout {} not found", checkout_id)))?;
        if let Some(owner_id) = &checkout.user_id
            && owner_id != &user.id
        {
            security_log!(
                "WARN",
                "finalize_ownership_denied",
                checkout_id = checkout_id.to_string(),
                user_id = user.id.clone()
            );
            return Err(AppError::forbidden("Checkout belongs to another user"));
        }
        let id = record_id(&checkout)?;

        // 2. Already finalized: return the existing order
        if checkout.is_finalized {
            return self.order_for_checkout(&id).await;
        }

        // 3. Only paid checkouts can finalize
        if !checkout.is_paid() {
            return Err(AppError::conflict(
                "Checkout must be paid before it can be finalized",
            ));
        }

        // 4. Compare-and-set on the finalized flag; one caller wins
        let won = self.checkouts.finalize_cas(&id, &user.id).await?;
        let Some(finalized) = won else {
            // Lost the race: the winner is inserting the order right now
            return self.order_for_checkout(&id).await;
        };

        // 5. Winner materializes the order
        let order = self.orders.create_from_checkout(&finalized, &user.id).await?;

        // 6. Clear the originating cart (guest carts stay keyed by the
        //    guest id the checkout was created under)
        match cart_owner(&checkout) {
            Ok(owner) => {
                if let Err(e) = self.carts.clear(&owner).await {
                    tracing::warn!(
                        checkout_id = %checkout_id,
                        error = %e,
                        "Order created but originating cart was not cleared"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(checkout_id = %checkout_id, error = %e, "Cart owner unresolvable");
            }
        }

        security_log!(
            "INFO",
            "checkout_finalized",
            checkout_id = checkout_id.to_string(),
            order_id = record_id_str(&order.id),
            user_id = user.id.clone()
        );
        tracing::info!(
            checkout_id = %checkout_id,
            order_id = %record_id_str(&order.id),
            "Checkout finalized into order"
        );
        Ok(order)
    }

    /// The order created from a checkout, waiting briefly for a racing
    /// winner's insert to land
    async fn order_for_checkout(&self, checkout_id: &RecordId) -> AppResult<Order> {
        for attempt in 0..FINALIZE_LOOKUP_RETRIES {
            if let Some(order) = self.orders.find_by_checkout(checkout_id).await? {
                return Ok(order);
            }
            if attempt + 1 < FINALIZE_LOOKUP_RETRIES {
                tokio::time::sleep(FINALIZE_LOOKUP_DELAY).await;
            }
        }
        Err(AppError::internal(
            "Checkout is finalized but its order cannot be found",
        ))
    }
}

/// Record id of a loaded checkout; rows from the database always carry one
fn record_id(checkout: &Checkout) -> AppResult<RecordId> {
    checkout
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Checkout record has no id"))
}

fn record_id_str(id: &Option<RecordId>) -> String {
    id.as_ref().map(|i| i.to_string()).unwrap_or_default()
}

/// Owner key of the cart a checkout was created from
fn cart_owner(checkout: &Checkout) -> AppResult<OwnerKey> {
    if let Some(user_id) = &checkout.user_id {
        return Ok(OwnerKey::user(user_id));
    }
    if let Some(guest_id) = &checkout.guest_id {
        return OwnerKey::guest(guest_id.clone())
            .map_err(|_| AppError::internal("Stored guest id is malformed"));
    }
    Err(AppError::internal("Checkout carries no owner"))
}
