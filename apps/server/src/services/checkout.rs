//! # Checkout Service
//!
//! Orchestrates the sale path: authorize, load, price, transact.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     create_sale pipeline                            │
//! │                                                                     │
//! │  1. ensure_shop_access      caller may sell from this shop          │
//! │  2. load customer           must exist in this shop (required -     │
//! │                             walk-ins get a customer row first)      │
//! │  3. load inventory rows     every referenced id, shop-scoped        │
//! │  4. price_checkout          pure math + fail-fast stock check       │
//! │  5. SaleRepository          one transaction: header + items +       │
//! │     ::create_sale           guarded decrements                      │
//! │                                                                     │
//! │  Steps 1-4 write nothing. Step 5 is all-or-nothing.                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here retries: a [`crate::error::ErrorCode::Conflict`] goes
//! back to the caller, who may re-submit the checkout once.

use std::collections::HashSet;

use tracing::info;

use atlas_core::{price_checkout, CheckoutRequest, SaleWithDetails};
use atlas_db::Database;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::services::ensure_shop_access;

/// The sale/checkout transaction path.
pub struct CheckoutService {
    db: Database,
}

impl CheckoutService {
    /// Creates a checkout service over the injected database handle.
    pub fn new(db: Database) -> Self {
        CheckoutService { db }
    }

    /// Validates, prices and persists one sale.
    ///
    /// On success the returned sale is committed, stock reflects it
    /// exactly once, and it is immediately visible to the reporting
    /// queries. On any failure the database is untouched.
    pub async fn create_sale(
        &self,
        actor: &CurrentUser,
        shop_id: &str,
        request: CheckoutRequest,
    ) -> ApiResult<SaleWithDetails> {
        ensure_shop_access(&self.db, actor, shop_id).await?;

        if request.items.is_empty() {
            return Err(ApiError::validation("Checkout must contain at least one item"));
        }

        // The customer is mandatory and must belong to this shop. A
        // customer from another shop is reported as not-found rather
        // than forbidden, so ids don't leak across tenants.
        let customer = self
            .db
            .customers()
            .get_by_id(&request.customer_id)
            .await?
            .filter(|customer| customer.shop_id == shop_id)
            .ok_or_else(|| ApiError::not_found("Customer", &request.customer_id))?;

        // Load each referenced inventory row once, shop-scoped.
        let mut snapshots = Vec::new();
        let mut seen = HashSet::new();
        for line in &request.items {
            if !seen.insert(line.inventory_id.as_str()) {
                continue;
            }
            let item = self
                .db
                .inventory()
                .get_by_id(&line.inventory_id)
                .await?
                .filter(|item| item.shop_id == shop_id)
                .ok_or_else(|| ApiError::not_found("InventoryItem", &line.inventory_id))?;
            snapshots.push(item);
        }

        let priced = price_checkout(&snapshots, &request)?;

        let (sale, items) = self
            .db
            .sales()
            .create_sale(shop_id, &customer.id, &priced)
            .await?;

        info!(
            shop_id = %shop_id,
            sale_id = %sale.id,
            invoice_code = %sale.invoice_code,
            customer_id = %customer.id,
            total = %sale.total_amount_cents,
            by = %actor.username,
            "Checkout complete"
        );

        Ok(SaleWithDetails {
            sale,
            customer,
            items,
        })
    }
}
