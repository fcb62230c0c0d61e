//! # Sale Repository
//!
//! The sales ledger: the atomic checkout transaction and the queries
//! that read it back.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  create_sale: one transaction                       │
//! │                                                                     │
//! │  BEGIN                                                              │
//! │   1. INSERT sales row (fresh UUID + invoice code, frozen totals)    │
//! │   2. for each priced line:                                          │
//! │      a. INSERT sale_items row (brand/model/variant/price snapshots) │
//! │      b. UPDATE inventory SET quantity = quantity - q                │
//! │         WHERE id = ? AND quantity >= q     ← authoritative check    │
//! │  COMMIT                                                             │
//! │                                                                     │
//! │  Any failure (missing item, concurrent stock change, constraint)    │
//! │  rolls the whole transaction back: no sale row, no item rows, no    │
//! │  stock change. A sale either fully exists or does not exist.        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are append-only. There is deliberately no update or delete
//! here; a mistaken sale is corrected by a compensating entry at the
//! application level, never by editing the ledger.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::inventory::decrement_stock;
use atlas_core::{Customer, PricedCheckout, Sale, SaleItem, SaleWithDetails};

const SELECT_SALE: &str = "SELECT id, shop_id, customer_id, invoice_code, total_amount_cents, \
     total_profit_cents, created_at FROM sales";

const SELECT_SALE_ITEM: &str = "SELECT id, sale_id, inventory_id, brand, model, variant, \
     quantity, unit_price_cents, cost_price_cents, created_at FROM sale_items";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Persists a priced checkout as one atomic transaction.
    ///
    /// The caller has already validated and priced the cart
    /// ([`atlas_core::price_checkout`]); this method owns persistence
    /// and the authoritative stock re-check. On any error the
    /// transaction rolls back and the database is untouched.
    pub async fn create_sale(
        &self,
        shop_id: &str,
        customer_id: &str,
        priced: &PricedCheckout,
    ) -> DbResult<(Sale, Vec<SaleItem>)> {
        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            shop_id: shop_id.to_string(),
            customer_id: customer_id.to_string(),
            invoice_code: generate_invoice_code(),
            total_amount_cents: priced.total_amount_cents,
            total_profit_cents: priced.total_profit_cents,
            created_at: now,
        };

        debug!(id = %sale.id, invoice_code = %sale.invoice_code, lines = priced.lines.len(), "Creating sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, shop_id, customer_id, invoice_code,
                total_amount_cents, total_profit_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.shop_id)
        .bind(&sale.customer_id)
        .bind(&sale.invoice_code)
        .bind(sale.total_amount_cents)
        .bind(sale.total_profit_cents)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(priced.lines.len());
        for line in &priced.lines {
            let item = SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale.id.clone(),
                inventory_id: line.inventory_id.clone(),
                brand: line.brand.clone(),
                model: line.model.clone(),
                variant: line.variant.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                cost_price_cents: line.cost_price_cents,
                created_at: now,
            };

            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, inventory_id, brand, model, variant,
                    quantity, unit_price_cents, cost_price_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.inventory_id)
            .bind(&item.brand)
            .bind(&item.model)
            .bind(&item.variant)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.cost_price_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;

            decrement_stock(&mut tx, &line.inventory_id, line.quantity).await?;

            items.push(item);
        }

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            invoice_code = %sale.invoice_code,
            total = %sale.total_amount_cents,
            items = items.len(),
            "Sale committed"
        );

        Ok((sale, items))
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!("{SELECT_SALE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets all line items for a sale, oldest first.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(&format!(
            "{SELECT_SALE_ITEM} WHERE sale_id = ?1 ORDER BY created_at"
        ))
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists a shop's sales with nested customer and items, newest first.
    ///
    /// `from` is inclusive, `until` exclusive; either may be `None`.
    /// Callers turn an inclusive calendar-day range into these bounds.
    pub async fn list_by_shop(
        &self,
        shop_id: &str,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> DbResult<Vec<SaleWithDetails>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("{SELECT_SALE} WHERE shop_id = "));
        query.push_bind(shop_id);
        if let Some(from) = from {
            query.push(" AND created_at >= ");
            query.push_bind(from);
        }
        if let Some(until) = until {
            query.push(" AND created_at < ");
            query.push_bind(until);
        }
        query.push(" ORDER BY created_at DESC");

        let sales: Vec<Sale> = query.build_query_as().fetch_all(&self.pool).await?;

        let mut details = Vec::with_capacity(sales.len());
        for sale in sales {
            let customer = sqlx::query_as::<_, Customer>(
                "SELECT id, shop_id, name, mobile, address, created_at FROM customers WHERE id = ?1",
            )
            .bind(&sale.customer_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", &sale.customer_id))?;

            let items = self.get_items(&sale.id).await?;

            details.push(SaleWithDetails {
                sale,
                customer,
                items,
            });
        }

        Ok(details)
    }
}

/// Generates an invoice code: `INV-YYYYMMDD-XXXXXX`.
///
/// The suffix comes from a fresh UUID v4 rather than a timestamp, so
/// codes stay unique under concurrent checkouts; the UNIQUE index on
/// `invoice_code` backs that up.
fn generate_invoice_code() -> String {
    let date = Utc::now().format("%Y%m%d");
    let id = Uuid::new_v4().simple().to_string();
    format!("INV-{}-{}", date, id[..6].to_uppercase())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use atlas_core::{
        price_checkout, CheckoutLine, CheckoutRequest, NewCustomer, NewInventoryItem, NewShop,
        NewUser, PricedLine, Role,
    };

    struct Fixture {
        db: Database,
        shop_id: String,
        customer_id: String,
    }

    async fn fixture_with(db: Database) -> Fixture {
        let owner = db
            .users()
            .insert(&NewUser {
                username: "owner".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Owner,
                name: None,
            })
            .await
            .unwrap();
        let shop = db
            .shops()
            .insert(
                &owner.id,
                &NewShop {
                    name: "Shop".to_string(),
                    location: "Lahore".to_string(),
                    address: "Hall Road".to_string(),
                    phone: "042-1111111".to_string(),
                },
            )
            .await
            .unwrap();
        let customer = db
            .customers()
            .insert(
                &shop.id,
                &NewCustomer {
                    name: "Hamza".to_string(),
                    mobile: "0300-1234567".to_string(),
                    address: None,
                },
            )
            .await
            .unwrap();

        Fixture {
            db,
            shop_id: shop.id,
            customer_id: customer.id,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(Database::new(DbConfig::in_memory()).await.unwrap()).await
    }

    async fn seed_item(fx: &Fixture, quantity: i64) -> atlas_core::InventoryItem {
        fx.db
            .inventory()
            .insert(
                &fx.shop_id,
                &NewInventoryItem {
                    brand: "Apple".to_string(),
                    model: "iPhone 13".to_string(),
                    storage: "128GB".to_string(),
                    ram: "4GB".to_string(),
                    color: None,
                    quantity,
                    cost_price_cents: 70_00,
                    selling_price_cents: 100_00,
                    low_stock_threshold: None,
                },
            )
            .await
            .unwrap()
    }

    fn cart(fx: &Fixture, inventory_id: &str, quantity: i64) -> CheckoutRequest {
        CheckoutRequest {
            customer_id: fx.customer_id.clone(),
            items: vec![CheckoutLine {
                inventory_id: inventory_id.to_string(),
                quantity,
                unit_price_cents: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_checkout_persists_and_decrements_exactly_once() {
        let fx = fixture().await;
        let item = seed_item(&fx, 10).await;

        let priced = price_checkout(std::slice::from_ref(&item), &cart(&fx, &item.id, 3)).unwrap();
        let (sale, items) = fx
            .db
            .sales()
            .create_sale(&fx.shop_id, &fx.customer_id, &priced)
            .await
            .unwrap();

        assert_eq!(sale.total_amount_cents, 300_00);
        assert_eq!(sale.total_profit_cents, 90_00);
        assert!(sale.invoice_code.starts_with("INV-"));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].variant, "128GB 4GB");

        // Stock reflects the sale exactly once.
        let after = fx.db.inventory().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 7);

        // Queryable from the moment of commit.
        let fetched = fx.db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(fetched.invoice_code, sale.invoice_code);
    }

    #[tokio::test]
    async fn test_snapshots_survive_inventory_edits() {
        let fx = fixture().await;
        let item = seed_item(&fx, 10).await;

        let priced = price_checkout(std::slice::from_ref(&item), &cart(&fx, &item.id, 1)).unwrap();
        let (sale, _) = fx
            .db
            .sales()
            .create_sale(&fx.shop_id, &fx.customer_id, &priced)
            .await
            .unwrap();

        // Reprice the item after the sale.
        fx.db
            .inventory()
            .update(
                &item.id,
                &atlas_core::InventoryItemUpdate {
                    selling_price_cents: Some(150_00),
                    cost_price_cents: Some(120_00),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let items = fx.db.sales().get_items(&sale.id).await.unwrap();
        assert_eq!(items[0].unit_price_cents, 100_00);
        assert_eq!(items[0].cost_price_cents, 70_00);
    }

    #[tokio::test]
    async fn test_stale_read_oversell_rolls_back_everything() {
        let fx = fixture().await;
        let item = seed_item(&fx, 10).await;

        // Simulate a cart priced against a stale snapshot claiming 11 in
        // stock. The guarded decrement is the authoritative check.
        let priced = PricedCheckout {
            lines: vec![PricedLine {
                inventory_id: item.id.clone(),
                brand: item.brand.clone(),
                model: item.model.clone(),
                variant: item.variant(),
                quantity: 11,
                unit_price_cents: 100_00,
                cost_price_cents: 70_00,
            }],
            total_amount_cents: 1100_00,
            total_profit_cents: 330_00,
        };

        let err = fx
            .db
            .sales()
            .create_sale(&fx.shop_id, &fx.customer_id, &priced)
            .await
            .unwrap_err();
        match err {
            DbError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 10);
                assert_eq!(requested, 11);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Zero mutations: stock unchanged, no sale or item rows.
        let after = fx.db.inventory().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 10);
        let sales = fx.db.sales().list_by_shop(&fx.shop_id, None, None).await.unwrap();
        assert!(sales.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_inventory_rolls_back_everything() {
        let fx = fixture().await;
        let item = seed_item(&fx, 10).await;

        let priced = PricedCheckout {
            lines: vec![
                PricedLine {
                    inventory_id: item.id.clone(),
                    brand: item.brand.clone(),
                    model: item.model.clone(),
                    variant: item.variant(),
                    quantity: 2,
                    unit_price_cents: 100_00,
                    cost_price_cents: 70_00,
                },
                PricedLine {
                    inventory_id: "ghost-item".to_string(),
                    brand: "Ghost".to_string(),
                    model: "Phone".to_string(),
                    variant: "64GB 4GB".to_string(),
                    quantity: 1,
                    unit_price_cents: 50_00,
                    cost_price_cents: 40_00,
                },
            ],
            total_amount_cents: 250_00,
            total_profit_cents: 70_00,
        };

        let err = fx
            .db
            .sales()
            .create_sale(&fx.shop_id, &fx.customer_id, &priced)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // The first line's decrement must have rolled back too.
        let after = fx.db.inventory().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 10);
        assert!(fx
            .db
            .sales()
            .list_by_shop(&fx.shop_id, None, None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_exactly_one_winner() {
        // File-backed database so two real connections contend.
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("atlas.db")).max_connections(2);
        let fx = fixture_with(Database::new(config).await.unwrap()).await;
        let item = seed_item(&fx, 1).await;

        // Both carts were priced when stock read 1.
        let priced_a =
            price_checkout(std::slice::from_ref(&item), &cart(&fx, &item.id, 1)).unwrap();
        let priced_b = priced_a.clone();

        let sales_a = fx.db.sales();
        let sales_b = fx.db.sales();
        let (res_a, res_b) = tokio::join!(
            sales_a.create_sale(&fx.shop_id, &fx.customer_id, &priced_a),
            sales_b.create_sale(&fx.shop_id, &fx.customer_id, &priced_b),
        );

        let winners = [&res_a, &res_b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1, "exactly one checkout must win the last unit");

        let loser = if res_a.is_err() { res_a } else { res_b };
        assert!(matches!(
            loser.unwrap_err(),
            DbError::InsufficientStock { available: 0, requested: 1, .. }
        ));

        let after = fx.db.inventory().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 0);
        let sales = fx.db.sales().list_by_shop(&fx.shop_id, None, None).await.unwrap();
        assert_eq!(sales.len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_filters_by_date() {
        let fx = fixture().await;
        let item = seed_item(&fx, 10).await;

        let priced = price_checkout(std::slice::from_ref(&item), &cart(&fx, &item.id, 1)).unwrap();
        let (first, _) = fx
            .db
            .sales()
            .create_sale(&fx.shop_id, &fx.customer_id, &priced)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let (second, _) = fx
            .db
            .sales()
            .create_sale(&fx.shop_id, &fx.customer_id, &priced)
            .await
            .unwrap();

        let all = fx.db.sales().list_by_shop(&fx.shop_id, None, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].sale.id, second.id);
        assert_eq!(all[1].sale.id, first.id);
        assert_eq!(all[0].customer.name, "Hamza");
        assert_eq!(all[0].items.len(), 1);

        // A window that starts after the first sale excludes it.
        let later = fx
            .db
            .sales()
            .list_by_shop(&fx.shop_id, Some(second.created_at), None)
            .await
            .unwrap();
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].sale.id, second.id);

        // An exclusive upper bound at the second sale keeps only the first.
        let earlier = fx
            .db
            .sales()
            .list_by_shop(&fx.shop_id, None, Some(second.created_at))
            .await
            .unwrap();
        assert_eq!(earlier.len(), 1);
        assert_eq!(earlier[0].sale.id, first.id);
    }

    #[tokio::test]
    async fn test_invoice_codes_are_distinct() {
        let fx = fixture().await;
        let item = seed_item(&fx, 10).await;
        let priced = price_checkout(std::slice::from_ref(&item), &cart(&fx, &item.id, 1)).unwrap();

        let (a, _) = fx
            .db
            .sales()
            .create_sale(&fx.shop_id, &fx.customer_id, &priced)
            .await
            .unwrap();
        let (b, _) = fx
            .db
            .sales()
            .create_sale(&fx.shop_id, &fx.customer_id, &priced)
            .await
            .unwrap();

        assert_ne!(a.invoice_code, b.invoice_code);
    }
}
