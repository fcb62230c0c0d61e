//! # Customer Repository
//!
//! Database operations for customers. Customers are shop-scoped and can
//! be created standalone or inline while ringing up a sale.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use atlas_core::{Customer, NewCustomer};

/// Maximum rows returned by a customer search.
const SEARCH_LIMIT: i64 = 10;

const SELECT_CUSTOMER: &str =
    "SELECT id, shop_id, name, mobile, address, created_at FROM customers";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Registers a customer to a shop.
    pub async fn insert(&self, shop_id: &str, new: &NewCustomer) -> DbResult<Customer> {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            shop_id: shop_id.to_string(),
            name: new.name.clone(),
            mobile: new.mobile.clone(),
            address: new.address.clone(),
            created_at: Utc::now(),
        };

        debug!(id = %customer.id, shop_id = %shop_id, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, shop_id, name, mobile, address, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.shop_id)
        .bind(&customer.name)
        .bind(&customer.mobile)
        .bind(&customer.address)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!("{SELECT_CUSTOMER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Lists a shop's customers, newest first.
    pub async fn list_by_shop(&self, shop_id: &str) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "{SELECT_CUSTOMER} WHERE shop_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(shop_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Searches a shop's customers by name or mobile substring.
    ///
    /// Case-insensitive (SQLite LIKE), capped at [`SEARCH_LIMIT`] rows -
    /// this backs a type-ahead picker at the counter, not a report.
    pub async fn search(&self, shop_id: &str, query: &str) -> DbResult<Vec<Customer>> {
        let pattern = format!("%{}%", query.trim());

        let customers = sqlx::query_as::<_, Customer>(&format!(
            "{SELECT_CUSTOMER} WHERE shop_id = ?1 AND (name LIKE ?2 OR mobile LIKE ?2) LIMIT ?3"
        ))
        .bind(shop_id)
        .bind(&pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use atlas_core::{NewShop, NewUser, Role};

    async fn seeded_shop(db: &Database) -> String {
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
        db.shops()
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
            .unwrap()
            .id
    }

    fn customer(name: &str, mobile: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            mobile: mobile.to_string(),
            address: None,
        }
    }

    #[tokio::test]
    async fn test_search_matches_name_and_mobile() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shop_id = seeded_shop(&db).await;
        let repo = db.customers();

        repo.insert(&shop_id, &customer("Hamza Khan", "0300-1112223"))
            .await
            .unwrap();
        repo.insert(&shop_id, &customer("Bilal Ahmed", "0321-9998887"))
            .await
            .unwrap();

        let by_name = repo.search(&shop_id, "hamza").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Hamza Khan");

        let by_mobile = repo.search(&shop_id, "999").await.unwrap();
        assert_eq!(by_mobile.len(), 1);
        assert_eq!(by_mobile[0].name, "Bilal Ahmed");

        assert!(repo.search(&shop_id, "nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_is_capped() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shop_id = seeded_shop(&db).await;
        let repo = db.customers();

        for i in 0..15 {
            repo.insert(&shop_id, &customer(&format!("Customer {i}"), "0300-0000000"))
                .await
                .unwrap();
        }

        let found = repo.search(&shop_id, "Customer").await.unwrap();
        assert_eq!(found.len(), 10);
    }

    #[tokio::test]
    async fn test_customers_scoped_by_shop() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shop_id = seeded_shop(&db).await;
        let repo = db.customers();

        repo.insert(&shop_id, &customer("Hamza", "0300-1234567"))
            .await
            .unwrap();

        assert_eq!(repo.list_by_shop(&shop_id).await.unwrap().len(), 1);
        assert!(repo.list_by_shop("other-shop").await.unwrap().is_empty());
        assert!(repo.search("other-shop", "Hamza").await.unwrap().is_empty());
    }
}
