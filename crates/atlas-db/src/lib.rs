//! # atlas-db: Database Layer for Atlas POS
//!
//! This crate provides database access for the Atlas POS system.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Atlas POS Data Flow                          │
//! │                                                                     │
//! │  HTTP handler (create sale, list inventory, ...)                    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                    atlas-db (THIS CRATE)                    │   │
//! │  │                                                             │   │
//! │  │  ┌─────────────┐   ┌───────────────┐   ┌──────────────┐    │   │
//! │  │  │  Database   │   │ Repositories  │   │  Migrations  │    │   │
//! │  │  │  (pool.rs)  │◄──│ user/shop/    │   │  (embedded)  │    │   │
//! │  │  │             │   │ customer/     │   │              │    │   │
//! │  │  │ SqlitePool  │   │ inventory/    │   │ 001_init.sql │    │   │
//! │  │  └─────────────┘   │ sale          │   └──────────────┘    │   │
//! │  │                    └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (WAL mode)                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (inventory, sale, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atlas_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("atlas.db")).await?;
//! let items = db.inventory().list_by_shop("shop-id").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::sale::SaleRepository;
pub use repository::shop::ShopRepository;
pub use repository::user::UserRepository;
