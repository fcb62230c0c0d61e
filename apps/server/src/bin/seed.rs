//! # Seed Data Generator
//!
//! Populates the database with a superuser, a demo shop owner and demo
//! stock for development.
//!
//! ## Usage
//! ```bash
//! # Default database path (./atlas.db)
//! cargo run -p atlas-server --bin seed
//!
//! # Specify database path
//! cargo run -p atlas-server --bin seed -- --db ./data/atlas.db
//! ```
//!
//! Created accounts (development only):
//! - `admin` / `admin123` (superuser)
//! - `demo` / `demo123` (shop owner with one seeded shop)

use std::env;

use atlas_core::{NewCustomer, NewInventoryItem, NewShop, NewUser, Role};
use atlas_db::{Database, DbConfig};
use atlas_server::auth::password::hash_password;

/// Demo phones: brand, model, storage, ram, cost cents, selling cents, stock.
const PHONES: &[(&str, &str, &str, &str, i64, i64, i64)] = &[
    ("Apple", "iPhone 13", "128GB", "4GB", 16_500_00, 18_900_00, 8),
    ("Apple", "iPhone 12", "64GB", "4GB", 11_800_00, 13_500_00, 5),
    ("Samsung", "Galaxy S23", "256GB", "8GB", 19_000_00, 21_500_00, 6),
    ("Samsung", "Galaxy A54", "128GB", "8GB", 7_200_00, 8_400_00, 12),
    ("Xiaomi", "Redmi Note 12", "128GB", "6GB", 4_100_00, 4_800_00, 20),
    ("Xiaomi", "Poco X5", "256GB", "8GB", 5_300_00, 6_100_00, 3),
    ("Oppo", "Reno 8", "256GB", "8GB", 8_800_00, 9_900_00, 4),
    ("Vivo", "Y27", "128GB", "6GB", 4_400_00, 5_200_00, 9),
];

const CUSTOMERS: &[(&str, &str)] = &[
    ("Hamza Khan", "0300-1234567"),
    ("Bilal Ahmed", "0321-7654321"),
    ("Sana Malik", "0333-5550001"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./atlas.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Atlas POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./atlas.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Atlas POS Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    if db.users().get_by_username("admin").await?.is_some() {
        println!("⚠ Database already seeded (admin user exists).");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    db.users()
        .insert(&NewUser {
            username: "admin".to_string(),
            password_hash: hash_password("admin123").expect("hashing"),
            role: Role::Superuser,
            name: Some("Administrator".to_string()),
        })
        .await?;
    println!("✓ Superuser 'admin' created");

    let owner = db
        .users()
        .insert(&NewUser {
            username: "demo".to_string(),
            password_hash: hash_password("demo123").expect("hashing"),
            role: Role::Owner,
            name: Some("Demo Owner".to_string()),
        })
        .await?;
    println!("✓ Owner 'demo' created");

    let shop = db
        .shops()
        .insert(
            &owner.id,
            &NewShop {
                name: "Galaxy Mobiles".to_string(),
                location: "Lahore".to_string(),
                address: "Shop 14, Hall Road".to_string(),
                phone: "042-3711-0000".to_string(),
            },
        )
        .await?;
    println!("✓ Shop '{}' registered", shop.name);

    for (brand, model, storage, ram, cost, selling, stock) in PHONES {
        db.inventory()
            .insert(
                &shop.id,
                &NewInventoryItem {
                    brand: brand.to_string(),
                    model: model.to_string(),
                    storage: storage.to_string(),
                    ram: ram.to_string(),
                    color: None,
                    quantity: *stock,
                    cost_price_cents: *cost,
                    selling_price_cents: *selling,
                    low_stock_threshold: None,
                },
            )
            .await?;
    }
    println!("✓ {} inventory items added", PHONES.len());

    for (name, mobile) in CUSTOMERS {
        db.customers()
            .insert(
                &shop.id,
                &NewCustomer {
                    name: name.to_string(),
                    mobile: mobile.to_string(),
                    address: None,
                },
            )
            .await?;
    }
    println!("✓ {} customers registered", CUSTOMERS.len());

    println!();
    println!("✓ Seed complete!");
    println!("  Login with admin/admin123 (superuser) or demo/demo123 (owner).");

    Ok(())
}
