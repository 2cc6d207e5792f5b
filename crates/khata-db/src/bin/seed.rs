//! # Seed Data Generator
//!
//! Populates the database with a starter kirana-shop catalog for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed the default dev database
//! cargo run -p khata-db --bin seed
//!
//! # Specify database path
//! cargo run -p khata-db --bin seed -- --db ./data/khata.db
//! ```
//!
//! Each product gets a selling price in paise, a cost price around 70%
//! of it, and a starting stock. Seeding is skipped if the catalog is
//! not empty.

use std::env;

use khata_core::NewProduct;
use khata_db::{Database, DbConfig};

/// Catalog entries: (name, category, selling price in paise, stock).
const CATALOG: &[(&str, &str, i64, i64)] = &[
    ("Maggi Noodles", "Grocery", 1400, 48),
    ("Parle-G Biscuit", "Grocery", 500, 120),
    ("Amul Milk 500ml", "Dairy", 2700, 30),
    ("Amul Butter 100g", "Dairy", 6000, 15),
    ("Tata Salt 1kg", "Grocery", 2800, 25),
    ("Aashirvaad Atta 5kg", "Grocery", 27500, 12),
    ("Fortune Oil 1L", "Grocery", 14500, 18),
    ("Colgate Toothpaste", "Personal Care", 5500, 20),
    ("Lifebuoy Soap", "Personal Care", 3500, 40),
    ("Surf Excel 500g", "Household", 6500, 22),
    ("Vim Bar", "Household", 1000, 35),
    ("Red Label Tea 250g", "Beverages", 17000, 14),
    ("Nescafe Classic 50g", "Beverages", 16500, 10),
    ("Thums Up 750ml", "Beverages", 4500, 24),
    ("Frooti 160ml", "Beverages", 1000, 60),
    ("Lays Masala", "Snacks", 2000, 45),
    ("Kurkure", "Snacks", 2000, 45),
    ("Dairy Milk", "Snacks", 4500, 30),
    ("Haldiram Bhujia 200g", "Snacks", 5500, 16),
    ("Britannia Bread", "Bakery", 4000, 20),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./khata_dev.db");

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
                println!("Khata Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./khata_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Khata Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let mut seeded = 0;
    for &(name, category, selling_price_paise, stock) in CATALOG {
        let new = NewProduct {
            name: name.to_string(),
            category: category.to_string(),
            // Cost around 70% of selling, the same assumption the
            // committer makes for ad-hoc products.
            cost_price_paise: selling_price_paise * 7 / 10,
            selling_price_paise,
            stock,
        };

        if let Err(e) = db.products().insert(&new).await {
            eprintln!("Failed to insert {}: {}", name, e);
            continue;
        }
        seeded += 1;
    }

    println!("✓ Seeded {} products", seeded);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
