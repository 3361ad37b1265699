//! # Seed Data Generator
//!
//! Populates the database with demo accounts and products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p vendo-db --bin seed
//!
//! # Specify database path
//! cargo run -p vendo-db --bin seed -- --db ./data/vendo.db
//! ```
//!
//! ## Generated Data
//! - One seller account (`demo-seller`) owning every slot
//! - Two buyer accounts (`demo-buyer`, `demo-buyer-2`) with coins deposited
//! - A slate of vending machine products with coin-denomination prices
//! - A couple of purchases so the summary endpoint has something to show

use std::env;

use vendo_core::{NewAccount, NewProduct, Role};
use vendo_db::{Database, DbConfig};

/// Product slate: (title, price, stock, description).
/// Prices must be coin denominations or the repository rejects them.
const PRODUCTS: &[(&str, i64, i64, &str)] = &[
    ("Cola Classic", 50, 24, "330ml can"),
    ("Diet Cola", 50, 18, "330ml can"),
    ("Sparkling Water", 20, 30, "500ml bottle"),
    ("Still Water", 10, 40, "500ml bottle"),
    ("Orange Juice", 100, 12, "250ml carton"),
    ("Salted Chips", 20, 20, "45g bag"),
    ("Paprika Chips", 20, 20, "45g bag"),
    ("Chocolate Bar", 50, 16, "Milk chocolate, 40g"),
    ("Peanut Bar", 50, 16, "Roasted peanuts and caramel"),
    ("Chewing Gum", 5, 50, "Peppermint, 10 pieces"),
    ("Energy Drink", 100, 10, "250ml can"),
    ("Trail Mix", 100, 8, "Nuts and raisins, 60g"),
    ("Instant Coffee", 10, 25, "Single-serve sachet"),
    ("Tea Bag Pack", 10, 25, "Two bags of black tea"),
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

    let mut db_path = String::from("./vendo_dev.db");

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
                println!("Vendo Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./vendo_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Vendo Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Accounts. Demo credential hashes only; the real API hashes at the edge.
    let seller = db
        .accounts()
        .create(NewAccount {
            handle: "demo-seller".to_string(),
            credential_hash: "demo-hash".to_string(),
            role: Role::Seller,
        })
        .await?;
    println!("✓ Seller account: {} ({})", seller.handle, seller.id);

    let buyer = db
        .accounts()
        .create(NewAccount {
            handle: "demo-buyer".to_string(),
            credential_hash: "demo-hash".to_string(),
            role: Role::Buyer,
        })
        .await?;
    let buyer_2 = db
        .accounts()
        .create(NewAccount {
            handle: "demo-buyer-2".to_string(),
            credential_hash: "demo-hash".to_string(),
            role: Role::Buyer,
        })
        .await?;
    println!("✓ Buyer accounts: {}, {}", buyer.handle, buyer_2.handle);

    // Products
    println!();
    println!("Stocking the machine...");

    let start = std::time::Instant::now();
    for (title, price, quantity, description) in PRODUCTS {
        db.products()
            .create(
                &seller.id,
                NewProduct {
                    title: (*title).to_string(),
                    price: *price,
                    quantity: *quantity,
                    description: Some((*description).to_string()),
                },
            )
            .await?;
    }
    println!(
        "✓ Stocked {} products in {:?}",
        PRODUCTS.len(),
        start.elapsed()
    );

    // Coins in, a couple of purchases out, so every read path has data.
    let engine = db.engine();
    for coin in [100, 100, 50, 20, 10, 5] {
        engine.deposit(&buyer.id, coin).await?;
    }
    engine.deposit(&buyer_2.id, 100).await?;
    println!("✓ Deposited demo coins");

    let page = db.products().list_available(1).await?;
    if let Some(first) = page.first() {
        let receipt = engine.purchase(&buyer.id, &first.id, 2).await?;
        println!(
            "✓ Demo purchase: {} x{} for {} (balance {})",
            first.title, receipt.quantity, receipt.total_cost, receipt.balance
        );
    }

    let summary = db.purchases().summary_for_buyer(&buyer.id).await?;
    println!(
        "✓ Summary for {}: {} product line(s), balance {}",
        summary.handle,
        summary.lines.len(),
        summary.balance
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
