//! # Database Dump Utility
//!
//! Debug-only table viewer: prints formatted tabular text for users,
//! products, inventory, and recent sales. Not part of the core contract;
//! handy for inspecting a development database.
//!
//! ## Usage
//! ```bash
//! cargo run -p brew-db --bin dump -- --db ./brew_dev.db
//! ```

use std::env;

use brew_core::Money;
use brew_db::{Database, DbConfig};
use chrono::Utc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./brew_dev.db");

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
                println!("Brew POS Database Dump");
                println!();
                println!("Usage: dump [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./brew_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("=== Brew POS Database Dump ===");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    dump_users(&db).await?;
    dump_products(&db).await?;
    dump_inventory(&db).await?;
    dump_sales(&db).await?;

    db.close().await;
    Ok(())
}

async fn dump_users(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== USERS ===");
    println!(
        "{:<38} {:<15} {:<22} {:<10} {:<8} {:<20}",
        "ID", "Username", "Name", "Role", "Active", "Last Login"
    );
    println!("{}", "-".repeat(118));

    for user in db.users().list(None).await? {
        println!(
            "{:<38} {:<15} {:<22} {:<10} {:<8} {:<20}",
            user.id,
            user.username,
            user.full_name(),
            user.role.display_name(),
            if user.is_active { "Yes" } else { "No" },
            user.last_login
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "Never".to_string()),
        );
    }
    println!();
    Ok(())
}

async fn dump_products(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== PRODUCTS ===");
    println!(
        "{:<38} {:<26} {:>10} {:<14} {:<16} {:<8}",
        "ID", "Name", "Price", "Category", "Barcode", "Active"
    );
    println!("{}", "-".repeat(118));

    for product in db.products().list(false).await? {
        println!(
            "{:<38} {:<26} {:>10} {:<14} {:<16} {:<8}",
            product.id,
            product.name,
            format!("₱{}", product.price()),
            product.category.as_deref().unwrap_or("-"),
            product.barcode.as_deref().unwrap_or("-"),
            if product.is_active { "Yes" } else { "No" },
        );
    }
    println!();
    Ok(())
}

async fn dump_inventory(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== INVENTORY ===");
    println!(
        "{:<38} {:>7} {:>7} {:>7} {:<22} {:<12} {:<12}",
        "Item ID", "Stock", "Min", "Max", "Status", "Expires", "Restocked"
    );
    println!("{}", "-".repeat(112));

    for item in db.inventory().list().await? {
        println!(
            "{:<38} {:>7} {:>7} {:>7} {:<22} {:<12} {:<12}",
            item.id,
            item.current_stock,
            item.minimum_stock,
            item.maximum_stock,
            item.stock_status().label(),
            item.expiration_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            item.last_restocked
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    println!();

    let today = Utc::now().date_naive();
    let low = db.inventory().low_stock().await?;
    let expired = db.inventory().expired(today).await?;
    println!(
        "{} low-stock item(s), {} expired item(s) holding stock",
        low.len(),
        expired.len()
    );
    println!();
    Ok(())
}

async fn dump_sales(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== RECENT SALES (last 20, incl. voided) ===");
    println!(
        "{:<42} {:>10} {:>9} {:>9} {:>10} {:<8} {:<17}",
        "Transaction", "Subtotal", "Tax", "Disc", "Total", "Voided", "Date"
    );
    println!("{}", "-".repeat(112));

    for sale in db.sales().list_recent(20, true).await? {
        println!(
            "{:<42} {:>10} {:>9} {:>9} {:>10} {:<8} {:<17}",
            sale.transaction_number,
            Money::from_cents(sale.subtotal_cents).to_string(),
            Money::from_cents(sale.tax_cents).to_string(),
            Money::from_cents(sale.discount_cents).to_string(),
            Money::from_cents(sale.total_cents).to_string(),
            if sale.is_voided { "Yes" } else { "No" },
            sale.sale_date.format("%Y-%m-%d %H:%M"),
        );
    }
    println!();
    Ok(())
}
