//! # Seed Data Generator
//!
//! Populates the database with development data: a few accounts, the drink
//! menu, and inventory records for the tracked ingredients.
//!
//! ## Usage
//! ```bash
//! cargo run -p brew-db --bin seed
//!
//! # Specify database path
//! cargo run -p brew-db --bin seed -- --db ./data/brew.db
//! ```

use std::env;

use brew_core::{InventoryItem, Money, Product, Role};
use brew_db::{Database, DbConfig};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

/// Menu: (name, category, price cents, barcode)
const MENU: &[(&str, &str, i64, Option<&str>)] = &[
    ("Classic Milk Tea", "Milk Tea", 4500, Some("MT-001")),
    ("Wintermelon Milk Tea", "Milk Tea", 5000, Some("MT-002")),
    ("Taro Milk Tea", "Milk Tea", 5500, Some("MT-003")),
    ("Brown Sugar Boba", "Milk Tea", 6500, Some("MT-004")),
    ("Matcha Latte", "Specialty", 7000, Some("SP-001")),
    ("Strawberry Fruit Tea", "Fruit Tea", 5500, Some("FT-001")),
    ("Lychee Fruit Tea", "Fruit Tea", 5000, Some("FT-002")),
    ("Iced Americano", "Coffee", 5000, Some("CF-001")),
    ("Cafe Latte", "Coffee", 6000, Some("CF-002")),
    ("Bottled Water", "Extras", 2000, Some("4800016641503")),
];

/// Tracked ingredients: (name, category, price cents, stock, min, max,
/// cost cents, supplier, shelf, expires)
const INGREDIENTS: &[(
    &str,
    &str,
    i64,
    i64,
    i64,
    i64,
    i64,
    &str,
    &str,
    Option<(i32, u32, u32)>,
)] = &[
    (
        "Tapioca Pearls 1kg",
        "Ingredients",
        18000,
        24,
        6,
        60,
        14500,
        "Golden Pearl Trading",
        "Shelf A1",
        Some((2026, 11, 30)),
    ),
    (
        "Black Tea Leaves 500g",
        "Ingredients",
        32000,
        12,
        4,
        40,
        26000,
        "Highland Tea Co",
        "Shelf A2",
        Some((2027, 3, 15)),
    ),
    (
        "Condensed Milk Can",
        "Ingredients",
        9500,
        48,
        12,
        120,
        7800,
        "Metro Dairy Supply",
        "Shelf B1",
        Some((2026, 10, 1)),
    ),
    (
        "Wintermelon Syrup 2L",
        "Ingredients",
        42000,
        8,
        3,
        24,
        35000,
        "Sweetleaf Syrups",
        "Shelf B2",
        Some((2026, 9, 12)),
    ),
    (
        "Plastic Cups 16oz (50s)",
        "Packaging",
        12000,
        30,
        10,
        80,
        9500,
        "PackRight Mfg",
        "Stockroom C",
        None,
    ),
];

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
                println!("Brew POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
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

    println!("🌱 Brew POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Accounts: owner / manager / staff / PWD staff
    println!();
    println!("Creating users...");
    db.users()
        .create("owner", "owner123", "Rosa", "Dela Cruz", Role::Owner)
        .await?;
    db.users()
        .create("manager", "manager123", "Paolo", "Reyes", Role::Manager)
        .await?;
    db.users()
        .create("staff", "staff123", "Ana", "Santos", Role::Staff)
        .await?;
    let mut pwd = db
        .users()
        .create("pwdstaff", "staff123", "Jun", "Mercado", Role::PwdStaff)
        .await?;
    pwd.screen_reader_enabled = true;
    pwd.large_text_mode = true;
    db.users().update(&pwd).await?;
    println!("✓ 4 users created");

    // Menu products (untracked; drinks are made to order)
    println!("Creating menu products...");
    for (name, category, price_cents, barcode) in MENU {
        let mut product = Product::new(*name, Money::from_cents(*price_cents));
        product.category = Some((*category).to_string());
        product.barcode = barcode.map(str::to_string);
        product.unit = "cup".to_string();
        db.products().insert(&product).await?;
    }
    println!("✓ {} menu products created", MENU.len());

    // Tracked ingredients with inventory records
    println!("Creating tracked ingredients...");
    for (name, category, price, stock, min, max, cost, supplier, shelf, expires) in INGREDIENTS {
        let mut product = Product::new(*name, Money::from_cents(*price));
        product.category = Some((*category).to_string());
        db.products().insert(&product).await?;

        let mut item = InventoryItem::new(&product.id, *stock, *min);
        item.maximum_stock = *max;
        item.cost_price_cents = Some(*cost);
        item.supplier = Some((*supplier).to_string());
        item.location = Some((*shelf).to_string());
        item.expiration_date =
            expires.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        db.inventory().insert(&item).await?;
    }
    println!("✓ {} tracked ingredients created", INGREDIENTS.len());

    println!();
    println!("Done. Log in with owner/owner123 (or manager, staff, pwdstaff).");

    db.close().await;
    Ok(())
}
