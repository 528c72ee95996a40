//! # Seed Data Generator
//!
//! Populates the database with demo data for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./stockroom.db
//! cargo run -p stockroom-db --bin seed
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! ## Generated Data
//! - 3 categories and 2 suppliers
//! - 4 products per category, a few of them already under the low-stock
//!   threshold so the monitor has something to report
//! - 6 orders: some left PENDING, some COMPLETED, one CANCELLED

use std::env;

use stockroom_core::{
    CategoryInput, NewProduct, OrderItemInput, OrderStatus, Product, SupplierInput,
};
use stockroom_db::{Database, DbConfig};

/// Categories with their products: (name, price in cents, initial stock).
const CATALOGUE: &[(&str, &str, &[(&str, i64, i64)])] = &[
    (
        "Peripherals",
        "Keyboards, mice and other input devices",
        &[
            ("Wireless Mouse", 2990, 40),
            ("Mechanical Keyboard", 18900, 12),
            ("USB Headset", 7450, 3),
            ("Webcam HD", 15900, 60),
        ],
    ),
    (
        "Cables",
        "Power, data and video cables",
        &[
            ("HDMI Cable 2m", 1990, 120),
            ("USB-C Cable 1m", 1490, 80),
            ("DisplayPort Cable", 2490, 4),
            ("Power Strip 6 Outlets", 5990, 25),
        ],
    ),
    (
        "Storage",
        "Drives and memory cards",
        &[
            ("SSD 1TB", 44900, 15),
            ("External HDD 2TB", 39900, 7),
            ("SD Card 128GB", 8900, 2),
            ("USB Flash Drive 64GB", 3990, 55),
        ],
    ),
];

const SUPPLIERS: &[(&str, &str, &str, &str)] = &[
    ("Acme Distribution", "12345678000199", "sales@acme.example.com", "1133334444"),
    ("Globex Supplies", "98765432000155", "orders@globex.example.com", "21987654321"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./stockroom.db");

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
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stockroom Seed Data Generator");
    println!("================================");
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

    let mut suppliers = Vec::new();
    for (name, cnpj, email, phone) in SUPPLIERS {
        let supplier = db
            .suppliers()
            .insert(&SupplierInput {
                name: name.to_string(),
                cnpj: cnpj.to_string(),
                email: email.to_string(),
                phone: Some(phone.to_string()),
                address: None,
            })
            .await?;
        suppliers.push(supplier);
    }
    println!("✓ {} suppliers", suppliers.len());

    let mut products: Vec<Product> = Vec::new();
    for (idx, (category_name, description, items)) in CATALOGUE.iter().enumerate() {
        let category = db
            .categories()
            .insert(&CategoryInput {
                name: category_name.to_string(),
                description: Some(description.to_string()),
            })
            .await?;

        let supplier = &suppliers[idx % suppliers.len()];
        for (name, price_cents, stock) in items.iter() {
            let product = db
                .products()
                .insert(&NewProduct {
                    name: name.to_string(),
                    description: None,
                    price_cents: *price_cents,
                    stock_quantity: *stock,
                    category_id: category.id.clone(),
                    supplier_id: supplier.id.clone(),
                })
                .await?;
            products.push(product);
        }
    }
    println!("✓ {} categories, {} products", CATALOGUE.len(), products.len());

    // Orders take stock out, so only products with plenty of it are used.
    let stocked: Vec<&Product> = products.iter().filter(|p| p.stock_quantity >= 20).collect();
    let mut orders = 0;
    for n in 0..6 {
        let first = stocked[n % stocked.len()];
        let second = stocked[(n + 3) % stocked.len()];
        let lines = [
            OrderItemInput {
                product_id: first.id.clone(),
                quantity: 1 + (n as i64 % 3),
            },
            OrderItemInput {
                product_id: second.id.clone(),
                quantity: 2,
            },
        ];

        let (order, _) = db.orders().create(&lines).await?;
        let status = match n {
            0..=2 => OrderStatus::Completed,
            3 => OrderStatus::Cancelled,
            _ => OrderStatus::Pending,
        };
        if status != OrderStatus::Pending {
            db.orders().update_status(&order.id, status).await?;
        }
        orders += 1;
    }
    println!("✓ {} orders", orders);

    let low = db.products().low_stock(stockroom_core::LOW_STOCK_THRESHOLD).await?;
    println!();
    println!("Products under the low-stock threshold: {}", low.len());
    for product in &low {
        println!("  {} ({} left)", product.name, product.stock_quantity);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
