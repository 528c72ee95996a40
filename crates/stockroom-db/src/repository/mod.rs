//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Service (apps/api)                                                    │
//! │       │                                                                 │
//! │       │  db.orders().create(&items)                                    │
//! │       ▼                                                                 │
//! │  OrderRepository                                                        │
//! │  ├── BEGIN                                                              │
//! │  ├── product::adjust_stock_in(tx, id, -qty)   ← conditional UPDATE     │
//! │  ├── INSERT orders / order_items                                       │
//! │  └── COMMIT   (any error → ROLLBACK, no stock moved)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD and name lookups
//! - [`SupplierRepository`](supplier::SupplierRepository) - Supplier CRUD and CNPJ/e-mail lookups
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD, searches, stock adjustment
//! - [`OrderRepository`](order::OrderRepository) - Orders with items, status changes
//! - [`ReportRepository`](report::ReportRepository) - Aggregations for reports

pub mod category;
pub mod order;
pub mod product;
pub mod report;
pub mod supplier;

/// Generates a new entity id (UUID v4).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
