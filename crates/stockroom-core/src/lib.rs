//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! Domain model, validation and rules of the inventory backend, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stockroom Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    routes ──► services ──► NotificationService / StockMonitor  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌────────────┐ ┌──────────────┐   │   │
//! │  │   │  types   │ │ requests │ │ validation │ │    report    │   │   │
//! │  │   │ Product  │ │ NewOrder │ │  cnpj      │ │  pdf / csv   │   │   │
//! │  │   │ Order    │ │ ...Input │ │  email     │ │  trend       │   │   │
//! │  │   └──────────┘ └──────────┘ └────────────┘ └──────────────┘   │   │
//! │  │   ┌──────────┐ ┌──────────┐                                    │   │
//! │  │   │  money   │ │  stock   │                                    │   │
//! │  │   └──────────┘ └──────────┘                                    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  stockroom-db (Database Layer)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Category, Supplier, Product, Order) and the order lifecycle
//! - [`requests`] - Create/update payloads with their validation
//! - [`validation`] - Field validators
//! - [`stock`] - Low-stock threshold and alerts
//! - [`money`] - Integer-cents money type
//! - [`report`] - Sales PDF, top-sellers CSV, stock trends
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::{OrderStatus, StockEffect};
//!
//! // Cancelling a pending order gives its stock back
//! let effect = OrderStatus::Pending.transition_to(OrderStatus::Cancelled).unwrap();
//! assert_eq!(effect, StockEffect::Restore);
//!
//! // A cancelled order never changes again
//! assert!(OrderStatus::Cancelled.transition_to(OrderStatus::Completed).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod requests;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Business Limits
// =============================================================================

/// Largest quantity accepted on one order line or one stock adjustment.
pub const MAX_ITEM_QUANTITY: i64 = 10_000;

/// Largest number of lines on one order.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Ceiling for a product's stock level, at creation and after increases.
pub const MAX_STOCK_QUANTITY: i64 = 1_000_000_000;

/// Largest unit price, in cents ($100,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 10_000_000_000;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use money::Money;
pub use requests::*;
pub use stock::{LowStockAlert, StockDirection, StockLevel, LOW_STOCK_THRESHOLD};
pub use types::*;
