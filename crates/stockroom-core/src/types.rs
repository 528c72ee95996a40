//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │    Supplier     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name (unique)  │   │  cnpj (unique)  │   │  status         │       │
//! │  └────────┬────────┘   │  email (unique) │   │  total_cents    │       │
//! │           │            └────────┬────────┘   └────────┬────────┘       │
//! │           │ 1..*                │ 1..*                │ 1..*           │
//! │           ▼                     ▼                     ▼                │
//! │  ┌─────────────────────────────────────┐   ┌─────────────────┐         │
//! │  │              Product                │◄──│   OrderItem     │         │
//! │  │  price_cents, stock_quantity        │   │  quantity       │         │
//! │  │  category_id, supplier_id           │   │  unit_price     │         │
//! │  └─────────────────────────────────────┘   │  (snapshot)     │         │
//! │                                            └─────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All entities serialize with camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::stock::{StockLevel, LOW_STOCK_THRESHOLD};

// =============================================================================
// Category
// =============================================================================

/// A product category. Names are unique across the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier of products.
///
/// `cnpj` (14-digit company tax id) and `email` are each unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub cnpj: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A stocked product as stored.
///
/// `stock_quantity` never goes below zero and only changes through stock
/// adjustments (order placement, cancellation, explicit increase/decrease).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in cents, always > 0.
    pub price_cents: i64,
    pub stock_quantity: i64,
    pub category_id: String,
    pub supplier_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Bumped on every edit and every stock adjustment.
    #[ts(as = "String")]
    #[serde(rename = "lastUpdated")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether stock sits below the alert threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity < LOW_STOCK_THRESHOLD
    }
}

/// Product as returned by the API, with its category and supplier embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock_quantity: i64,
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
    pub category: Category,
    pub supplier: Supplier,
}

impl ProductDetails {
    /// Current stock as a [`StockLevel`], for alerting.
    pub fn stock_level(&self) -> StockLevel {
        StockLevel {
            product_id: self.id.clone(),
            product_name: self.name.clone(),
            supplier_name: self.supplier.name.clone(),
            quantity: self.stock_quantity,
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle state of an order.
///
/// ## State Machine
/// ```text
///               ┌──────────────┐
///        ┌─────►│  COMPLETED   │──────────┐
///        │      └──────────────┘          │ (restores stock)
/// ┌──────┴──────┐      ✗ back to PENDING  ▼
/// │   PENDING   │───────────────────►┌──────────────┐
/// └─────────────┘  (restores stock)  │  CANCELLED   │  terminal
///                                    └──────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Placed, stock already taken out.
    Pending,
    /// Fulfilled.
    Completed,
    /// Cancelled, stock given back.
    Cancelled,
}

/// What a status change does to the stock of the order's products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockEffect {
    /// Stock stays as it is.
    None,
    /// Every item's quantity goes back to its product.
    Restore,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Checks a status change and reports its effect on stock.
    ///
    /// ## Rules
    /// - CANCELLED is terminal: every change from it is rejected
    /// - COMPLETED cannot go back to PENDING
    /// - Moving into CANCELLED restores stock
    /// - Anything else is accepted without touching stock
    pub fn transition_to(self, next: OrderStatus) -> CoreResult<StockEffect> {
        match (self, next) {
            (OrderStatus::Cancelled, _) | (OrderStatus::Completed, OrderStatus::Pending) => {
                Err(CoreError::InvalidStatusTransition {
                    from: self,
                    to: next,
                })
            }
            (_, OrderStatus::Cancelled) => Ok(StockEffect::Restore),
            _ => Ok(StockEffect::None),
        }
    }

    /// Whether deleting an order in this state gives its stock back.
    ///
    /// Only completed orders keep their stock out. A cancelled order is
    /// restored again on delete, even though cancelling already restored it.
    pub const fn restores_stock_on_delete(&self) -> bool {
        !matches!(self, OrderStatus::Completed)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order with its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    /// Σ unit_price_cents × quantity over `items`.
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<OrderItem>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Sums line subtotals, failing with [`CoreError::AmountOverflow`]
    /// when the total leaves the i64 range.
    pub fn compute_total(items: &[OrderItem]) -> CoreResult<Money> {
        Money::checked_sum(items.iter().map(OrderItem::subtotal)).ok_or(CoreError::AmountOverflow)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line of an order.
/// Uses snapshot pattern: `unit_price_cents` is the product price at the
/// moment the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

impl OrderItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// `unit_price_cents × quantity`, failing with
    /// [`CoreError::AmountOverflow`] instead of wrapping.
    pub fn line_subtotal(unit_price_cents: i64, quantity: i64) -> CoreResult<Money> {
        Money::from_cents(unit_price_cents)
            .checked_mul(quantity)
            .ok_or(CoreError::AmountOverflow)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(unit_price_cents: i64, quantity: i64) -> OrderItem {
        OrderItem {
            id: "i".to_string(),
            order_id: "o".to_string(),
            product_id: "p".to_string(),
            product_name: "Widget".to_string(),
            quantity,
            unit_price_cents,
            subtotal_cents: unit_price_cents * quantity,
        }
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_pending_transitions() {
        assert_eq!(
            OrderStatus::Pending.transition_to(OrderStatus::Completed).unwrap(),
            StockEffect::None
        );
        assert_eq!(
            OrderStatus::Pending.transition_to(OrderStatus::Cancelled).unwrap(),
            StockEffect::Restore
        );
        assert_eq!(
            OrderStatus::Pending.transition_to(OrderStatus::Pending).unwrap(),
            StockEffect::None
        );
    }

    #[test]
    fn test_completed_cannot_go_back_to_pending() {
        let err = OrderStatus::Completed
            .transition_to(OrderStatus::Pending)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatusTransition { .. }));

        assert_eq!(
            OrderStatus::Completed.transition_to(OrderStatus::Cancelled).unwrap(),
            StockEffect::Restore
        );
    }

    #[test]
    fn test_cancelled_is_terminal() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(OrderStatus::Cancelled.transition_to(next).is_err());
        }
    }

    #[test]
    fn test_restores_stock_on_delete() {
        assert!(OrderStatus::Pending.restores_stock_on_delete());
        assert!(!OrderStatus::Completed.restores_stock_on_delete());
        assert!(OrderStatus::Cancelled.restores_stock_on_delete());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"CANCELLED\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(parsed, OrderStatus::Completed);
    }

    #[test]
    fn test_compute_total() {
        let items = vec![item(1099, 2), item(500, 3)];
        assert_eq!(Order::compute_total(&items).unwrap().cents(), 2198 + 1500);
        assert_eq!(items[0].subtotal().cents(), 2198);
    }

    #[test]
    fn test_amount_overflow_is_an_error() {
        assert_eq!(OrderItem::line_subtotal(1099, 3).unwrap().cents(), 3297);
        assert!(matches!(
            OrderItem::line_subtotal(1000, 100_000_000_000_000_000),
            Err(CoreError::AmountOverflow)
        ));

        let items = vec![item(i64::MAX, 1), item(1, 1)];
        assert!(matches!(
            Order::compute_total(&items),
            Err(CoreError::AmountOverflow)
        ));
    }
}
