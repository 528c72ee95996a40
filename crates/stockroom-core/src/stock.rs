//! # Stock Rules
//!
//! The low-stock threshold and the alert raised when a product drops
//! under it.
//!
//! ## When Alerts Fire
//! ```text
//! stock adjustment (order, cancel, delete, increase, decrease, create)
//!      │
//!      ▼
//! new quantity < LOW_STOCK_THRESHOLD ? ──no──► nothing
//!      │ yes
//!      ▼
//! LowStockAlert ──► NotificationService (log + optional e-mail)
//! ```
//!
//! The hourly monitor raises the same alert for every product still below
//! the threshold.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Products with fewer units than this are low on stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Returns true when `quantity` is under the alert threshold.
#[inline]
pub const fn is_low(quantity: i64) -> bool {
    quantity < LOW_STOCK_THRESHOLD
}

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockDirection {
    Increase,
    Decrease,
}

impl StockDirection {
    /// Signed delta for `quantity` units.
    pub const fn delta(&self, quantity: i64) -> i64 {
        match self {
            StockDirection::Increase => quantity,
            StockDirection::Decrease => quantity.saturating_neg(),
        }
    }
}

/// Result of one persisted stock adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    pub product_id: String,
    pub product_name: String,
    pub supplier_name: String,
    pub quantity: i64,
}

impl StockLevel {
    /// The alert this level triggers, if it is under the threshold.
    pub fn alert(&self) -> Option<LowStockAlert> {
        is_low(self.quantity).then(|| LowStockAlert {
            product_id: self.product_id.clone(),
            product_name: self.product_name.clone(),
            supplier_name: self.supplier_name.clone(),
            current_quantity: self.quantity,
        })
    }
}

/// A product that dropped under [`LOW_STOCK_THRESHOLD`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LowStockAlert {
    pub product_id: String,
    pub product_name: String,
    pub supplier_name: String,
    pub current_quantity: i64,
}

impl LowStockAlert {
    /// E-mail subject line.
    pub fn subject(&self) -> String {
        format!("[LOW STOCK ALERT] Product: {}", self.product_name)
    }

    /// Plain-text e-mail body.
    pub fn body(&self) -> String {
        format!(
            "Hello,\n\n\
             The product below has reached a low stock level:\n\n\
             Product: {name}\n\
             Product ID: {id}\n\
             Current quantity: {qty}\n\
             Supplier: {supplier}\n\n\
             Please restock as soon as possible.\n\n\
             Regards,\n\
             Stock Management System",
            name = self.product_name,
            id = self.product_id,
            qty = self.current_quantity,
            supplier = self.supplier_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(quantity: i64) -> StockLevel {
        StockLevel {
            product_id: "p-1".to_string(),
            product_name: "Mouse".to_string(),
            supplier_name: "Acme".to_string(),
            quantity,
        }
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert!(is_low(0));
        assert!(is_low(4));
        assert!(!is_low(5));
        assert!(level(5).alert().is_none());
        assert_eq!(level(4).alert().unwrap().current_quantity, 4);
    }

    #[test]
    fn test_alert_message() {
        let alert = level(2).alert().unwrap();
        assert_eq!(alert.subject(), "[LOW STOCK ALERT] Product: Mouse");
        let body = alert.body();
        assert!(body.contains("Product ID: p-1"));
        assert!(body.contains("Current quantity: 2"));
        assert!(body.contains("Supplier: Acme"));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(StockDirection::Increase.delta(3), 3);
        assert_eq!(StockDirection::Decrease.delta(3), -3);
    }
}
