//! # Stock Trend Heuristic
//!
//! Labels each product from its current stock and how recently it changed.
//! This is a rule of thumb, not a forecast: there is no sales history
//! behind it.
//!
//! ```text
//! stock < 5                               → LOW_STOCK
//! stock > 50 and updated in last 7 days   → STABLE_OR_RISING
//! otherwise                               → STABLE
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::stock::is_low;
use crate::types::Product;

/// Stock above this counts as high availability.
pub const HIGH_STOCK_THRESHOLD: i64 = 50;

/// How recent an update must be to count as a restock.
pub const RECENT_RESTOCK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockTrend {
    LowStock,
    StableOrRising,
    Stable,
}

impl StockTrend {
    /// Classifies one product as of `now`.
    pub fn classify(quantity: i64, last_updated: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if is_low(quantity) {
            StockTrend::LowStock
        } else if quantity > HIGH_STOCK_THRESHOLD
            && now - last_updated <= Duration::days(RECENT_RESTOCK_DAYS)
        {
            StockTrend::StableOrRising
        } else {
            StockTrend::Stable
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            StockTrend::LowStock => "Alert: low stock. Restock!",
            StockTrend::StableOrRising => {
                "Stable/Increasing (recently restocked or high availability)"
            }
            StockTrend::Stable => "Stable",
        }
    }
}

/// One row of `GET /api/products/stock-trends`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockTrendEntry {
    pub product_id: String,
    pub product_name: String,
    pub current_quantity: i64,
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
    pub trend: StockTrend,
    pub label: String,
}

/// Builds the trend view for every product, in input order.
pub fn analyze(products: &[Product], now: DateTime<Utc>) -> Vec<StockTrendEntry> {
    products
        .iter()
        .map(|p| {
            let trend = StockTrend::classify(p.stock_quantity, p.updated_at, now);
            StockTrendEntry {
                product_id: p.id.clone(),
                product_name: p.name.clone(),
                current_quantity: p.stock_quantity,
                last_updated: p.updated_at,
                trend,
                label: trend.label().to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let now = Utc::now();
        let yesterday = now - Duration::days(1);
        let last_month = now - Duration::days(30);

        assert_eq!(StockTrend::classify(4, yesterday, now), StockTrend::LowStock);
        assert_eq!(StockTrend::classify(0, last_month, now), StockTrend::LowStock);
        assert_eq!(
            StockTrend::classify(51, yesterday, now),
            StockTrend::StableOrRising
        );
        assert_eq!(StockTrend::classify(51, last_month, now), StockTrend::Stable);
        assert_eq!(StockTrend::classify(50, yesterday, now), StockTrend::Stable);
        assert_eq!(StockTrend::classify(5, yesterday, now), StockTrend::Stable);
    }

    #[test]
    fn test_analyze_copies_labels() {
        let now = Utc::now();
        let product = Product {
            id: "p1".to_string(),
            name: "Cable".to_string(),
            description: None,
            price_cents: 500,
            stock_quantity: 2,
            category_id: "c".to_string(),
            supplier_id: "s".to_string(),
            created_at: now,
            updated_at: now,
        };

        let entries = analyze(&[product], now);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].trend, StockTrend::LowStock);
        assert_eq!(entries[0].label, "Alert: low stock. Restock!");
    }
}
