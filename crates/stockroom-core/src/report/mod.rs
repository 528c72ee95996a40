//! # Reports
//!
//! Turns rows already loaded from the database into downloadable bytes.
//!
//! ## Available Reports
//! ```text
//! ┌──────────────────────┬──────────────────────────┬─────────────────────┐
//! │ Report               │ Input                    │ Output              │
//! ├──────────────────────┼──────────────────────────┼─────────────────────┤
//! │ Sales (by period)    │ orders + items in period │ PDF (pdf.rs)        │
//! │ Top sellers          │ Σ quantity per product   │ CSV (csv.rs)        │
//! │ Stock trends         │ all products             │ JSON (trend.rs)     │
//! └──────────────────────┴──────────────────────────┴─────────────────────┘
//! ```

pub mod csv;
pub mod pdf;
pub mod trend;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Order;
use pdf::PdfDocument;

// =============================================================================
// Report Period
// =============================================================================

/// An inclusive range of calendar days, interpreted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportPeriod {
    /// Rejects periods whose start is after their end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start > end || end.checked_add_days(Days::new(1)).is_none() {
            return Err(CoreError::InvalidPeriod { start, end });
        }
        Ok(ReportPeriod { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Half-open timestamp bounds: `[start 00:00, end+1 00:00)`.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = Utc.from_utc_datetime(&self.start.and_time(chrono::NaiveTime::MIN));
        let next_day = self.end.checked_add_days(Days::new(1)).unwrap_or(self.end);
        let until = Utc.from_utc_datetime(&next_day.and_time(chrono::NaiveTime::MIN));
        (from, until)
    }

    /// Download name of the sales PDF for this period.
    pub fn sales_filename(&self) -> String {
        format!("sales_report_{}_to_{}.pdf", self.start, self.end)
    }
}

// =============================================================================
// Sales Report
// =============================================================================

/// Renders the sales PDF for `orders` (with items loaded).
///
/// ## Layout
/// ```text
/// Sales Report
/// Period: 2024-03-01 to 2024-03-31
///
/// Order 5f0c…                                   (bold)
/// Date: 2024-03-02 14:05  Status: COMPLETED  Total: $42.00
///   - Mouse (2 x $10.00) = $20.00
///   - Cable (1 x $22.00) = $22.00
/// ...
/// Orders: 12  Grand total: $1234.56             (bold)
/// ```
///
/// An empty `orders` slice is an [`CoreError::EmptyReport`].
pub fn render_sales_report(period: &ReportPeriod, orders: &[Order]) -> CoreResult<Vec<u8>> {
    if orders.is_empty() {
        return Err(CoreError::EmptyReport(format!(
            "No orders found between {} and {}",
            period.start, period.end
        )));
    }

    let mut doc = PdfDocument::new();
    doc.heading("Sales Report");
    doc.line(&format!("Period: {} to {}", period.start, period.end));
    doc.blank();

    for order in orders {
        doc.bold_line(&format!("Order {}", order.id));
        doc.line(&format!(
            "Date: {}  Status: {}  Total: {}",
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.status,
            order.total()
        ));
        for item in &order.items {
            doc.line(&format!(
                "  - {} ({} x {}) = {}",
                item.product_name,
                item.quantity,
                item.unit_price(),
                item.subtotal()
            ));
        }
        doc.blank();
    }

    let grand_total =
        Money::checked_sum(orders.iter().map(Order::total)).ok_or(CoreError::AmountOverflow)?;
    doc.bold_line(&format!(
        "Orders: {}  Grand total: {}",
        orders.len(),
        grand_total
    ));

    Ok(doc.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderItem, OrderStatus};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn order(total_cents: i64) -> Order {
        let now = Utc::now();
        Order {
            id: "o-1".to_string(),
            status: OrderStatus::Completed,
            total_cents,
            created_at: now,
            updated_at: now,
            items: vec![OrderItem {
                id: "i-1".to_string(),
                order_id: "o-1".to_string(),
                product_id: "p-1".to_string(),
                product_name: "Mouse (wireless)".to_string(),
                quantity: 2,
                unit_price_cents: total_cents / 2,
                subtotal_cents: total_cents,
            }],
        }
    }

    #[test]
    fn test_period_rejects_reversed_dates() {
        assert!(ReportPeriod::new(date("2024-03-02"), date("2024-03-01")).is_err());
        assert!(ReportPeriod::new(date("2024-03-01"), date("2024-03-01")).is_ok());
    }

    #[test]
    fn test_period_bounds_are_half_open() {
        let period = ReportPeriod::new(date("2024-03-01"), date("2024-03-31")).unwrap();
        let (from, until) = period.bounds();
        assert_eq!(from.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(until.to_rfc3339(), "2024-04-01T00:00:00+00:00");
        assert_eq!(period.sales_filename(), "sales_report_2024-03-01_to_2024-03-31.pdf");
    }

    #[test]
    fn test_empty_sales_report_is_an_error() {
        let period = ReportPeriod::new(date("2024-03-01"), date("2024-03-31")).unwrap();
        assert!(matches!(
            render_sales_report(&period, &[]),
            Err(CoreError::EmptyReport(_))
        ));
    }

    #[test]
    fn test_sales_report_contents() {
        let period = ReportPeriod::new(date("2024-03-01"), date("2024-03-31")).unwrap();
        let bytes = render_sales_report(&period, &[order(2000), order(1000)]).unwrap();
        let text = String::from_utf8_lossy(&bytes);

        assert!(bytes.starts_with(b"%PDF-"));
        assert!(text.contains("(Period: 2024-03-01 to 2024-03-31)"));
        assert!(text.contains("Mouse \\(wireless\\) \\(2 x $10.00\\) = $20.00"));
        assert!(text.contains("(Orders: 2  Grand total: $30.00)"));
    }

    #[test]
    fn test_sales_report_grand_total_overflow() {
        let period = ReportPeriod::new(date("2024-03-01"), date("2024-03-31")).unwrap();
        assert!(matches!(
            render_sales_report(&period, &[order(i64::MAX), order(2)]),
            Err(CoreError::AmountOverflow)
        ));
    }
}
