//! # Report Service
//!
//! Sales PDF per period, top-sellers CSV and the stock trend view.

use chrono::{NaiveDate, Utc};
use stockroom_core::report::{
    csv::render_top_sellers, render_sales_report, trend, trend::StockTrendEntry, ReportPeriod,
};
use stockroom_db::Database;
use tracing::{info, warn};

use crate::error::ApiResult;

/// A rendered sales report ready to download.
#[derive(Debug, Clone)]
pub struct SalesPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    pub fn new(db: Database) -> Self {
        ReportService { db }
    }

    /// Renders the orders created between `start` and `end` (both days
    /// inclusive) as a PDF.
    pub async fn sales_pdf(&self, start: NaiveDate, end: NaiveDate) -> ApiResult<SalesPdf> {
        let period = ReportPeriod::new(start, end)?;
        let (from, until) = period.bounds();

        let orders = self.db.orders().in_period(from, until).await?;
        let bytes = render_sales_report(&period, &orders)?;

        info!(%start, %end, orders = orders.len(), size = bytes.len(), "Sales report generated");

        Ok(SalesPdf {
            filename: period.sales_filename(),
            bytes,
        })
    }

    /// Units sold per product as CSV, best seller first.
    pub async fn top_sellers_csv(&self) -> ApiResult<String> {
        let rows = self.db.reports().top_sellers().await?;
        let csv = render_top_sellers(&rows)?;

        info!(products = rows.len(), "Top-sellers report generated");
        Ok(csv)
    }

    /// Heuristic trend per product from stock level and last update.
    pub async fn stock_trends(&self) -> ApiResult<Vec<StockTrendEntry>> {
        warn!("Stock trend analysis is a simulation based on current stock and last update only");

        let products = self.db.products().list_plain().await?;
        Ok(trend::analyze(&products, Utc::now()))
    }
}
