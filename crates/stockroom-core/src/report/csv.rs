//! Top-sellers CSV rendering.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Header row of the top-sellers CSV.
pub const TOP_SELLERS_HEADER: &str = "product_id,product_name,total_sold";

/// Download name of the top-sellers CSV.
pub const TOP_SELLERS_FILENAME: &str = "top_selling_products.csv";

/// Units sold of one product, aggregated over order items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TopSeller {
    pub product_id: String,
    pub product_name: String,
    pub total_sold: i64,
}

/// Renders rows (already sorted best-first) as CSV.
///
/// Product names are always quoted with embedded quotes doubled. An empty
/// slice is an [`CoreError::EmptyReport`].
pub fn render_top_sellers(rows: &[TopSeller]) -> CoreResult<String> {
    if rows.is_empty() {
        return Err(CoreError::EmptyReport(
            "No sales data found to generate the top-sellers report".to_string(),
        ));
    }

    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(TOP_SELLERS_HEADER);
    out.push('\n');

    for row in rows {
        out.push_str(&row.product_id);
        out.push(',');
        out.push_str(&quote(&row.product_name));
        out.push(',');
        out.push_str(&row.total_sold.to_string());
        out.push('\n');
    }

    Ok(out)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
