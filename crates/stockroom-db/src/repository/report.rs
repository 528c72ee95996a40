//! # Report Repository
//!
//! Aggregation queries behind the downloadable reports. Rendering happens in
//! `stockroom_core::report`.

use sqlx::SqlitePool;

use crate::error::DbResult;
use stockroom_core::report::csv::TopSeller;

/// Read-only reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Units sold per product, best seller first.
    ///
    /// Items of cancelled orders are not counted. Ties break on product name.
    pub async fn top_sellers(&self) -> DbResult<Vec<TopSeller>> {
        let rows = sqlx::query_as::<_, TopSeller>(
            r#"
            SELECT
                p.id AS product_id,
                p.name AS product_name,
                SUM(oi.quantity) AS total_sold
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            WHERE o.status != 'CANCELLED'
            GROUP BY p.id, p.name
            ORDER BY total_sold DESC, p.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::product::tests::seed_product;
    use crate::{Database, DbConfig};
    use stockroom_core::{OrderItemInput, OrderStatus};

    fn line(product_id: &str, quantity: i64) -> OrderItemInput {
        OrderItemInput {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_top_sellers_skip_cancelled_orders() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Mouse", 50).await;
        let cable = seed_product(&db, "Cable", 50).await;

        db.orders()
            .create(&[line(&mouse.id, 2), line(&cable.id, 5)])
            .await
            .unwrap();
        db.orders().create(&[line(&mouse.id, 1)]).await.unwrap();
        let (cancelled, _) = db.orders().create(&[line(&mouse.id, 20)]).await.unwrap();
        db.orders()
            .update_status(&cancelled.id, OrderStatus::Cancelled)
            .await
            .unwrap();

        let rows = db.reports().top_sellers().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_name, "Cable");
        assert_eq!(rows[0].total_sold, 5);
        assert_eq!(rows[1].product_name, "Mouse");
        assert_eq!(rows[1].total_sold, 3);
    }

    #[tokio::test]
    async fn test_top_sellers_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.reports().top_sellers().await.unwrap().is_empty());
    }
}
