//! # Order Repository
//!
//! Orders, their items, and the stock movements tied to them.
//!
//! ## Transactions
//! ```text
//! ┌──────────────────┬────────────────────────────────────────────────────┐
//! │ Operation        │ Inside one transaction                              │
//! ├──────────────────┼────────────────────────────────────────────────────┤
//! │ create           │ decrement every item, snapshot prices, insert      │
//! │ update_status    │ check transition, restore stock if cancelling      │
//! │ delete           │ restore stock unless COMPLETED, delete (cascade)   │
//! └──────────────────┴────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation returns the [`StockLevel`]s it produced so the caller can
//! raise low-stock alerts once the transaction has committed. A failure at
//! any step drops the transaction, which rolls back every stock change.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use crate::repository::product::adjust_stock_in;
use stockroom_core::{Order, OrderItem, OrderItemInput, OrderStatus, StockEffect, StockLevel};

const ORDER_COLUMNS: &str = "id, status, total_cents, created_at, updated_at";

const ITEMS_SELECT: &str = r#"
    SELECT
        oi.id, oi.order_id, oi.product_id, p.name AS product_name, oi.quantity,
        oi.unit_price_cents, oi.quantity * oi.unit_price_cents AS subtotal_cents
    FROM order_items oi
    JOIN orders o ON o.id = oi.order_id
    JOIN products p ON p.id = oi.product_id
"#;

/// Distributes items to their orders, keeping item order.
fn attach_items(orders: &mut [Order], items: Vec<OrderItem>) {
    let mut by_order: HashMap<String, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id.clone()).or_default().push(item);
    }
    for order in orders.iter_mut() {
        order.items = by_order.remove(&order.id).unwrap_or_default();
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Lists all orders, newest first, with items.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC");
        let mut orders = sqlx::query_as::<_, Order>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!("{ITEMS_SELECT} ORDER BY oi.order_id, oi.position");
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        attach_items(&mut orders, items);
        Ok(orders)
    }

    /// Gets an order with its items.
    pub async fn get(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");
        let Some(mut order) = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let sql = format!("{ITEMS_SELECT} WHERE oi.order_id = ?1 ORDER BY oi.position");
        order.items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(order))
    }

    /// Orders created in `[from, until)`, oldest first, with items.
    pub async fn in_period(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE created_at >= ?1 AND created_at < ?2 ORDER BY created_at"
        );
        let mut orders = sqlx::query_as::<_, Order>(&sql)
            .bind(from)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!(
            "{ITEMS_SELECT} WHERE o.created_at >= ?1 AND o.created_at < ?2 \
             ORDER BY oi.order_id, oi.position"
        );
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(from)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;

        attach_items(&mut orders, items);
        Ok(orders)
    }

    /// Places a PENDING order.
    ///
    /// Each item takes its quantity out of stock and snapshots the current
    /// product price.
    ///
    /// ## Returns
    /// * `Ok((order, levels))` - the stored order and one level per item
    /// * `Err(DbError::NotFound)` - an item names a missing product
    /// * `Err(DbError::Domain(CoreError::InsufficientStock))` - nothing is
    ///   written for any item
    /// * `Err(DbError::Domain(CoreError::AmountOverflow))` - a subtotal or the
    ///   total does not fit in i64 cents; nothing is written
    pub async fn create(&self, lines: &[OrderItemInput]) -> DbResult<(Order, Vec<StockLevel>)> {
        let order_id = generate_id();
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let mut items = Vec::with_capacity(lines.len());
        let mut levels = Vec::with_capacity(lines.len());

        for line in lines {
            let level =
                adjust_stock_in(&mut *tx, &line.product_id, line.quantity.saturating_neg()).await?;

            let unit_price_cents: i64 =
                sqlx::query_scalar("SELECT price_cents FROM products WHERE id = ?1")
                    .bind(&line.product_id)
                    .fetch_one(&mut *tx)
                    .await?;

            let subtotal = OrderItem::line_subtotal(unit_price_cents, line.quantity)?;

            items.push(OrderItem {
                id: generate_id(),
                order_id: order_id.clone(),
                product_id: line.product_id.clone(),
                product_name: level.product_name.clone(),
                quantity: line.quantity,
                unit_price_cents,
                subtotal_cents: subtotal.cents(),
            });
            levels.push(level);
        }

        let order = Order {
            id: order_id,
            status: OrderStatus::Pending,
            total_cents: Order::compute_total(&items)?.cents(),
            created_at: now,
            updated_at: now,
            items,
        };

        sqlx::query(
            r#"
            INSERT INTO orders (id, status, total_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&order.id)
        .bind(order.status)
        .bind(order.total_cents)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id, quantity, unit_price_cents, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            id = %order.id,
            items = order.items.len(),
            total = %order.total(),
            "Order created"
        );

        Ok((order, levels))
    }

    /// Moves an order to `next`, restoring stock when it gets cancelled.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Order doesn't exist
    /// * `Err(DbError::Domain(CoreError::InvalidStatusTransition))` - not allowed
    pub async fn update_status(
        &self,
        id: &str,
        next: OrderStatus,
    ) -> DbResult<(Order, Vec<StockLevel>)> {
        let mut tx = self.pool.begin().await?;

        let current = current_status(&mut *tx, id).await?;
        let effect = current.transition_to(next)?;

        let levels = match effect {
            StockEffect::Restore => restore_items(&mut *tx, id).await?,
            StockEffect::None => Vec::new(),
        };

        sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(next)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(id = %id, from = %current, to = %next, "Order status changed");

        let order = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))?;

        Ok((order, levels))
    }

    /// Deletes an order. Any order that is not COMPLETED gives its stock
    /// back first, including a CANCELLED one that was already restored.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Order doesn't exist
    pub async fn delete(&self, id: &str) -> DbResult<Vec<StockLevel>> {
        let mut tx = self.pool.begin().await?;

        let status = current_status(&mut *tx, id).await?;
        let levels = if status.restores_stock_on_delete() {
            restore_items(&mut *tx, id).await?
        } else {
            Vec::new()
        };

        sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(id = %id, status = %status, restored = levels.len(), "Order deleted");

        Ok(levels)
    }
}

async fn current_status(conn: &mut SqliteConnection, id: &str) -> DbResult<OrderStatus> {
    sqlx::query_scalar::<_, OrderStatus>("SELECT status FROM orders WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("Order", id))
}

/// Puts every item's quantity back on its product.
async fn restore_items(conn: &mut SqliteConnection, order_id: &str) -> DbResult<Vec<StockLevel>> {
    let lines: Vec<(String, i64)> = sqlx::query_as(
        "SELECT product_id, quantity FROM order_items WHERE order_id = ?1 ORDER BY position",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut levels = Vec::with_capacity(lines.len());
    for (product_id, quantity) in lines {
        levels.push(adjust_stock_in(&mut *conn, &product_id, quantity).await?);
    }

    debug!(order_id = %order_id, items = levels.len(), "Order stock restored");
    Ok(levels)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::repository::product::tests::seed_product;
    use crate::{Database, DbConfig, DbError};
    use stockroom_core::{CoreError, OrderItemInput, OrderStatus, ProductUpdate};

    fn line(product_id: &str, quantity: i64) -> OrderItemInput {
        OrderItemInput {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    async fn stock_of(db: &Database, id: &str) -> i64 {
        db.products()
            .get_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .stock_quantity
    }

    #[tokio::test]
    async fn test_create_decrements_and_snapshots_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Mouse", 10).await;
        let cable = seed_product(&db, "Cable", 6).await;

        let (order, levels) = db
            .orders()
            .create(&[line(&mouse.id, 2), line(&cable.id, 3)])
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_cents, 5 * 1000);
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1].quantity, 3);
        assert!(levels[1].alert().is_some());
        assert_eq!(stock_of(&db, &mouse.id).await, 8);

        db.products()
            .update(
                &mouse.id,
                &ProductUpdate {
                    name: "Mouse".to_string(),
                    description: None,
                    price_cents: 9999,
                    category_id: mouse.category_id.clone(),
                    supplier_id: mouse.supplier_id.clone(),
                },
            )
            .await
            .unwrap();

        let stored = db.orders().get(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 5000);
        assert_eq!(stored.items[0].product_name, "Mouse");
        assert_eq!(stored.items[0].unit_price_cents, 1000);
        assert_eq!(stored.items[0].subtotal_cents, 2000);
        assert_eq!(stored.items[1].product_name, "Cable");
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_every_item() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Mouse", 10).await;
        let cable = seed_product(&db, "Cable", 1).await;

        let err = db
            .orders()
            .create(&[line(&mouse.id, 2), line(&cable.id, 3)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock { .. })
        ));
        assert_eq!(stock_of(&db, &mouse.id).await, 10);
        assert_eq!(stock_of(&db, &cable.id).await, 1);
        assert!(db.orders().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .orders()
            .create(&[line("550e8400-e29b-41d4-a716-446655440000", 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_cancel_restores_exact_quantities() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Mouse", 10).await;
        let cable = seed_product(&db, "Cable", 6).await;

        let (order, _) = db
            .orders()
            .create(&[line(&mouse.id, 4), line(&cable.id, 6)])
            .await
            .unwrap();

        let (cancelled, levels) = db
            .orders()
            .update_status(&order.id, OrderStatus::Cancelled)
            .await
            .unwrap();

        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(levels.len(), 2);
        assert_eq!(stock_of(&db, &mouse.id).await, 10);
        assert_eq!(stock_of(&db, &cable.id).await, 6);

        let err = db
            .orders()
            .update_status(&order.id, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidStatusTransition { .. })
        ));

    }

    #[tokio::test]
    async fn test_completed_cannot_go_back_to_pending() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Mouse", 10).await;
        let (order, _) = db.orders().create(&[line(&mouse.id, 1)]).await.unwrap();

        let (done, levels) = db
            .orders()
            .update_status(&order.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(done.status, OrderStatus::Completed);
        assert!(levels.is_empty());

        let err = db
            .orders()
            .update_status(&order.id, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidStatusTransition { .. })
        ));

        let still = db.orders().get(&order.id).await.unwrap().unwrap();
        assert_eq!(still.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_delete_restores_unless_completed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Mouse", 10).await;

        let (pending, _) = db.orders().create(&[line(&mouse.id, 3)]).await.unwrap();
        let (completed, _) = db.orders().create(&[line(&mouse.id, 2)]).await.unwrap();
        db.orders()
            .update_status(&completed.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &mouse.id).await, 5);

        let levels = db.orders().delete(&pending.id).await.unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(stock_of(&db, &mouse.id).await, 8);

        let levels = db.orders().delete(&completed.id).await.unwrap();
        assert!(levels.is_empty());
        assert_eq!(stock_of(&db, &mouse.id).await, 8);

        assert!(matches!(
            db.orders().delete(&completed.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_cancelled_restores_again() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Mouse", 10).await;

        let (order, _) = db.orders().create(&[line(&mouse.id, 4)]).await.unwrap();
        assert_eq!(stock_of(&db, &mouse.id).await, 6);

        db.orders()
            .update_status(&order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &mouse.id).await, 10);

        let levels = db.orders().delete(&order.id).await.unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].quantity, 14);
        assert_eq!(stock_of(&db, &mouse.id).await, 14);
        assert!(db.orders().get(&order.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_amount_overflow_rolls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let bulk = seed_product(&db, "Bulk", 100_000_000_000_000_000).await;
        let mouse = seed_product(&db, "Mouse", 10).await;

        let err = db
            .orders()
            .create(&[line(&mouse.id, 2), line(&bulk.id, 100_000_000_000_000_000)])
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Domain(CoreError::AmountOverflow)));
        assert_eq!(stock_of(&db, &bulk.id).await, 100_000_000_000_000_000);
        assert_eq!(stock_of(&db, &mouse.id).await, 10);
        assert!(db.orders().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_period_bounds() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Mouse", 10).await;
        let (order, _) = db.orders().create(&[line(&mouse.id, 1)]).await.unwrap();

        let now = Utc::now();
        let found = db
            .orders()
            .in_period(now - Duration::hours(1), now + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, order.id);
        assert_eq!(found[0].items.len(), 1);

        let none = db
            .orders()
            .in_period(now - Duration::days(3), now - Duration::days(2))
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
