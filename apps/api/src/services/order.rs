//! # Order Service
//!
//! ```text
//! create ──► validate ──► repo tx (decrement + snapshot) ──► commit ──► alerts
//! status ──► transition check ──► restore on CANCELLED ──► commit
//! delete ──► restore unless COMPLETED ──► commit
//! ```
//!
//! Alerts go out only after the transaction has committed, so a rolled back
//! order never notifies.

use stockroom_core::{CoreError, NewOrder, Order, OrderStatus};
use stockroom_db::Database;
use tracing::info;

use crate::error::ApiResult;
use crate::services::notification::NotificationService;

#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
    notifier: NotificationService,
}

impl OrderService {
    pub fn new(db: Database, notifier: NotificationService) -> Self {
        OrderService { db, notifier }
    }

    /// All orders, newest first.
    pub async fn list(&self) -> ApiResult<Vec<Order>> {
        Ok(self.db.orders().list().await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Order> {
        self.db
            .orders()
            .get(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", id).into())
    }

    /// Places a PENDING order, taking every item out of stock.
    pub async fn create(&self, input: NewOrder) -> ApiResult<Order> {
        let input = input.validate()?;

        let (order, levels) = self.db.orders().create(&input.items).await?;
        let alerts = self.notifier.dispatch(&levels).await;

        info!(id = %order.id, total = %order.total(), alerts, "Order placed");
        Ok(order)
    }

    pub async fn update_status(&self, id: &str, status: OrderStatus) -> ApiResult<Order> {
        let (order, levels) = self.db.orders().update_status(id, status).await?;
        self.notifier.dispatch(&levels).await;
        Ok(order)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let levels = self.db.orders().delete(id).await?;
        self.notifier.dispatch(&levels).await;
        Ok(())
    }
}
