//! # Stock Monitor
//!
//! Background task that sweeps for low-stock products on a fixed interval.
//!
//! ```text
//! ┌──────────────┐  tick (first after one interval)  ┌────────────────────┐
//! │ StockMonitor │──────────────────────────────────►│ products < 5       │
//! │    run()     │                                   │ warn! + alert each │
//! └──────┬───────┘                                   └────────────────────┘
//!        │ shutdown_rx
//!        ▼
//!     stopped
//! ```

use std::time::Duration;

use stockroom_core::LOW_STOCK_THRESHOLD;
use stockroom_db::Database;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::error::ApiResult;
use crate::services::notification::NotificationService;

/// Periodic low-stock sweep.
pub struct StockMonitor {
    db: Database,
    notifier: NotificationService,
    interval: Duration,
    shutdown_rx: mpsc::Receiver<()>,
}

/// Stops a running [`StockMonitor`].
#[derive(Debug, Clone)]
pub struct StockMonitorHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl StockMonitorHandle {
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

impl StockMonitor {
    pub fn new(
        db: Database,
        notifier: NotificationService,
        interval: Duration,
    ) -> (Self, StockMonitorHandle) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let monitor = StockMonitor {
            db,
            notifier,
            interval,
            shutdown_rx,
        };
        (monitor, StockMonitorHandle { shutdown_tx })
    }

    /// Runs until the handle asks it to stop or is dropped.
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) {
        info!(interval_secs = self.interval.as_secs(), "Stock monitor starting");

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep().await {
                        error!(error = %e.message, "Low-stock sweep failed");
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    info!("Stock monitor shutting down");
                    break;
                }
            }
        }

        info!("Stock monitor stopped");
    }

    /// One sweep: alerts for every product under the threshold.
    /// Returns how many products were low.
    pub async fn sweep(&self) -> ApiResult<usize> {
        info!("Checking stock levels");

        let low = self.db.products().low_stock(LOW_STOCK_THRESHOLD).await?;
        for product in &low {
            warn!(
                product = %product.name,
                quantity = product.stock_quantity,
                "Product below stock threshold"
            );
            if let Some(alert) = product.stock_level().alert() {
                self.notifier.low_stock(&alert).await;
            }
        }

        info!(count = low.len(), "Stock level check finished");
        Ok(low.len())
    }
}
