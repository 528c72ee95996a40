//! # Low-Stock Notifications
//!
//! Every alert is logged. When a mail relay is configured the alert is also
//! e-mailed to the stock manager.
//!
//! ```text
//! StockLevel (quantity < 5)
//!      │
//!      ▼
//! NotificationService::low_stock
//!      ├── warn!(product, quantity, supplier)
//!      └── transport? ──none──► "e-mail not configured", done
//!              │
//!              ▼
//!        AlertTransport::send ──err──► error!(...), request still succeeds
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::MailConfig;
use stockroom_core::{LowStockAlert, StockLevel};

// =============================================================================
// Transport
// =============================================================================

/// Outbound channel for low-stock alerts.
#[async_trait]
pub trait AlertTransport: Send + Sync {
    async fn send(&self, alert: &LowStockAlert) -> Result<(), TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Mail relay request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail relay rejected the message with status {0}")]
    Rejected(u16),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayMessage<'a> {
    from: &'a str,
    from_name: &'a str,
    to: &'a str,
    subject: String,
    text: String,
}

/// Sends alerts as JSON to an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct MailRelayTransport {
    client: reqwest::Client,
    config: MailConfig,
}

impl MailRelayTransport {
    pub fn new(config: MailConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(MailRelayTransport { client, config })
    }
}

#[async_trait]
impl AlertTransport for MailRelayTransport {
    async fn send(&self, alert: &LowStockAlert) -> Result<(), TransportError> {
        let message = RelayMessage {
            from: &self.config.from,
            from_name: &self.config.from_name,
            to: &self.config.to,
            subject: alert.subject(),
            text: alert.body(),
        };

        let response = self
            .client
            .post(&self.config.relay_url)
            .json(&message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

// =============================================================================
// Service
// =============================================================================

/// Logs low-stock alerts and forwards them to the transport, if any.
#[derive(Clone, Default)]
pub struct NotificationService {
    transport: Option<Arc<dyn AlertTransport>>,
    recipient: Option<String>,
}

impl NotificationService {
    /// Alerts are only logged.
    pub fn log_only() -> Self {
        NotificationService::default()
    }

    pub fn with_transport(transport: Arc<dyn AlertTransport>, recipient: impl Into<String>) -> Self {
        NotificationService {
            transport: Some(transport),
            recipient: Some(recipient.into()),
        }
    }

    /// Builds the service from the optional mail settings.
    pub fn from_mail_config(mail: Option<&MailConfig>) -> Result<Self, TransportError> {
        match mail {
            Some(mail) => {
                info!(relay = %mail.relay_url, to = %mail.to, "Low-stock e-mails enabled");
                let transport = MailRelayTransport::new(mail.clone())?;
                Ok(NotificationService::with_transport(
                    Arc::new(transport),
                    mail.to.clone(),
                ))
            }
            None => {
                info!("E-mail settings missing or placeholder; low-stock alerts will only be logged");
                Ok(NotificationService::log_only())
            }
        }
    }

    /// Raises one alert.
    pub async fn low_stock(&self, alert: &LowStockAlert) {
        warn!(
            product_id = %alert.product_id,
            product = %alert.product_name,
            quantity = alert.current_quantity,
            supplier = %alert.supplier_name,
            "Low stock"
        );

        let Some(transport) = &self.transport else {
            warn!(product = %alert.product_name, "E-mail not configured, low-stock alert not sent");
            return;
        };

        match transport.send(alert).await {
            Ok(()) => info!(
                product = %alert.product_name,
                to = self.recipient.as_deref().unwrap_or_default(),
                "Low-stock alert e-mail sent"
            ),
            Err(e) => error!(
                product = %alert.product_name,
                error = %e,
                "Failed to send low-stock alert e-mail"
            ),
        }
    }

    /// Raises one alert per level under the threshold. Returns how many.
    pub async fn dispatch(&self, levels: &[StockLevel]) -> usize {
        let mut sent = 0;
        for alert in levels.iter().filter_map(StockLevel::alert) {
            self.low_stock(&alert).await;
            sent += 1;
        }
        sent
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("transport", &self.transport.is_some())
            .field("recipient", &self.recipient)
            .finish()
    }
}

// =============================================================================
// Test Double
// =============================================================================


#[cfg(test)]
mod tests {
    use super::testing::{recording, RecordingTransport};
    use super::*;

    fn level(name: &str, quantity: i64) -> StockLevel {
        StockLevel {
            product_id: format!("id-{name}"),
            product_name: name.to_string(),
            supplier_name: "Acme".to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_dispatch_only_levels_under_threshold() {
        let (service, recorder) = recording();

        let sent = service
            .dispatch(&[level("Mouse", 4), level("Cable", 5), level("SSD", 0)])
            .await;

        assert_eq!(sent, 2);
        assert_eq!(recorder.products().await, vec!["Mouse", "SSD"]);
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed() {
        let recorder = Arc::new(RecordingTransport::failing());
        let service = NotificationService::with_transport(recorder.clone(), "x@example.com");

        service.dispatch(&[level("Mouse", 1)]).await;
        assert_eq!(recorder.count().await, 1);
    }

    #[tokio::test]
    async fn test_log_only_sends_nothing() {
        let service = NotificationService::from_mail_config(None).unwrap();
        assert_eq!(service.dispatch(&[level("Mouse", 1)]).await, 1);
    }
}
