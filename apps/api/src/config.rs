//! API server configuration module.
//!
//! Configuration is layered with the `config` crate:
//!
//! ```text
//! built-in defaults
//!      │
//!      ▼
//! stockroom.toml (path from STOCKROOM_CONFIG, optional)
//!      │
//!      ▼
//! STOCKROOM__SECTION__KEY environment variables
//! ```
//!
//! e.g. `STOCKROOM__SERVER__PORT=9000`, `STOCKROOM__MAIL__FROM=alerts@shop.com`.

use std::env;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Config file read when `STOCKROOM_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "./stockroom.toml";

/// Sender value shipped in the sample config; treated as unset.
const PLACEHOLDER_SENDER: &str = "your-email@example.com";

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub monitor: MonitorConfig,
    /// Low-stock e-mail delivery; alerts are only logged without it.
    #[serde(default)]
    pub mail: Option<MailConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file, created on first start.
    pub path: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between two low-stock sweeps (default: 1 hour)
    pub interval_secs: u64,
    pub enabled: bool,
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// HTTP mail relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Endpoint that accepts `{from, fromName, to, subject, text}` as JSON
    pub relay_url: String,
    #[serde(default)]
    pub from: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default = "default_recipient")]
    pub to: String,
    #[serde(default = "default_mail_timeout")]
    pub timeout_secs: u64,
}

fn default_from_name() -> String {
    "Stock System".to_string()
}

fn default_recipient() -> String {
    "stock.manager@example.com".to_string()
}

fn default_mail_timeout() -> u64 {
    10
}

impl MailConfig {
    /// A sender that is empty or still the sample placeholder disables mail.
    pub fn is_configured(&self) -> bool {
        let from = self.from.trim();
        !from.is_empty() && from != PLACEHOLDER_SENDER && !self.relay_url.trim().is_empty()
    }
}

impl AppConfig {
    /// Load configuration from defaults, the optional TOML file and the
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("STOCKROOM_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Like [`AppConfig::load`] with an explicit file path.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.path", "./stockroom.db")?
            .set_default("database.max_connections", 5)?
            .set_default("monitor.interval_secs", 3600)?
            .set_default("monitor.enabled", true)?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("STOCKROOM")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values the types alone can't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue("server.port".to_string()));
        }
        if self.monitor.interval_secs == 0 {
            return Err(ConfigError::InvalidValue("monitor.interval_secs".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "database.max_connections".to_string(),
            ));
        }
        Ok(())
    }

    /// Mail settings if delivery is actually possible.
    pub fn mail_settings(&self) -> Option<&MailConfig> {
        self.mail.as_ref().filter(|m| m.is_configured())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                path: "./stockroom.db".to_string(),
                max_connections: 5,
            },
            monitor: MonitorConfig {
                interval_secs: 3600,
                enabled: true,
            },
            mail: None,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
