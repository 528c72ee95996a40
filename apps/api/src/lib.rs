//! # Stockroom API
//!
//! REST server for categories, suppliers, products and orders, with
//! low-stock alerts and downloadable reports.
//!
//! ## Request Flow
//! ```text
//! HTTP ──► TraceLayer ──► CorsLayer ──► routes::* ──► services::* ──► stockroom-db
//!                                                        │
//!                                                        └──► NotificationService
//! ```
//!
//! ## Modules
//! - [`config`] - Layered configuration (defaults, TOML, environment)
//! - [`error`] - `ApiError` and its JSON rendering
//! - [`extract`] - JSON/query extractors with JSON rejections
//! - [`routes`] - axum routers per resource
//! - [`services`] - Business operations and the stock monitor
//! - [`state`] - Shared handler state

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,stockroom=debug,sqlx=warn";

/// Builds the application router with its middleware.
pub fn build_router(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Installs the global `fmt` subscriber.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

// =============================================================================
// HTTP Tests
// =============================================================================
