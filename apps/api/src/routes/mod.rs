//! # HTTP Routes
//!
//! One router per resource, merged into the application router.
//!
//! | Module | Paths |
//! |--------|-------|
//! | [`health`] | `/health` |
//! | [`categories`] | `/api/categories` |
//! | [`suppliers`] | `/api/suppliers` |
//! | [`products`] | `/api/products`, stock adjustments, CSV, trends |
//! | [`orders`] | `/api/orders`, status changes, sales PDF |

pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod suppliers;

use axum::Router;

use crate::state::AppState;

/// Every route, still waiting for its state.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(suppliers::router())
        .merge(products::router())
        .merge(orders::router())
}
