//! # Services
//!
//! Business operations behind the routes. Each service validates input,
//! runs the repository calls, turns constraint failures into domain errors
//! and raises low-stock alerts after its writes have committed.
//!
//! - [`category`] - Category CRUD with unique names
//! - [`supplier`] - Supplier CRUD with unique CNPJ and e-mail
//! - [`product`] - Product CRUD, searches, stock increase/decrease
//! - [`order`] - Order placement and lifecycle
//! - [`report`] - Sales PDF, top-sellers CSV, stock trends
//! - [`notification`] - Low-stock alert logging and delivery
//! - [`stock_monitor`] - Periodic low-stock sweep

pub mod category;
pub mod notification;
pub mod order;
pub mod product;
pub mod report;
pub mod stock_monitor;
pub mod supplier;

use stockroom_core::CoreError;
use stockroom_db::DbError;

use crate::error::ApiError;

/// Maps a foreign key failure on delete to [`CoreError::InUse`].
pub(crate) fn in_use(err: DbError, entity: &'static str, id: &str) -> ApiError {
    match err {
        DbError::ForeignKeyViolation { .. } => CoreError::InUse {
            entity,
            id: id.to_string(),
        }
        .into(),
        other => other.into(),
    }
}
