//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Stockroom                              │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  POST /api/orders                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler → Service                                               │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation? ── CoreError::Validation ────────────┐              │  │
//! │  │  Business?   ── CoreError::InsufficientStock ─────┤              │  │
//! │  │  Database?   ── DbError::QueryFailed("...") ──────┼─► ApiError ─►│  │
//! │  │         │                                          │              │  │
//! │  │         ▼                                          │              │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄── 400 {"timestamp": "...", "status": 400, "code": "BUSINESS_RULE",  │
//! │           "message": "Insufficient stock for product Mouse: ..."}       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! 5xx responses carry a generic message; the detail only goes to the log.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use stockroom_core::CoreError;
use stockroom_db::DbError;

/// Error returned by every handler.
///
/// ## Serialization
/// ```json
/// {
///   "timestamp": "2024-03-02T14:05:00Z",
///   "status": 400,
///   "code": "VALIDATION_ERROR",
///   "message": "Validation failed: name is required",
///   "validationErrors": { "name": "is required" }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message
    pub message: String,

    /// Per-field messages for `VALIDATION_ERROR`
    pub validation_errors: Option<BTreeMap<String, String>>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Business rule violated (400)
    BusinessRule,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::BusinessRule => StatusCode::BAD_REQUEST,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    timestamp: DateTime<Utc>,
    status: u16,
    code: ErrorCode,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation_errors: Option<&'a BTreeMap<String, String>>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            validation_errors: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found with id: {}", resource, id),
        )
    }

    /// Creates a validation error for a single request parameter.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let detail = format!("{} {}", field, message.into());
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), detail.clone());
        ApiError {
            code: ErrorCode::ValidationError,
            message: format!("Validation failed: {}", detail),
            validation_errors: Some(fields),
        }
    }

    /// Creates a business rule error.
    pub fn business(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BusinessRule, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            timestamp: Utc::now(),
            status: status.as_u16(),
            code: self.code,
            message: &self.message,
            validation_errors: self.validation_errors.as_ref(),
        };
        (status, Json(body)).into_response()
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::Validation(errors) => ApiError {
                code: ErrorCode::ValidationError,
                message: format!("Validation failed: {}", errors),
                validation_errors: Some(errors.fields().clone()),
            },
            CoreError::Duplicate { .. }
            | CoreError::InsufficientStock { .. }
            | CoreError::StockLimitExceeded { .. }
            | CoreError::AmountOverflow
            | CoreError::InvalidStatusTransition { .. }
            | CoreError::EmptyReport(_)
            | CoreError::InvalidPeriod { .. }
            | CoreError::InUse { .. } => ApiError::business(err.to_string()),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::Domain(core) => core.into(),
            DbError::UniqueViolation { field } => {
                ApiError::business(format!("A record with this {} already exists", field))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::business("The record is referenced by other records")
            }
            DbError::CheckViolation { message } => {
                tracing::warn!("Check constraint violation: {}", message);
                ApiError::business("The request violates a data constraint")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database is busy")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Result type for handlers and services.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::{OrderStatus, ValidationError, ValidationErrors};

    #[test]
    fn test_status_mapping() {
        let not_found: ApiError = CoreError::not_found("Product", "p-1").into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.message, "Product not found with id: p-1");

        let transition: ApiError = CoreError::InvalidStatusTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::Pending,
        }
        .into();
        assert_eq!(transition.code, ErrorCode::BusinessRule);
        assert_eq!(transition.status(), StatusCode::BAD_REQUEST);

        let db: ApiError = DbError::QueryFailed("syntax error".to_string()).into();
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(db.message, "Database operation failed");
    }

    #[test]
    fn test_validation_errors_carry_fields() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::Required {
            field: "name".to_string(),
        });
        let err: ApiError = CoreError::Validation(errors).into();

        assert_eq!(err.code, ErrorCode::ValidationError);
        let fields = err.validation_errors.unwrap();
        assert!(fields.contains_key("name"));
    }

    #[test]
    fn test_domain_error_inside_db_error() {
        let err: ApiError = DbError::Domain(CoreError::InsufficientStock {
            product: "Mouse".to_string(),
            available: 1,
            requested: 2,
        })
        .into();
        assert_eq!(err.code, ErrorCode::BusinessRule);
        assert!(err.message.contains("available 1, requested 2"));

        let err: ApiError = DbError::Domain(CoreError::AmountOverflow).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Order amount exceeds the supported maximum");

        let err: ApiError = DbError::Domain(CoreError::StockLimitExceeded {
            product: "Mouse".to_string(),
            current: 3,
            adding: i64::MAX,
            max: 1_000_000_000,
        })
        .into();
        assert_eq!(err.code, ErrorCode::BusinessRule);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
