//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError         - Business rule violations                      │
//! │  ├── ValidationError   - One invalid field                             │
//! │  └── ValidationErrors  - All invalid fields of a request               │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  HTTP errors (in apps/api)                                             │
//! │  └── ApiError          - What clients see (JSON body + status)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations and lookups that came back empty.
///
/// `NotFound` becomes a 404 at the HTTP layer; every other variant is a
/// client error (400).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity with the given id does not exist.
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A unique field is already held by another row.
    #[error("A {entity} with {field} '{value}' already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Not enough units on hand to take `requested` out.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /api/orders { items: [{ productId: "p1", quantity: 5 }] }
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Keyboard", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// 400 "Insufficient stock for product Keyboard: available 3, requested 5"
    /// ```
    #[error("Insufficient stock for product {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Increasing stock would push the level past [`crate::MAX_STOCK_QUANTITY`].
    #[error("Stock for product {product} cannot exceed {max}: current {current}, adding {adding}")]
    StockLimitExceeded {
        product: String,
        current: i64,
        adding: i64,
        max: i64,
    },

    /// A subtotal or total left the representable range of cents.
    #[error("Order amount exceeds the supported maximum")]
    AmountOverflow,

    /// Order status change not permitted by the lifecycle.
    #[error("Cannot change order status from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// A report was requested over data that has no rows.
    #[error("{0}")]
    EmptyReport(String),

    /// Report period with its start after its end.
    #[error("Start date {start} is after end date {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    /// Deleting a row that other rows still reference.
    #[error("{entity} {id} is still referenced and cannot be deleted")]
    InUse { entity: &'static str, id: String },

    /// One or more request fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        CoreError::Duplicate {
            entity,
            field,
            value: value.into(),
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        let mut errors = ValidationErrors::new();
        errors.push(err);
        CoreError::Validation(errors)
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::Validation(errors)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single invalid input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value outside an inclusive range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., CNPJ with letters, malformed e-mail).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Validation Errors (field map)
// =============================================================================

/// Every invalid field of one request, keyed by field name.
///
/// Only the first error per field is kept, so clients get one message per
/// input box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error unless the field already has one.
    pub fn push(&mut self, err: ValidationError) {
        self.fields
            .entry(err.field().to_string())
            .or_insert_with(|| err.to_string());
    }

    /// Runs a validator and records its error, if any.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(err) = result {
            self.push(err);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> CoreResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .fields
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
