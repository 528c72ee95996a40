//! # Validation Module
//!
//! Field validators for request payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (apps/api)                                    │
//! │  └── JSON shape and types (deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Request inputs (requests.rs)                                 │
//! │  └── THIS MODULE: lengths, formats, ranges → field error map           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Services                                                      │
//! │  └── Uniqueness pre-checks, referenced rows exist, stock available     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── UNIQUE constraints                                                │
//! │  ├── CHECK (stock_quantity >= 0)                                       │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes.

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS, MAX_STOCK_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field with length bounds.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_text;
///
/// assert!(validate_text("name", "Tools", 2, 100).is_ok());
/// assert!(validate_text("name", "", 2, 100).is_err());
/// assert!(validate_text("name", "T", 2, 100).is_err());
/// ```
pub fn validate_text(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an optional text field's maximum length.
pub fn validate_optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<()> {
    match value {
        Some(v) if v.trim().chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        _ => Ok(()),
    }
}

/// Validates a CNPJ (Brazilian company tax id): exactly 14 ASCII digits.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_cnpj;
///
/// assert!(validate_cnpj("12345678000199").is_ok());
/// assert!(validate_cnpj("12.345.678/0001-99").is_err());
/// ```
pub fn validate_cnpj(cnpj: &str) -> ValidationResult<()> {
    let cnpj = cnpj.trim();

    if cnpj.is_empty() {
        return Err(ValidationError::Required {
            field: "cnpj".to_string(),
        });
    }

    if cnpj.len() != 14 || !cnpj.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "cnpj".to_string(),
            reason: "must contain exactly 14 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates an e-mail address.
///
/// ## Rules
/// - Required, at most 100 characters
/// - One `@` with a non-empty local part
/// - Domain with at least one dot and no empty labels
/// - No whitespace
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 100,
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid e-mail address".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(invalid());
    }
    if domain.split('.').any(str::is_empty) {
        return Err(invalid());
    }

    Ok(())
}

/// Validates an optional phone number: 10 or 11 digits when present.
pub fn validate_phone(phone: Option<&str>) -> ValidationResult<()> {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(());
    };

    if !(10..=11).contains(&phone.len()) || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain 10 or 11 digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents: positive and at most [`MAX_PRICE_CENTS`].
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1).is_ok());
/// assert!(validate_price_cents(0).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "priceCents".to_string(),
        });
    }

    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "priceCents".to_string(),
            min: 1,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a quantity (order line or stock adjustment): 1 to [`MAX_ITEM_QUANTITY`].
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an initial stock level: zero is allowed.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "stockQuantity".to_string(),
        });
    }

    if qty > MAX_STOCK_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "stockQuantity".to_string(),
            min: 0,
            max: MAX_STOCK_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a reference to another entity: required, UUID formatted.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_reference;
///
/// assert!(validate_reference("categoryId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_reference("categoryId", "").is_err());
/// ```
pub fn validate_reference(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text() {
        assert!(validate_text("name", "Tools", 2, 100).is_ok());
        assert!(validate_text("name", "  Tools  ", 2, 5).is_ok());
        assert!(matches!(
            validate_text("name", "   ", 2, 100),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_text("name", "T", 2, 100),
            Err(ValidationError::TooShort { min: 2, .. })
        ));
        assert!(matches!(
            validate_text("name", &"A".repeat(101), 2, 100),
            Err(ValidationError::TooLong { max: 100, .. })
        ));
        // multibyte characters count once
        assert!(validate_text("name", "Ação", 2, 4).is_ok());
    }

    #[test]
    fn test_validate_optional_text() {
        assert!(validate_optional_text("description", None, 255).is_ok());
        assert!(validate_optional_text("description", Some("short"), 255).is_ok());
        assert!(validate_optional_text("description", Some(&"x".repeat(256)), 255).is_err());
    }

    #[test]
    fn test_validate_cnpj() {
        assert!(validate_cnpj("12345678000199").is_ok());
        assert!(validate_cnpj("").is_err());
        assert!(validate_cnpj("1234567800019").is_err());
        assert!(validate_cnpj("1234567800019a").is_err());
        assert!(validate_cnpj("12.345.678/0001-99").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("sales@acme.com").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("acme.com").is_err());
        assert!(validate_email("@acme.com").is_err());
        assert!(validate_email("sales@acme").is_err());
        assert!(validate_email("sales@acme..com").is_err());
        assert!(validate_email("sa les@acme.com").is_err());
        assert!(validate_email("a@b@acme.com").is_err());
        assert!(validate_email(&format!("{}@acme.com", "a".repeat(95))).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone(None).is_ok());
        assert!(validate_phone(Some("")).is_ok());
        assert!(validate_phone(Some("1133334444")).is_ok());
        assert!(validate_phone(Some("11988887777")).is_ok());
        assert!(validate_phone(Some("113333444")).is_err());
        assert!(validate_phone(Some("(11)3333-4444")).is_err());
    }

    #[test]
    fn test_validate_numbers() {
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(0).is_err());
        assert!(validate_price_cents(-5).is_err());

        assert!(validate_quantity("quantity", 1).is_ok());
        assert!(validate_quantity("quantity", 0).is_err());

        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_number_upper_bounds() {
        assert!(validate_quantity("quantity", MAX_ITEM_QUANTITY).is_ok());
        assert!(matches!(
            validate_quantity("quantity", MAX_ITEM_QUANTITY + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_quantity("quantity", 100_000_000_000_000_000).is_err());
        assert!(validate_quantity("quantity", i64::MAX).is_err());

        assert!(validate_stock_quantity(MAX_STOCK_QUANTITY).is_ok());
        assert!(validate_stock_quantity(MAX_STOCK_QUANTITY + 1).is_err());

        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_price_cents(i64::MAX),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_reference() {
        assert!(validate_reference("supplierId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_reference("supplierId", "").is_err());
        assert!(validate_reference("supplierId", "not-a-uuid").is_err());
    }
}
