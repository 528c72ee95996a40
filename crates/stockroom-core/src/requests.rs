//! # Request Inputs
//!
//! Payloads accepted by create/update operations.
//!
//! Each input has a `validate` method that checks every field, collects all
//! failures into one [`ValidationErrors`] map, and on success returns the
//! input with its strings trimmed (blank optional strings become `None`).
//!
//! Required strings default to empty when missing from the JSON body, so a
//! missing field is reported as "is required" in the field map instead of
//! failing deserialization.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationErrors};
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS};
use crate::validation::{
    validate_cnpj, validate_email, validate_optional_text, validate_phone, validate_price_cents,
    validate_quantity, validate_reference, validate_stock_quantity, validate_text,
};

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Category
// =============================================================================

/// Body of `POST /api/categories` and `PUT /api/categories/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryInput {
    pub fn validate(self) -> CoreResult<Self> {
        let mut errors = ValidationErrors::new();
        errors.check(validate_text("name", &self.name, 2, 100));
        errors.check(validate_optional_text(
            "description",
            self.description.as_deref(),
            255,
        ));
        errors.into_result()?;

        Ok(CategoryInput {
            name: self.name.trim().to_string(),
            description: trim_optional(self.description),
        })
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// Body of `POST /api/suppliers` and `PUT /api/suppliers/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cnpj: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl SupplierInput {
    pub fn validate(self) -> CoreResult<Self> {
        let mut errors = ValidationErrors::new();
        errors.check(validate_text("name", &self.name, 2, 150));
        errors.check(validate_cnpj(&self.cnpj));
        errors.check(validate_email(&self.email));
        errors.check(validate_phone(self.phone.as_deref()));
        errors.check(validate_optional_text("address", self.address.as_deref(), 255));
        errors.into_result()?;

        Ok(SupplierInput {
            name: self.name.trim().to_string(),
            cnpj: self.cnpj.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: trim_optional(self.phone),
            address: trim_optional(self.address),
        })
    }
}

// =============================================================================
// Product
// =============================================================================

/// Body of `POST /api/products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: i64,
    /// Initial stock level.
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub supplier_id: String,
}

impl NewProduct {
    pub fn validate(self) -> CoreResult<Self> {
        let mut errors = ValidationErrors::new();
        check_product_fields(
            &mut errors,
            &self.name,
            self.description.as_deref(),
            self.price_cents,
            &self.category_id,
            &self.supplier_id,
        );
        errors.check(validate_stock_quantity(self.stock_quantity));
        errors.into_result()?;

        Ok(NewProduct {
            name: self.name.trim().to_string(),
            description: trim_optional(self.description),
            price_cents: self.price_cents,
            stock_quantity: self.stock_quantity,
            category_id: self.category_id.trim().to_string(),
            supplier_id: self.supplier_id.trim().to_string(),
        })
    }
}

/// Body of `PUT /api/products/{id}`.
///
/// Stock is not part of an update; it moves only through stock adjustments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub supplier_id: String,
}

impl ProductUpdate {
    pub fn validate(self) -> CoreResult<Self> {
        let mut errors = ValidationErrors::new();
        check_product_fields(
            &mut errors,
            &self.name,
            self.description.as_deref(),
            self.price_cents,
            &self.category_id,
            &self.supplier_id,
        );
        errors.into_result()?;

        Ok(ProductUpdate {
            name: self.name.trim().to_string(),
            description: trim_optional(self.description),
            price_cents: self.price_cents,
            category_id: self.category_id.trim().to_string(),
            supplier_id: self.supplier_id.trim().to_string(),
        })
    }
}

fn check_product_fields(
    errors: &mut ValidationErrors,
    name: &str,
    description: Option<&str>,
    price_cents: i64,
    category_id: &str,
    supplier_id: &str,
) {
    errors.check(validate_text("name", name, 2, 150));
    errors.check(validate_optional_text("description", description, 500));
    errors.check(validate_price_cents(price_cents));
    errors.check(validate_reference("categoryId", category_id));
    errors.check(validate_reference("supplierId", supplier_id));
}

/// Body of `POST /api/products/{id}/stock/increase` and `/decrease`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    #[serde(default)]
    pub quantity: i64,
}

impl StockAdjustment {
    pub fn validate(self) -> CoreResult<Self> {
        let mut errors = ValidationErrors::new();
        errors.check(validate_quantity("quantity", self.quantity));
        errors.into_result()?;
        Ok(self)
    }
}

// =============================================================================
// Order
// =============================================================================

/// One line of a new order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub quantity: i64,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

impl NewOrder {
    /// ## Rules
    /// - At least one item, at most [`MAX_ORDER_ITEMS`]
    /// - Every item names a product and orders 1 to [`MAX_ITEM_QUANTITY`] units
    ///
    /// Item errors are keyed `items[i].field`.
    pub fn validate(self) -> CoreResult<Self> {
        let mut errors = ValidationErrors::new();

        if self.items.is_empty() {
            errors.push(crate::error::ValidationError::Required {
                field: "items".to_string(),
            });
        }

        if self.items.len() > MAX_ORDER_ITEMS {
            errors.push(crate::error::ValidationError::OutOfRange {
                field: "items".to_string(),
                min: 1,
                max: MAX_ORDER_ITEMS as i64,
            });
        }

        for (i, item) in self.items.iter().enumerate() {
            errors.check(validate_reference(
                &format!("items[{i}].productId"),
                &item.product_id,
            ));
            errors.check(validate_quantity(&format!("items[{i}].quantity"), item.quantity));
        }
        errors.into_result()?;

        Ok(NewOrder {
            items: self
                .items
                .into_iter()
                .map(|item| OrderItemInput {
                    product_id: item.product_id.trim().to_string(),
                    quantity: item.quantity,
                })
                .collect(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
