//! # Product Service
//!
//! Product CRUD, searches and explicit stock adjustments.
//!
//! Stock is never written by create/update; it only moves through
//! [`ProductService::adjust_stock`] and orders. Every adjustment that leaves
//! a product under the threshold raises one alert.

use stockroom_core::{
    stock, CoreError, NewProduct, ProductDetails, ProductUpdate, StockAdjustment, StockDirection,
};
use stockroom_db::Database;
use tracing::info;

use crate::error::ApiResult;
use crate::services::in_use;
use crate::services::notification::NotificationService;

#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
    notifier: NotificationService,
}

impl ProductService {
    pub fn new(db: Database, notifier: NotificationService) -> Self {
        ProductService { db, notifier }
    }

    pub async fn list(&self) -> ApiResult<Vec<ProductDetails>> {
        Ok(self.db.products().list().await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<ProductDetails> {
        self.db
            .products()
            .get_details(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Product", id).into())
    }

    pub async fn by_category(&self, category_name: &str) -> ApiResult<Vec<ProductDetails>> {
        Ok(self.db.products().by_category_name(category_name).await?)
    }

    pub async fn by_name(&self, fragment: &str) -> ApiResult<Vec<ProductDetails>> {
        Ok(self.db.products().search_by_name(fragment).await?)
    }

    pub async fn low_stock(&self, threshold: i64) -> ApiResult<Vec<ProductDetails>> {
        Ok(self.db.products().low_stock(threshold).await?)
    }

    /// Creates a product. Starting under the threshold raises an alert.
    pub async fn create(&self, input: NewProduct) -> ApiResult<ProductDetails> {
        let input = input.validate()?;
        self.ensure_references(&input.category_id, &input.supplier_id)
            .await?;

        let product = self.db.products().insert(&input).await?;
        let details = self.get(&product.id).await?;

        info!(id = %details.id, name = %details.name, stock = details.stock_quantity, "Product created");

        if stock::is_low(details.stock_quantity) {
            self.notifier.dispatch(&[details.stock_level()]).await;
        }
        Ok(details)
    }

    /// Updates name, description, price, category and supplier.
    pub async fn update(&self, id: &str, input: ProductUpdate) -> ApiResult<ProductDetails> {
        let input = input.validate()?;
        self.get(id).await?;
        self.ensure_references(&input.category_id, &input.supplier_id)
            .await?;

        self.db.products().update(id, &input).await?;

        info!(id = %id, "Product updated");
        self.get(id).await
    }

    /// Deletes a product that no order item references.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.db
            .products()
            .delete(id)
            .await
            .map_err(|e| in_use(e, "Product", id))?;

        info!(id = %id, "Product deleted");
        Ok(())
    }

    /// Moves stock up or down by `adjustment.quantity` units.
    pub async fn adjust_stock(
        &self,
        id: &str,
        direction: StockDirection,
        adjustment: StockAdjustment,
    ) -> ApiResult<ProductDetails> {
        let adjustment = adjustment.validate()?;

        let level = self
            .db
            .products()
            .adjust_stock(id, direction, adjustment.quantity)
            .await?;

        info!(
            id = %id,
            direction = ?direction,
            quantity = adjustment.quantity,
            stock = level.quantity,
            "Stock adjusted"
        );

        self.notifier.dispatch(&[level]).await;
        self.get(id).await
    }

    async fn ensure_references(&self, category_id: &str, supplier_id: &str) -> ApiResult<()> {
        if self.db.categories().get_by_id(category_id).await?.is_none() {
            return Err(CoreError::not_found("Category", category_id).into());
        }
        if self.db.suppliers().get_by_id(supplier_id).await?.is_none() {
            return Err(CoreError::not_found("Supplier", supplier_id).into());
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::notification::testing::recording;
    use stockroom_core::{CategoryInput, SupplierInput};
    use stockroom_db::DbConfig;

    /// Creates the category and supplier a product needs; returns their ids.
    pub(crate) async fn seed_refs(db: &Database) -> (String, String) {
        let category = db
            .categories()
            .insert(&CategoryInput {
                name: "Peripherals".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let supplier = db
            .suppliers()
            .insert(&SupplierInput {
                name: "Acme".to_string(),
                cnpj: "12345678000199".to_string(),
                email: "sales@acme.com".to_string(),
                phone: None,
                address: None,
            })
            .await
            .unwrap();
        (category.id, supplier.id)
    }

    pub(crate) fn new_product(name: &str, stock: i64, refs: &(String, String)) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            price_cents: 2500,
            stock_quantity: stock,
            category_id: refs.0.clone(),
            supplier_id: refs.1.clone(),
        }
    }

    #[tokio::test]
    async fn test_create_with_low_stock_alerts_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let refs = seed_refs(&db).await;
        let (notifier, recorder) = recording();
        let service = ProductService::new(db, notifier);

        service.create(new_product("Mouse", 10, &refs)).await.unwrap();
        assert_eq!(recorder.count().await, 0);

        let cable = service.create(new_product("Cable", 2, &refs)).await.unwrap();
        assert_eq!(cable.category.name, "Peripherals");
        assert_eq!(recorder.products().await, vec!["Cable"]);
    }

    #[tokio::test]
    async fn test_create_with_missing_category_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let refs = seed_refs(&db).await;
        let service = ProductService::new(db, NotificationService::log_only());

        let missing = ("550e8400-e29b-41d4-a716-446655440000".to_string(), refs.1.clone());
        let err = service
            .create(new_product("Mouse", 10, &missing))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.starts_with("Category not found"));
    }

    #[tokio::test]
    async fn test_each_adjustment_under_threshold_alerts_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let refs = seed_refs(&db).await;
        let (notifier, recorder) = recording();
        let service = ProductService::new(db, notifier);
        let mouse = service.create(new_product("Mouse", 8, &refs)).await.unwrap();

        let after = service
            .adjust_stock(&mouse.id, StockDirection::Decrease, StockAdjustment { quantity: 2 })
            .await
            .unwrap();
        assert_eq!(after.stock_quantity, 6);
        assert_eq!(recorder.count().await, 0);

        service
            .adjust_stock(&mouse.id, StockDirection::Decrease, StockAdjustment { quantity: 3 })
            .await
            .unwrap();
        service
            .adjust_stock(&mouse.id, StockDirection::Decrease, StockAdjustment { quantity: 1 })
            .await
            .unwrap();
        assert_eq!(recorder.count().await, 2);

        let err = service
            .adjust_stock(&mouse.id, StockDirection::Decrease, StockAdjustment { quantity: 3 })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessRule);
        assert_eq!(service.get(&mouse.id).await.unwrap().stock_quantity, 2);
        assert_eq!(recorder.count().await, 2);
    }

    #[tokio::test]
    async fn test_zero_quantity_adjustment_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let refs = seed_refs(&db).await;
        let service = ProductService::new(db, NotificationService::log_only());
        let mouse = service.create(new_product("Mouse", 8, &refs)).await.unwrap();

        let err = service
            .adjust_stock(&mouse.id, StockDirection::Increase, StockAdjustment { quantity: 0 })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
