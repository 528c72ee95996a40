//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Stock Adjustment
//! ```text
//! adjust_stock_in(conn, id, delta)
//!      │
//!      ▼
//! UPDATE products SET stock_quantity = stock_quantity + delta
//!  WHERE id = ? AND stock_quantity + delta >= 0
//!               AND (delta <= 0 OR delta <= MAX_STOCK_QUANTITY - stock_quantity)
//!      │
//!      ├── 1 row  → read back new level (+ supplier name) → StockLevel
//!      │
//!      └── 0 rows → product missing?  → NotFound
//!                   increase          → StockLimitExceeded (nothing written)
//!                   decrease          → InsufficientStock (nothing written)
//! ```
//!
//! The check and the write are one statement, so two concurrent decrements
//! can never push a row below zero.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use stockroom_core::{
    Category, CoreError, NewProduct, Product, ProductDetails, ProductUpdate, StockDirection,
    StockLevel, Supplier, MAX_STOCK_QUANTITY,
};

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, stock_quantity, \
     category_id, supplier_id, created_at, updated_at";

/// Product joined with its category and supplier, columns prefixed per table.
const PRODUCT_DETAILS_SELECT: &str = r#"
    SELECT
        p.id, p.name, p.description, p.price_cents, p.stock_quantity,
        p.updated_at AS last_updated,
        c.id AS category_id, c.name AS category_name,
        c.description AS category_description,
        c.created_at AS category_created_at, c.updated_at AS category_updated_at,
        s.id AS supplier_id, s.name AS supplier_name, s.cnpj AS supplier_cnpj,
        s.email AS supplier_email, s.phone AS supplier_phone,
        s.address AS supplier_address,
        s.created_at AS supplier_created_at, s.updated_at AS supplier_updated_at
    FROM products p
    JOIN categories c ON c.id = p.category_id
    JOIN suppliers s ON s.id = p.supplier_id
"#;

#[derive(sqlx::FromRow)]
struct ProductDetailsRow {
    id: String,
    name: String,
    description: Option<String>,
    price_cents: i64,
    stock_quantity: i64,
    last_updated: DateTime<Utc>,
    category_id: String,
    category_name: String,
    category_description: Option<String>,
    category_created_at: DateTime<Utc>,
    category_updated_at: DateTime<Utc>,
    supplier_id: String,
    supplier_name: String,
    supplier_cnpj: String,
    supplier_email: String,
    supplier_phone: Option<String>,
    supplier_address: Option<String>,
    supplier_created_at: DateTime<Utc>,
    supplier_updated_at: DateTime<Utc>,
}

impl From<ProductDetailsRow> for ProductDetails {
    fn from(row: ProductDetailsRow) -> Self {
        ProductDetails {
            id: row.id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            stock_quantity: row.stock_quantity,
            last_updated: row.last_updated,
            category: Category {
                id: row.category_id,
                name: row.category_name,
                description: row.category_description,
                created_at: row.category_created_at,
                updated_at: row.category_updated_at,
            },
            supplier: Supplier {
                id: row.supplier_id,
                name: row.supplier_name,
                cnpj: row.supplier_cnpj,
                email: row.supplier_email,
                phone: row.supplier_phone,
                address: row.supplier_address,
                created_at: row.supplier_created_at,
                updated_at: row.supplier_updated_at,
            },
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    async fn fetch_details(
        &self,
        filter: &str,
        bind: Option<&str>,
    ) -> DbResult<Vec<ProductDetails>> {
        let sql = format!("{PRODUCT_DETAILS_SELECT} {filter}");
        let mut query = sqlx::query_as::<_, ProductDetailsRow>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(ProductDetails::from).collect())
    }

    /// Lists all products with category and supplier, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<ProductDetails>> {
        self.fetch_details("ORDER BY p.name", None).await
    }

    /// Lists products as stored, without joins.
    pub async fn list_plain(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product with its category and supplier.
    pub async fn get_details(&self, id: &str) -> DbResult<Option<ProductDetails>> {
        let mut found = self.fetch_details("WHERE p.id = ?1", Some(id)).await?;
        Ok(found.pop())
    }

    /// Gets a product row by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Products whose category is named exactly `category_name`.
    pub async fn by_category_name(&self, category_name: &str) -> DbResult<Vec<ProductDetails>> {
        self.fetch_details("WHERE c.name = ?1 ORDER BY p.name", Some(category_name))
            .await
    }

    /// Case-insensitive substring search on product name.
    pub async fn search_by_name(&self, fragment: &str) -> DbResult<Vec<ProductDetails>> {
        self.fetch_details(
            "WHERE lower(p.name) LIKE '%' || lower(?1) || '%' ORDER BY p.name",
            Some(fragment),
        )
        .await
    }

    /// Products with fewer than `threshold` units, lowest stock first.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<ProductDetails>> {
        let sql = format!(
            "{PRODUCT_DETAILS_SELECT} WHERE p.stock_quantity < ?1 \
             ORDER BY p.stock_quantity, p.name"
        );
        let rows = sqlx::query_as::<_, ProductDetailsRow>(&sql)
            .bind(threshold)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ProductDetails::from).collect())
    }

    /// Inserts a new product from validated input.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - category or supplier missing
    pub async fn insert(&self, input: &NewProduct) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: generate_id(),
            name: input.name.clone(),
            description: input.description.clone(),
            price_cents: input.price_cents,
            stock_quantity: input.stock_quantity,
            category_id: input.category_id.clone(),
            supplier_id: input.supplier_id.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, stock_quantity,
                category_id, supplier_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(&product.category_id)
        .bind(&product.supplier_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates descriptive fields, price and references. Stock is untouched.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: &str, input: &ProductUpdate) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                category_id = ?5,
                supplier_id = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price_cents)
        .bind(&input.category_id)
        .bind(&input.supplier_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - order items still reference it
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Increases or decreases stock by `quantity` units.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(DbError::Domain(CoreError::InsufficientStock))` - decrease
    ///   larger than the stock on hand; nothing is written
    /// * `Err(DbError::Domain(CoreError::StockLimitExceeded))` - increase
    ///   past [`MAX_STOCK_QUANTITY`]; nothing is written
    pub async fn adjust_stock(
        &self,
        id: &str,
        direction: StockDirection,
        quantity: i64,
    ) -> DbResult<StockLevel> {
        let mut tx = self.pool.begin().await?;
        let level = adjust_stock_in(&mut *tx, id, direction.delta(quantity)).await?;
        tx.commit().await?;

        Ok(level)
    }

    /// Number of products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Stock Adjustment (shared with orders)
// =============================================================================

/// Applies `delta` to a product's stock on an open connection or transaction.
///
/// Used by [`ProductRepository::adjust_stock`] and by every order operation,
/// which run it inside their own transaction.
pub(crate) async fn adjust_stock_in(
    conn: &mut SqliteConnection,
    id: &str,
    delta: i64,
) -> DbResult<StockLevel> {
    let result = sqlx::query(
        r#"
        UPDATE products SET
            stock_quantity = stock_quantity + ?1,
            updated_at = ?2
        WHERE id = ?3
          AND stock_quantity + ?1 >= 0
          AND (?1 <= 0 OR ?1 <= ?4 - stock_quantity)
        "#,
    )
    .bind(delta)
    .bind(Utc::now())
    .bind(id)
    .bind(MAX_STOCK_QUANTITY)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        let current: Option<(String, i64)> =
            sqlx::query_as("SELECT name, stock_quantity FROM products WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        return Err(match current {
            None => DbError::not_found("Product", id),
            Some((name, current)) if delta > 0 => CoreError::StockLimitExceeded {
                product: name,
                current,
                adding: delta,
                max: MAX_STOCK_QUANTITY,
            }
            .into(),
            Some((name, available)) => CoreError::InsufficientStock {
                product: name,
                available,
                requested: delta.saturating_neg(),
            }
            .into(),
        });
    }

    let (product_name, supplier_name, quantity): (String, String, i64) = sqlx::query_as(
        r#"
        SELECT p.name, s.name, p.stock_quantity
        FROM products p
        JOIN suppliers s ON s.id = p.supplier_id
        WHERE p.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    debug!(id = %id, delta, quantity, "Stock adjusted");

    Ok(StockLevel {
        product_id: id.to_string(),
        product_name,
        supplier_name,
        quantity,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use crate::{Database, DbConfig, DbError};
    use stockroom_core::{
        CategoryInput, CoreError, NewProduct, Product, ProductUpdate, StockDirection,
        SupplierInput, MAX_STOCK_QUANTITY,
    };

    /// Category "Peripherals", supplier "Acme" and one product with `stock`.
    pub(crate) async fn seed_product(db: &Database, name: &str, stock: i64) -> Product {
        let category = match db.categories().list().await.unwrap().into_iter().next() {
            Some(c) => c,
            None => db
                .categories()
                .insert(&CategoryInput {
                    name: "Peripherals".to_string(),
                    description: None,
                })
                .await
                .unwrap(),
        };
        let supplier = match db.suppliers().list().await.unwrap().into_iter().next() {
            Some(s) => s,
            None => db
                .suppliers()
                .insert(&SupplierInput {
                    name: "Acme".to_string(),
                    cnpj: "12345678000199".to_string(),
                    email: "sales@acme.com".to_string(),
                    phone: None,
                    address: None,
                })
                .await
                .unwrap(),
        };

        db.products()
            .insert(&NewProduct {
                name: name.to_string(),
                description: None,
                price_cents: 1000,
                stock_quantity: stock,
                category_id: category.id,
                supplier_id: supplier.id,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_details_embed_category_and_supplier() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Wireless Mouse", 10).await;

        let details = db.products().get_details(&mouse.id).await.unwrap().unwrap();
        assert_eq!(details.category.name, "Peripherals");
        assert_eq!(details.supplier.cnpj, "12345678000199");
        assert_eq!(details.stock_quantity, 10);

        assert!(db.products().get_details("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_searches() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_product(&db, "Wireless Mouse", 10).await;
        seed_product(&db, "Mechanical Keyboard", 2).await;
        seed_product(&db, "USB Cable", 4).await;

        let repo = db.products();
        let by_name = repo.search_by_name("mOuSe").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Wireless Mouse");

        let by_category = repo.by_category_name("Peripherals").await.unwrap();
        assert_eq!(by_category.len(), 3);
        assert!(repo.by_category_name("Garden").await.unwrap().is_empty());

        let low = repo.low_stock(5).await.unwrap();
        let names: Vec<_> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Mechanical Keyboard", "USB Cable"]);
    }

    #[tokio::test]
    async fn test_decrease_rejected_leaves_stock_unchanged() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Wireless Mouse", 3).await;
        let repo = db.products();

        let err = repo
            .adjust_stock(&mouse.id, StockDirection::Decrease, 4)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock {
                available: 3,
                requested: 4,
                ..
            })
        ));

        let after = repo.get_by_id(&mouse.id).await.unwrap().unwrap();
        assert_eq!(after.stock_quantity, 3);
    }

    #[tokio::test]
    async fn test_increase_and_decrease() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Wireless Mouse", 3).await;
        let repo = db.products();

        let level = repo
            .adjust_stock(&mouse.id, StockDirection::Increase, 7)
            .await
            .unwrap();
        assert_eq!(level.quantity, 10);
        assert_eq!(level.supplier_name, "Acme");

        let level = repo
            .adjust_stock(&mouse.id, StockDirection::Decrease, 10)
            .await
            .unwrap();
        assert_eq!(level.quantity, 0);
        assert!(level.alert().is_some());

        let missing = repo
            .adjust_stock("missing", StockDirection::Increase, 1)
            .await
            .unwrap_err();
        assert!(matches!(missing, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_increase_past_stock_limit_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        let mouse = seed_product(&db, "Wireless Mouse", 3).await;

        let err = repo
            .adjust_stock(&mouse.id, StockDirection::Increase, i64::MAX)
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                DbError::Domain(CoreError::StockLimitExceeded { current: 3, .. })
            ),
            "{err:?}"
        );

        let err = repo
            .adjust_stock(&mouse.id, StockDirection::Increase, MAX_STOCK_QUANTITY - 2)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::StockLimitExceeded { .. })));

        let stored = repo.get_by_id(&mouse.id).await.unwrap().unwrap();
        assert_eq!(stored.stock_quantity, 3);

        let level = repo
            .adjust_stock(&mouse.id, StockDirection::Increase, MAX_STOCK_QUANTITY - 3)
            .await
            .unwrap();
        assert_eq!(level.quantity, MAX_STOCK_QUANTITY);

        let err = repo
            .adjust_stock(&mouse.id, StockDirection::Decrease, i64::MAX)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InsufficientStock { .. })));
    }

    #[tokio::test]
    async fn test_update_never_touches_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Wireless Mouse", 8).await;

        let updated = db
            .products()
            .update(
                &mouse.id,
                &ProductUpdate {
                    name: "Silent Mouse".to_string(),
                    description: Some("Quiet clicks".to_string()),
                    price_cents: 1500,
                    category_id: mouse.category_id.clone(),
                    supplier_id: mouse.supplier_id.clone(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Silent Mouse");
        assert_eq!(updated.price_cents, 1500);
        assert_eq!(updated.stock_quantity, 8);
    }

    #[tokio::test]
    async fn test_delete_category_in_use_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mouse = seed_product(&db, "Wireless Mouse", 8).await;

        let err = db.categories().delete(&mouse.category_id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "{err:?}");

        db.products().delete(&mouse.id).await.unwrap();
        assert_eq!(db.products().count().await.unwrap(), 0);
        db.categories().delete(&mouse.category_id).await.unwrap();
    }
}
