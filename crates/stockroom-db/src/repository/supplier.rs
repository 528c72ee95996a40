//! # Supplier Repository
//!
//! Database operations for suppliers. CNPJ and e-mail are each unique.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use stockroom_core::{Supplier, SupplierInput};

const SUPPLIER_COLUMNS: &str =
    "id, name, cnpj, email, phone, address, created_at, updated_at";

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists all suppliers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY name");
        let suppliers = sqlx::query_as::<_, Supplier>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(suppliers)
    }

    /// Gets a supplier by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = ?1");
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(supplier)
    }

    /// Whether a supplier other than `exclude_id` holds this CNPJ.
    pub async fn cnpj_taken(&self, cnpj: &str, exclude_id: Option<&str>) -> DbResult<bool> {
        let taken: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE cnpj = ?1 AND id IS NOT ?2)",
        )
        .bind(cnpj)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken != 0)
    }

    /// Whether a supplier other than `exclude_id` holds this e-mail.
    pub async fn email_taken(&self, email: &str, exclude_id: Option<&str>) -> DbResult<bool> {
        let taken: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE email = ?1 AND id IS NOT ?2)",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken != 0)
    }

    /// Inserts a new supplier from validated input.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - `suppliers.cnpj` or `suppliers.email` taken
    pub async fn insert(&self, input: &SupplierInput) -> DbResult<Supplier> {
        let now = Utc::now();
        let supplier = Supplier {
            id: generate_id(),
            name: input.name.clone(),
            cnpj: input.cnpj.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            address: input.address.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %supplier.id, cnpj = %supplier.cnpj, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (
                id, name, cnpj, email, phone, address, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.cnpj)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Replaces every editable field.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Supplier doesn't exist
    pub async fn update(&self, id: &str, input: &SupplierInput) -> DbResult<Supplier> {
        debug!(id = %id, "Updating supplier");

        let result = sqlx::query(
            r#"
            UPDATE suppliers SET
                name = ?2,
                cnpj = ?3,
                email = ?4,
                phone = ?5,
                address = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.cnpj)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))
    }

    /// Deletes a supplier.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Supplier doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - products still reference it
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
    }
}
