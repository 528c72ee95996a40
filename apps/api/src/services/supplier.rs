//! Supplier operations. CNPJ and e-mail are each unique.

use stockroom_core::{CoreError, Supplier, SupplierInput};
use stockroom_db::{Database, DbError};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::services::in_use;

#[derive(Debug, Clone)]
pub struct SupplierService {
    db: Database,
}

impl SupplierService {
    pub fn new(db: Database) -> Self {
        SupplierService { db }
    }

    pub async fn list(&self) -> ApiResult<Vec<Supplier>> {
        Ok(self.db.suppliers().list().await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Supplier> {
        self.db
            .suppliers()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Supplier", id).into())
    }

    pub async fn create(&self, input: SupplierInput) -> ApiResult<Supplier> {
        let input = input.validate()?;
        self.check_unique(&input, None).await?;

        let supplier = self
            .db
            .suppliers()
            .insert(&input)
            .await
            .map_err(|e| duplicate(e, &input))?;

        info!(id = %supplier.id, cnpj = %supplier.cnpj, "Supplier created");
        Ok(supplier)
    }

    pub async fn update(&self, id: &str, input: SupplierInput) -> ApiResult<Supplier> {
        let input = input.validate()?;
        self.get(id).await?;
        self.check_unique(&input, Some(id)).await?;

        let supplier = self
            .db
            .suppliers()
            .update(id, &input)
            .await
            .map_err(|e| duplicate(e, &input))?;

        info!(id = %id, "Supplier updated");
        Ok(supplier)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.db
            .suppliers()
            .delete(id)
            .await
            .map_err(|e| in_use(e, "Supplier", id))?;

        info!(id = %id, "Supplier deleted");
        Ok(())
    }

    async fn check_unique(&self, input: &SupplierInput, exclude_id: Option<&str>) -> ApiResult<()> {
        let repo = self.db.suppliers();
        if repo.cnpj_taken(&input.cnpj, exclude_id).await? {
            return Err(CoreError::duplicate("Supplier", "CNPJ", &input.cnpj).into());
        }
        if repo.email_taken(&input.email, exclude_id).await? {
            return Err(CoreError::duplicate("Supplier", "e-mail", &input.email).into());
        }
        Ok(())
    }
}

fn duplicate(err: DbError, input: &SupplierInput) -> ApiError {
    if err.is_unique_violation_on("suppliers.cnpj") {
        CoreError::duplicate("Supplier", "CNPJ", &input.cnpj).into()
    } else if err.is_unique_violation_on("suppliers.email") {
        CoreError::duplicate("Supplier", "e-mail", &input.email).into()
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use stockroom_db::DbConfig;

    fn input(cnpj: &str, email: &str) -> SupplierInput {
        SupplierInput {
            name: "Acme Distribution".to_string(),
            cnpj: cnpj.to_string(),
            email: email.to_string(),
            phone: Some("1133334444".to_string()),
            address: Some("  ".to_string()),
        }
    }

    async fn service() -> SupplierService {
        SupplierService::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_create_normalizes_input() {
        let service = service().await;
        let acme = service
            .create(input("12345678000199", "sales@acme.com"))
            .await
            .unwrap();

        assert!(acme.address.is_none());
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_cnpj_and_email() {
        let service = service().await;
        let acme = service
            .create(input("12345678000199", "sales@acme.com"))
            .await
            .unwrap();

        let err = service
            .create(input("12345678000199", "other@acme.com"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessRule);
        assert!(err.message.contains("CNPJ"));

        let err = service
            .create(input("99999999000100", "sales@acme.com"))
            .await
            .unwrap_err();
        assert!(err.message.contains("e-mail"));

        // own values are fine on update
        service
            .update(&acme.id, input("12345678000199", "sales@acme.com"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_invalid_cnpj() {
        let service = service().await;
        let err = service
            .create(input("12.345.678/0001-99", "sales@acme.com"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.validation_errors.unwrap().contains_key("cnpj"));
    }
}
