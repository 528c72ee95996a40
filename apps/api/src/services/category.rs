//! Category operations.

use stockroom_core::{Category, CategoryInput, CoreError};
use stockroom_db::{Database, DbError};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::services::in_use;

#[derive(Debug, Clone)]
pub struct CategoryService {
    db: Database,
}

impl CategoryService {
    pub fn new(db: Database) -> Self {
        CategoryService { db }
    }

    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        Ok(self.db.categories().list().await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Category> {
        self.db
            .categories()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Category", id).into())
    }

    /// Creates a category; names are unique.
    pub async fn create(&self, input: CategoryInput) -> ApiResult<Category> {
        let input = input.validate()?;

        if self.db.categories().name_taken(&input.name, None).await? {
            return Err(CoreError::duplicate("Category", "name", &input.name).into());
        }

        let category = self
            .db
            .categories()
            .insert(&input)
            .await
            .map_err(|e| duplicate_name(e, &input.name))?;

        info!(id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Replaces name and description. The category may keep its own name.
    pub async fn update(&self, id: &str, input: CategoryInput) -> ApiResult<Category> {
        let input = input.validate()?;
        self.get(id).await?;

        if self.db.categories().name_taken(&input.name, Some(id)).await? {
            return Err(CoreError::duplicate("Category", "name", &input.name).into());
        }

        let category = self
            .db
            .categories()
            .update(id, &input)
            .await
            .map_err(|e| duplicate_name(e, &input.name))?;

        info!(id = %id, "Category updated");
        Ok(category)
    }

    /// Deletes a category no product uses.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.db
            .categories()
            .delete(id)
            .await
            .map_err(|e| in_use(e, "Category", id))?;

        info!(id = %id, "Category deleted");
        Ok(())
    }
}

/// A concurrent insert can still hit the UNIQUE constraint after the check.
fn duplicate_name(err: DbError, name: &str) -> ApiError {
    if err.is_unique_violation_on("categories.name") {
        CoreError::duplicate("Category", "name", name).into()
    } else {
        err.into()
    }
}
