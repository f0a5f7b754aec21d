use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryDataDto;
use crate::features::categories::extensions::{CategoryExtensions, ExtensionPoint};
use crate::features::categories::models::CategoryWithDescription;
use crate::features::categories::services::{CategoryStore, CategoryTransaction};
use crate::shared::hooks::HookContext;

/// Service for category operations
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
    extensions: CategoryExtensions,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>, extensions: CategoryExtensions) -> Self {
        Self { store, extensions }
    }

    /// Get a category and its description by UUID
    pub async fn get_by_uuid(&self, uuid: Uuid) -> Result<CategoryWithDescription> {
        let mut tx = self.store.begin().await?;

        let category = tx
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", uuid)))?;
        let description = tx.find_description(category.category_id).await?;

        tx.commit().await?;

        Ok(CategoryWithDescription {
            category,
            description,
        })
    }

    /// Update a category and its description inside one transaction.
    ///
    /// `context` is handed to every transform and hook; when given it must be
    /// a JSON object. Any failure rolls the transaction back and is returned
    /// unchanged.
    pub async fn update(
        &self,
        uuid: Uuid,
        data: Value,
        context: Option<Value>,
    ) -> Result<CategoryWithDescription> {
        let mut tx = self.store.begin().await?;

        match self.update_in_transaction(tx.as_mut(), uuid, data, context).await {
            Ok(updated) => {
                tx.commit().await?;
                Ok(updated)
            }
            Err(e) => {
                tracing::warn!("Category update for {} rolled back: {}", uuid, e);
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(
                        "Failed to roll back category update for {}: {:?}",
                        uuid,
                        rollback_err
                    );
                }
                Err(e)
            }
        }
    }

    async fn update_in_transaction(
        &self,
        tx: &mut dyn CategoryTransaction,
        uuid: Uuid,
        data: Value,
        context: Option<Value>,
    ) -> Result<CategoryWithDescription> {
        let ctx = HookContext::from_value(context)?;

        self.extensions
            .run_before(ExtensionPoint::UpdateCategory, tx, &ctx, uuid, &data)
            .await?;

        let data = self.extensions.data_before_update().apply(data, &ctx)?;
        let dto = self.extensions.data_schema().validate(&data)?;

        self.extensions
            .run_before(ExtensionPoint::UpdateCategoryData, tx, &ctx, uuid, &data)
            .await?;

        let updated = self.update_category_data(tx, uuid, dto).await?;

        self.extensions
            .run_after(ExtensionPoint::UpdateCategoryData, tx, &ctx, &updated)
            .await?;
        self.extensions
            .run_after(ExtensionPoint::UpdateCategory, tx, &ctx, &updated)
            .await?;

        Ok(updated)
    }

    async fn update_category_data(
        &self,
        tx: &mut dyn CategoryTransaction,
        uuid: Uuid,
        dto: CategoryDataDto,
    ) -> Result<CategoryWithDescription> {
        let existing = tx
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(|| AppError::NotFound("Requested category not found".to_string()))?;

        let (category_patch, description_patch) = dto.into_patches();

        let category = tx.update_category(uuid, &category_patch).await?;

        // Nothing to write for the description: keep the row as it is
        let description = if description_patch.is_empty() {
            tracing::debug!("No description fields supplied for category {}", uuid);
            tx.find_description(existing.category_id).await?
        } else {
            tx.update_description(existing.category_id, &description_patch)
                .await?
        };

        Ok(CategoryWithDescription {
            category,
            description,
        })
    }
}
