use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CategoryDescriptionPatch, CategoryPatch};
use crate::features::categories::models::{Category, CategoryDescription};

const CATEGORY_COLUMNS: &str = "category_id, uuid, status, parent_id, include_in_nav, \
    show_products, position, created_at, updated_at";

const DESCRIPTION_COLUMNS: &str = "category_description_id, category_description_category_id, \
    name, short_description, description, image, meta_title, meta_keywords, meta_description, \
    url_key";

/// Source of category transactions
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn CategoryTransaction>>;
}

/// Category queries bound to one open transaction.
///
/// Dropping a transaction without calling `commit` discards its writes.
#[async_trait]
pub trait CategoryTransaction: Send {
    async fn find_by_uuid(&mut self, uuid: Uuid) -> Result<Option<Category>>;

    async fn find_description(&mut self, category_id: i32) -> Result<Option<CategoryDescription>>;

    /// Apply `patch` to the category with `uuid` and refresh `updated_at`
    async fn update_category(&mut self, uuid: Uuid, patch: &CategoryPatch) -> Result<Category>;

    /// Apply `patch` to the description row of `category_id`.
    /// Returns `None` when the category has no description row.
    async fn update_description(
        &mut self,
        category_id: i32,
        patch: &CategoryDescriptionPatch,
    ) -> Result<Option<CategoryDescription>>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Postgres-backed category store
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn begin(&self) -> Result<Box<dyn CategoryTransaction>> {
        let tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin category transaction: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Box::new(PgCategoryTransaction { tx }))
    }
}

pub struct PgCategoryTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CategoryTransaction for PgCategoryTransaction {
    async fn find_by_uuid(&mut self, uuid: Uuid) -> Result<Option<Category>> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM category WHERE uuid = $1");

        sqlx::query_as::<_, Category>(&query)
            .bind(uuid)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category by uuid: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_description(&mut self, category_id: i32) -> Result<Option<CategoryDescription>> {
        let query = format!(
            "SELECT {DESCRIPTION_COLUMNS} FROM category_description \
             WHERE category_description_category_id = $1"
        );

        sqlx::query_as::<_, CategoryDescription>(&query)
            .bind(category_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category description: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update_category(&mut self, uuid: Uuid, patch: &CategoryPatch) -> Result<Category> {
        let mut builder = build_category_update(uuid, patch);

        let category = builder
            .build_query_as::<Category>()
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update category: {:?}", e);
                AppError::Database(e)
            })?;

        category.ok_or_else(|| AppError::NotFound("Requested category not found".to_string()))
    }

    async fn update_description(
        &mut self,
        category_id: i32,
        patch: &CategoryDescriptionPatch,
    ) -> Result<Option<CategoryDescription>> {
        let Some(mut builder) = build_description_update(category_id, patch) else {
            return self.find_description(category_id).await;
        };

        builder
            .build_query_as::<CategoryDescription>()
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update category description: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let this = *self;
        this.tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit category transaction: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let this = *self;
        this.tx.rollback().await.map_err(|e| {
            tracing::error!("Failed to roll back category transaction: {:?}", e);
            AppError::Database(e)
        })
    }
}

fn build_category_update(uuid: Uuid, patch: &CategoryPatch) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE category SET updated_at = NOW()");

    if let Some(status) = patch.status {
        builder.push(", status = ").push_bind(status.as_str());
    }
    if let Some(parent_id) = patch.parent_id {
        builder.push(", parent_id = ").push_bind(parent_id);
    }
    if let Some(include_in_nav) = patch.include_in_nav {
        builder.push(", include_in_nav = ").push_bind(include_in_nav);
    }
    if let Some(show_products) = patch.show_products {
        builder.push(", show_products = ").push_bind(show_products);
    }
    if let Some(position) = patch.position {
        builder.push(", position = ").push_bind(position);
    }

    builder.push(" WHERE uuid = ").push_bind(uuid);
    builder.push(format!(" RETURNING {CATEGORY_COLUMNS}"));
    builder
}

/// `None` when the patch carries no columns
fn build_description_update(
    category_id: i32,
    patch: &CategoryDescriptionPatch,
) -> Option<QueryBuilder<'static, Postgres>> {
    if patch.is_empty() {
        return None;
    }

    // `Some(None)` binds NULL; name and url_key are never NULL
    let columns = [
        ("name", patch.name.clone().map(Some)),
        ("short_description", patch.short_description.clone()),
        ("description", patch.description.clone()),
        ("image", patch.image.clone()),
        ("meta_title", patch.meta_title.clone()),
        ("meta_keywords", patch.meta_keywords.clone()),
        ("meta_description", patch.meta_description.clone()),
        ("url_key", patch.url_key.clone().map(Some)),
    ];

    let mut builder = QueryBuilder::new("UPDATE category_description SET ");
    let mut set = builder.separated(", ");
    for (column, value) in columns {
        if let Some(value) = value {
            set.push(format!("{column} = "));
            set.push_bind_unseparated(value);
        }
    }

    builder.push(" WHERE category_description_category_id = ");
    builder.push_bind(category_id);
    builder.push(format!(" RETURNING {DESCRIPTION_COLUMNS}"));
    Some(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::dtos::CategoryStatus;

    #[test]
    fn test_category_update_sql_only_touches_supplied_columns() {
        let patch = CategoryPatch {
            status: Some(CategoryStatus::Disabled),
            position: Some(Some(4)),
            ..Default::default()
        };

        let builder = build_category_update(Uuid::new_v4(), &patch);
        let sql = builder.sql();

        assert!(sql.starts_with("UPDATE category SET updated_at = NOW(), status = $1, position = $2"));
        assert!(sql.contains("WHERE uuid = $3"));
        assert!(!sql.contains("include_in_nav ="));
        assert!(!sql.contains("parent_id ="));
    }

    #[test]
    fn test_category_update_can_clear_parent() {
        let patch = CategoryPatch {
            status: Some(CategoryStatus::Enabled),
            parent_id: Some(None),
            ..Default::default()
        };

        let builder = build_category_update(Uuid::new_v4(), &patch);
        assert!(builder.sql().contains("parent_id = $2"));
    }

    #[test]
    fn test_description_update_sql() {
        let patch = CategoryDescriptionPatch {
            name: Some("Shoes".to_string()),
            url_key: Some("shoes".to_string()),
            ..Default::default()
        };

        let builder = build_description_update(7, &patch).unwrap();
        let sql = builder.sql();

        assert!(sql.starts_with("UPDATE category_description SET name = $1, url_key = $2"));
        assert!(sql.contains("WHERE category_description_category_id = $3"));
    }

    #[test]
    fn test_description_update_binds_null_for_cleared_column() {
        let patch = CategoryDescriptionPatch {
            image: Some(None),
            ..Default::default()
        };

        let builder = build_description_update(7, &patch).unwrap();
        assert!(builder
            .sql()
            .starts_with("UPDATE category_description SET image = $1 WHERE"));
    }

    #[test]
    fn test_empty_description_patch_builds_nothing() {
        assert!(build_description_update(7, &CategoryDescriptionPatch::default()).is_none());
    }
}
