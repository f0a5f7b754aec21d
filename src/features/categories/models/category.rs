use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the `category` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub category_id: i32,
    pub uuid: Uuid,
    pub status: String,
    pub parent_id: Option<i32>,
    pub include_in_nav: bool,
    pub show_products: bool,
    pub position: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for the `category_description` table (one row per category)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CategoryDescription {
    pub category_description_id: i32,
    pub category_description_category_id: i32,
    pub name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_description: Option<String>,
    pub url_key: String,
}

/// A category joined with its description row, as returned by reads and
/// updates. Serializes as one flat object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWithDescription {
    #[serde(flatten)]
    pub category: Category,
    #[serde(flatten)]
    pub description: Option<CategoryDescription>,
}
