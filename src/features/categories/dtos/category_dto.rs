use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::CategoryWithDescription;
use crate::shared::validation::URL_KEY_REGEX;

/// Publication status of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    Enabled,
    Disabled,
}

impl CategoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryStatus::Enabled => "enabled",
            CategoryStatus::Disabled => "disabled",
        }
    }
}

/// Category payload accepted by the update flow.
///
/// Every field is optional at the type level; which ones must be present is
/// decided by the `CategoryDataSchema` in use. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CategoryDataDto {
    pub status: Option<CategoryStatus>,

    /// Parent category id; `null` detaches the category from its parent
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i32>)]
    pub parent_id: Option<Option<i32>>,

    pub include_in_nav: Option<bool>,

    pub show_products: Option<bool>,

    /// `null` clears the position
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i32>)]
    #[validate(range(min = 0, message = "position must be greater than or equal to 0"))]
    pub position: Option<Option<i32>>,

    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub short_description: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 255, message = "meta_title must not exceed 255 characters"))]
    pub meta_title: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub meta_keywords: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub meta_description: Option<Option<String>>,

    #[validate(
        length(min = 1, max = 255, message = "url_key must be 1-255 characters"),
        regex(
            path = *URL_KEY_REGEX,
            message = "url_key must be lowercase alphanumeric words separated by single hyphens"
        )
    )]
    pub url_key: Option<String>,
}

impl CategoryDataDto {
    /// Field names in declaration order; validation reports the first
    /// failing field in this order.
    pub const FIELDS: &'static [&'static str] = &[
        "status",
        "parent_id",
        "include_in_nav",
        "show_products",
        "position",
        "name",
        "short_description",
        "description",
        "image",
        "meta_title",
        "meta_keywords",
        "meta_description",
        "url_key",
    ];

    /// Fields backed by `NOT NULL` columns; an explicit `null` is rejected
    pub const NOT_NULL: &'static [&'static str] =
        &["status", "include_in_nav", "show_products", "name", "url_key"];

    /// Route each supplied field to the table that owns it.
    pub fn into_patches(self) -> (CategoryPatch, CategoryDescriptionPatch) {
        let category = CategoryPatch {
            status: self.status,
            parent_id: self.parent_id,
            include_in_nav: self.include_in_nav,
            show_products: self.show_products,
            position: self.position,
        };
        let description = CategoryDescriptionPatch {
            name: self.name,
            short_description: self.short_description,
            description: self.description,
            image: self.image,
            meta_title: self.meta_title,
            meta_keywords: self.meta_keywords,
            meta_description: self.meta_description,
            url_key: self.url_key,
        };
        (category, description)
    }
}

fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Changes to apply to a `category` row. `None` leaves the column untouched;
/// `Some(None)` on a nullable column writes NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub status: Option<CategoryStatus>,
    pub parent_id: Option<Option<i32>>,
    pub include_in_nav: Option<bool>,
    pub show_products: Option<bool>,
    pub position: Option<Option<i32>>,
}

/// Changes to apply to a `category_description` row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDescriptionPatch {
    pub name: Option<String>,
    pub short_description: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub meta_title: Option<Option<String>>,
    pub meta_keywords: Option<Option<String>>,
    pub meta_description: Option<Option<String>>,
    pub url_key: Option<String>,
}

impl CategoryDescriptionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.short_description.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.meta_title.is_none()
            && self.meta_keywords.is_none()
            && self.meta_description.is_none()
            && self.url_key.is_none()
    }
}

/// Response DTO for a category together with its description
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub category_id: i32,
    pub status: String,
    pub parent_id: Option<i32>,
    pub include_in_nav: bool,
    pub show_products: bool,
    pub position: Option<i32>,
    pub name: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_description: Option<String>,
    pub url_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryWithDescription> for CategoryResponseDto {
    fn from(c: CategoryWithDescription) -> Self {
        let category = c.category;
        let description = c.description;
        let (
            name,
            short_description,
            description_text,
            image,
            meta_title,
            meta_keywords,
            meta_description,
            url_key,
        ) = match description {
            Some(d) => (
                Some(d.name),
                d.short_description,
                d.description,
                d.image,
                d.meta_title,
                d.meta_keywords,
                d.meta_description,
                Some(d.url_key),
            ),
            None => (None, None, None, None, None, None, None, None),
        };

        Self {
            id: category.uuid,
            category_id: category.category_id,
            status: category.status,
            parent_id: category.parent_id,
            include_in_nav: category.include_in_nav,
            show_products: category.show_products,
            position: category.position,
            name,
            short_description,
            description: description_text,
            image,
            meta_title,
            meta_keywords,
            meta_description,
            url_key,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parent_id_distinguishes_null_from_absent() {
        let absent: CategoryDataDto = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.parent_id, None);

        let null: CategoryDataDto = serde_json::from_value(json!({ "parent_id": null })).unwrap();
        assert_eq!(null.parent_id, Some(None));

        let set: CategoryDataDto = serde_json::from_value(json!({ "parent_id": 7 })).unwrap();
        assert_eq!(set.parent_id, Some(Some(7)));
    }

    #[test]
    fn test_null_clears_nullable_columns() {
        let dto: CategoryDataDto = serde_json::from_value(json!({
            "image": null,
            "position": null,
            "meta_title": "Shoes"
        }))
        .unwrap();
        assert!(dto.validate().is_ok());

        let (category, description) = dto.into_patches();
        assert_eq!(category.position, Some(None));
        assert_eq!(description.image, Some(None));
        assert_eq!(description.meta_title, Some(Some("Shoes".to_string())));
        assert_eq!(description.description, None);
    }

    #[test]
    fn test_negative_position_still_rejected() {
        let dto: CategoryDataDto = serde_json::from_value(json!({ "position": -1 })).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_into_patches_routes_fields() {
        let dto: CategoryDataDto = serde_json::from_value(json!({
            "status": "disabled",
            "position": 3,
            "name": "Shoes",
            "url_key": "shoes",
            "unknown_column": "ignored"
        }))
        .unwrap();

        let (category, description) = dto.into_patches();
        assert_eq!(category.status, Some(CategoryStatus::Disabled));
        assert_eq!(category.position, Some(Some(3)));
        assert_eq!(description.name.as_deref(), Some("Shoes"));
        assert_eq!(description.url_key.as_deref(), Some("shoes"));
        assert!(!description.is_empty());
    }

    #[test]
    fn test_category_only_payload_has_empty_description_patch() {
        let dto: CategoryDataDto =
            serde_json::from_value(json!({ "status": "enabled", "include_in_nav": false }))
                .unwrap();

        let (category, description) = dto.into_patches();
        assert_eq!(category.include_in_nav, Some(false));
        assert!(description.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_url_key() {
        let dto = CategoryDataDto {
            url_key: Some("Not A Slug".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());

        let dto = CategoryDataDto {
            url_key: Some("not-a-slug".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }
}
