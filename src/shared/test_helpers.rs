use async_trait::async_trait;
use base64::prelude::*;
use chrono::Utc;
use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CategoryDescriptionPatch, CategoryPatch};
use crate::features::categories::models::{Category, CategoryDescription};
use crate::features::categories::services::{CategoryStore, CategoryTransaction};

pub const TEST_ADMIN_CREDENTIALS: &str = "admin:secret";

/// `Authorization` header value for [`TEST_ADMIN_CREDENTIALS`]
pub fn admin_basic_auth() -> String {
    format!("Basic {}", BASE64_STANDARD.encode(TEST_ADMIN_CREDENTIALS))
}

pub fn fake_category(category_id: i32, status: &str) -> Category {
    let now = Utc::now();
    Category {
        category_id,
        uuid: Uuid::new_v4(),
        status: status.to_string(),
        parent_id: None,
        include_in_nav: true,
        show_products: true,
        position: Some(0),
        created_at: now,
        updated_at: now,
    }
}

pub fn fake_description(category_id: i32) -> CategoryDescription {
    let word: String = Word().fake();
    CategoryDescription {
        category_description_id: category_id,
        category_description_category_id: category_id,
        name: word.clone(),
        short_description: None,
        description: Some(Sentence(3..8).fake()),
        image: None,
        meta_title: None,
        meta_keywords: None,
        meta_description: None,
        url_key: format!("{}-{}", word.to_lowercase(), category_id),
    }
}

/// Rows visible to a transaction
#[derive(Debug, Clone, Default)]
pub struct CategoryTables {
    pub categories: Vec<Category>,
    pub descriptions: Vec<CategoryDescription>,
}

impl CategoryTables {
    pub fn category(&self, uuid: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.uuid == uuid)
    }

    pub fn description(&self, category_id: i32) -> Option<&CategoryDescription> {
        self.descriptions
            .iter()
            .find(|d| d.category_description_category_id == category_id)
    }
}

#[derive(Debug, Default)]
struct StoreState {
    tables: CategoryTables,
    commits: usize,
    rollbacks: usize,
    fail_description_updates: bool,
}

/// Category store kept in memory.
///
/// Each transaction works on a copy of the tables taken at `begin`; the copy
/// replaces the shared tables only on `commit`.
#[derive(Clone, Default)]
pub struct InMemoryCategoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, category: Category, description: Option<CategoryDescription>) {
        let mut state = self.state.lock().unwrap();
        state.tables.categories.push(category);
        state.tables.descriptions.extend(description);
    }

    pub fn snapshot(&self) -> CategoryTables {
        self.state.lock().unwrap().tables.clone()
    }

    pub fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.state.lock().unwrap().rollbacks
    }

    /// Make every later description update fail with a database error
    pub fn fail_description_updates(&self) {
        self.state.lock().unwrap().fail_description_updates = true;
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn begin(&self) -> Result<Box<dyn CategoryTransaction>> {
        let state = self.state.lock().unwrap();
        Ok(Box::new(InMemoryTransaction {
            working: state.tables.clone(),
            fail_description_updates: state.fail_description_updates,
            state: Arc::clone(&self.state),
        }))
    }
}

struct InMemoryTransaction {
    working: CategoryTables,
    fail_description_updates: bool,
    state: Arc<Mutex<StoreState>>,
}

#[async_trait]
impl CategoryTransaction for InMemoryTransaction {
    async fn find_by_uuid(&mut self, uuid: Uuid) -> Result<Option<Category>> {
        Ok(self.working.category(uuid).cloned())
    }

    async fn find_description(&mut self, category_id: i32) -> Result<Option<CategoryDescription>> {
        Ok(self.working.description(category_id).cloned())
    }

    async fn update_category(&mut self, uuid: Uuid, patch: &CategoryPatch) -> Result<Category> {
        let category = self
            .working
            .categories
            .iter_mut()
            .find(|c| c.uuid == uuid)
            .ok_or_else(|| AppError::NotFound("Requested category not found".to_string()))?;

        if let Some(status) = patch.status {
            category.status = status.as_str().to_string();
        }
        if let Some(parent_id) = patch.parent_id {
            category.parent_id = parent_id;
        }
        if let Some(include_in_nav) = patch.include_in_nav {
            category.include_in_nav = include_in_nav;
        }
        if let Some(show_products) = patch.show_products {
            category.show_products = show_products;
        }
        if let Some(position) = patch.position {
            category.position = position;
        }
        category.updated_at = Utc::now();

        Ok(category.clone())
    }

    async fn update_description(
        &mut self,
        category_id: i32,
        patch: &CategoryDescriptionPatch,
    ) -> Result<Option<CategoryDescription>> {
        if self.fail_description_updates {
            return Err(AppError::Database(sqlx::Error::Protocol(
                "simulated description failure".to_string(),
            )));
        }

        let Some(row) = self
            .working
            .descriptions
            .iter_mut()
            .find(|d| d.category_description_category_id == category_id)
        else {
            return Ok(None);
        };

        if let Some(name) = &patch.name {
            row.name = name.clone();
        }
        let optional_columns = [
            (&mut row.short_description, &patch.short_description),
            (&mut row.description, &patch.description),
            (&mut row.image, &patch.image),
            (&mut row.meta_title, &patch.meta_title),
            (&mut row.meta_keywords, &patch.meta_keywords),
            (&mut row.meta_description, &patch.meta_description),
        ];
        for (column, value) in optional_columns {
            if let Some(value) = value {
                *column = value.clone();
            }
        }
        if let Some(url_key) = &patch.url_key {
            row.url_key = url_key.clone();
        }

        Ok(Some(row.clone()))
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.tables = self.working.clone();
        state.commits += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.state.lock().unwrap().rollbacks += 1;
        Ok(())
    }
}

