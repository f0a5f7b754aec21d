use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryDataDto;
use crate::shared::validation::first_violation;

type SchemaRule = Arc<dyn Fn(&Map<String, Value>) -> std::result::Result<(), String> + Send + Sync>;

/// Contract a category payload must satisfy before it is written.
///
/// Checks run in a fixed order and stop at the first violation:
/// required properties, `null` on non-nullable columns, registered rules,
/// type conversion into [`CategoryDataDto`], then the field constraints
/// declared on the DTO.
#[derive(Clone, Default)]
pub struct CategoryDataSchema {
    required: Vec<String>,
    rules: Vec<SchemaRule>,
}

impl CategoryDataSchema {
    /// Schema with no required properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema used by the update flow: `status` must be present
    pub fn for_update() -> Self {
        Self::new().require("status")
    }

    pub fn require(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.required.contains(&field) {
            self.required.push(field);
        }
        self
    }

    /// Add a rule over the raw payload. An `Err` message becomes the
    /// validation error reported to the caller.
    #[allow(dead_code)]
    pub fn with_rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.rules.push(Arc::new(rule));
        self
    }

    #[allow(dead_code)]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn validate(&self, data: &Value) -> Result<CategoryDataDto> {
        let object = data
            .as_object()
            .ok_or_else(|| AppError::Validation("must be object".to_string()))?;

        // A required property set to null counts as missing
        if let Some(missing) = self
            .required
            .iter()
            .find(|field| object.get(field.as_str()).is_none_or(Value::is_null))
        {
            return Err(AppError::Validation(format!(
                "must have required property '{}'",
                missing
            )));
        }

        if let Some(field) = CategoryDataDto::NOT_NULL
            .iter()
            .find(|field| object.get(**field).is_some_and(Value::is_null))
        {
            return Err(AppError::Validation(format!("{} must not be null", field)));
        }

        for rule in &self.rules {
            rule(object).map_err(AppError::Validation)?;
        }

        let dto =
            CategoryDataDto::deserialize(data).map_err(|e| AppError::Validation(e.to_string()))?;

        dto.validate().map_err(|errors| {
            AppError::Validation(
                first_violation(&errors, CategoryDataDto::FIELDS)
                    .unwrap_or_else(|| errors.to_string()),
            )
        })?;

        Ok(dto)
    }
}

impl fmt::Debug for CategoryDataSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryDataSchema")
            .field("required", &self.required)
            .field("rules", &self.rules.len())
            .finish()
    }
}
