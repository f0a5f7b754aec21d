//! Extension points of the category update flow.
//!
//! | Point | Runs | Sees |
//! |-------|------|------|
//! | `category_data_before_update` | before validation | raw payload (transform) |
//! | `update_category` | around the whole update | raw payload / result |
//! | `update_category_data` | around lookup + writes | validated payload / result |
//!
//! Everything is registered on a [`CategoryExtensions`] value that is built
//! at startup and handed to `CategoryService`.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::models::CategoryWithDescription;
use crate::features::categories::schema::CategoryDataSchema;
use crate::features::categories::services::CategoryTransaction;
use crate::shared::hooks::{HookContext, ValuePipeline};

/// Named points where [`UpdateCategoryHook`]s run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionPoint {
    UpdateCategory,
    UpdateCategoryData,
}

impl ExtensionPoint {
    pub fn name(&self) -> &'static str {
        match self {
            ExtensionPoint::UpdateCategory => "update_category",
            ExtensionPoint::UpdateCategoryData => "update_category_data",
        }
    }
}

/// Callback run before and after an extension point.
///
/// Hooks share the caller's transaction, so their reads and writes commit or
/// roll back together with the update. Returning an error aborts the update.
#[async_trait]
pub trait UpdateCategoryHook: Send + Sync {
    fn name(&self) -> &str;

    async fn before(
        &self,
        _tx: &mut dyn CategoryTransaction,
        _ctx: &HookContext,
        _uuid: Uuid,
        _data: &Value,
    ) -> Result<()> {
        Ok(())
    }

    async fn after(
        &self,
        _tx: &mut dyn CategoryTransaction,
        _ctx: &HookContext,
        _updated: &CategoryWithDescription,
    ) -> Result<()> {
        Ok(())
    }
}

/// Transforms, schema and hooks used by the category update flow
#[derive(Clone)]
pub struct CategoryExtensions {
    data_before_update: ValuePipeline<Value>,
    schema: CategoryDataSchema,
    hooks: HashMap<ExtensionPoint, Vec<Arc<dyn UpdateCategoryHook>>>,
}

impl Default for CategoryExtensions {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryExtensions {
    /// No transforms, no hooks, and the update schema (`status` required)
    pub fn new() -> Self {
        Self {
            data_before_update: ValuePipeline::new("category_data_before_update"),
            schema: CategoryDataSchema::for_update(),
            hooks: HashMap::new(),
        }
    }

    /// The set registered by the application: legacy status normalization
    /// and audit logging
    pub fn with_defaults() -> Self {
        Self::new()
            .transform(normalize_legacy_status)
            .hook(ExtensionPoint::UpdateCategory, AuditLogHook)
    }

    /// Append a transform to `category_data_before_update`
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value, &HookContext) -> Result<Value> + Send + Sync + 'static,
    {
        self.data_before_update = self.data_before_update.with(transform);
        self
    }

    #[allow(dead_code)]
    pub fn schema(mut self, schema: CategoryDataSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn hook(mut self, point: ExtensionPoint, hook: impl UpdateCategoryHook + 'static) -> Self {
        self.hooks.entry(point).or_default().push(Arc::new(hook));
        self
    }

    pub fn data_before_update(&self) -> &ValuePipeline<Value> {
        &self.data_before_update
    }

    pub fn data_schema(&self) -> &CategoryDataSchema {
        &self.schema
    }

    pub fn hooks(&self, point: ExtensionPoint) -> &[Arc<dyn UpdateCategoryHook>] {
        self.hooks.get(&point).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) async fn run_before(
        &self,
        point: ExtensionPoint,
        tx: &mut dyn CategoryTransaction,
        ctx: &HookContext,
        uuid: Uuid,
        data: &Value,
    ) -> Result<()> {
        for hook in self.hooks(point) {
            tracing::debug!(point = point.name(), hook = hook.name(), "Running before hook");
            hook.before(&mut *tx, ctx, uuid, data).await?;
        }
        Ok(())
    }

    pub(crate) async fn run_after(
        &self,
        point: ExtensionPoint,
        tx: &mut dyn CategoryTransaction,
        ctx: &HookContext,
        updated: &CategoryWithDescription,
    ) -> Result<()> {
        for hook in self.hooks(point) {
            tracing::debug!(point = point.name(), hook = hook.name(), "Running after hook");
            hook.after(&mut *tx, ctx, updated).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for CategoryExtensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks: HashMap<&str, Vec<&str>> = self
            .hooks
            .iter()
            .map(|(point, hooks)| (point.name(), hooks.iter().map(|h| h.name()).collect()))
            .collect();

        f.debug_struct("CategoryExtensions")
            .field("data_before_update", &self.data_before_update)
            .field("schema", &self.schema)
            .field("hooks", &hooks)
            .finish()
    }
}

/// Accept the numeric and boolean status values older clients send
/// (`1`/`0`, `"1"`/`"0"`, `true`/`false`).
pub fn normalize_legacy_status(mut data: Value, _ctx: &HookContext) -> Result<Value> {
    let Some(status) = data.get_mut("status") else {
        return Ok(data);
    };

    let normalized = match status {
        Value::Bool(true) => Some("enabled"),
        Value::Bool(false) => Some("disabled"),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some("enabled"),
            Some(0) => Some("disabled"),
            _ => None,
        },
        Value::String(s) if s.as_str() == "1" => Some("enabled"),
        Value::String(s) if s.as_str() == "0" => Some("disabled"),
        _ => None,
    };

    if let Some(normalized) = normalized {
        *status = Value::String(normalized.to_string());
    }

    Ok(data)
}

/// Logs every completed update
pub struct AuditLogHook;

#[async_trait]
impl UpdateCategoryHook for AuditLogHook {
    fn name(&self) -> &str {
        "audit_log"
    }

    async fn after(
        &self,
        _tx: &mut dyn CategoryTransaction,
        ctx: &HookContext,
        updated: &CategoryWithDescription,
    ) -> Result<()> {
        tracing::info!(
            uuid = %updated.category.uuid,
            status = %updated.category.status,
            has_description = updated.description.is_some(),
            request_id = ctx.get_str("request_id").unwrap_or("-"),
            "Category updated"
        );
        Ok(())
    }
}
