//! Extension-point plumbing shared by services.
//!
//! A [`ValuePipeline`] is an ordered list of transforms that a service runs
//! over a value at a named point. Every transform receives the same
//! [`HookContext`], which is read-only for the duration of one invocation.

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::core::error::{AppError, Result};

/// Read-only values shared with every transform and hook of one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookContext {
    values: Map<String, Value>,
}

impl HookContext {
    /// Build a context from caller-supplied data.
    ///
    /// `None` and `null` yield an empty context. Anything other than a JSON
    /// object is rejected with [`AppError::InvalidInput`].
    pub fn from_value(value: Option<Value>) -> Result<Self> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Object(values)) => Ok(Self { values }),
            Some(_) => Err(AppError::InvalidInput(
                "Context must be an object".to_string(),
            )),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

type Transform<T> = Arc<dyn Fn(T, &HookContext) -> Result<T> + Send + Sync>;

/// Named, ordered chain of transforms over a value of type `T`.
pub struct ValuePipeline<T> {
    name: &'static str,
    transforms: Vec<Transform<T>>,
}

impl<T> ValuePipeline<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            transforms: Vec::new(),
        }
    }

    /// Append a transform. Transforms run in the order they were added.
    pub fn with<F>(mut self, transform: F) -> Self
    where
        F: Fn(T, &HookContext) -> Result<T> + Send + Sync + 'static,
    {
        self.transforms.push(Arc::new(transform));
        self
    }

    #[allow(dead_code)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Feed `value` through every transform; the first error stops the chain.
    pub fn apply(&self, value: T, ctx: &HookContext) -> Result<T> {
        self.transforms
            .iter()
            .try_fold(value, |acc, transform| transform(acc, ctx))
    }
}

impl<T> Clone for ValuePipeline<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            transforms: self.transforms.clone(),
        }
    }
}

impl<T> fmt::Debug for ValuePipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuePipeline")
            .field("name", &self.name)
            .field("transforms", &self.transforms.len())
            .finish()
    }
}
