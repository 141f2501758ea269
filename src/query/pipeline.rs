//! Ordered query transform pipeline.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::dispatch::error::{BoxError, DispatchError, DispatchResult};
use crate::query::params::QueryParams;

/// Handler signature: mutate the per-request result given the parameter value.
pub type TransformFn = dyn Fn(&mut Value, Option<&str>) -> Result<(), BoxError> + Send + Sync;

/// A named query parameter and the handler it drives.
#[derive(Clone)]
pub struct QueryTransform {
    name: String,
    handler: Arc<TransformFn>,
}

impl QueryTransform {
    /// Create a transform from a fallible handler.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Value, Option<&str>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handler: Arc::new(handler),
        }
    }

    /// Create a transform from a handler that cannot fail.
    pub fn infallible<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Value, Option<&str>) + Send + Sync + 'static,
    {
        Self::new(name, move |result, value| {
            handler(result, value);
            Ok(())
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the handler against `result`.
    pub fn call(&self, result: &mut Value, value: Option<&str>) -> Result<(), BoxError> {
        (self.handler)(result, value)
    }
}

impl fmt::Debug for QueryTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryTransform")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Apply `transforms` to `result` in order.
///
/// Every handler is called, with `None` when its parameter is absent, and
/// sees the mutations of the handlers before it. The first failing handler
/// stops the pipeline.
pub fn apply(query: &QueryParams, result: &mut Value, transforms: &[QueryTransform]) -> DispatchResult<()> {
    for transform in transforms {
        let value = query.first(transform.name());
        transform.call(result, value).map_err(DispatchError::internal)?;
    }
    Ok(())
}
