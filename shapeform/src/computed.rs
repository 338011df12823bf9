//! Computed metadata hooks.
//!
//! A [`ComputedFn`] receives a snapshot of the whole object's data and
//! produces one metadata attribute for one field. Hooks can be asynchronous
//! ([`from_async`]) or plain functions ([`sync`], [`try_sync`]); both are
//! stored behind the same boxed-future signature so the resolution service
//! awaits them uniformly. A hook that panics fails like one returning `Err`.
//!
//! # Example
//! ```rust
//! use shapeform::computed::{self, ComputedMeta};
//!
//! let total = ComputedMeta::new()
//!     .label(computed::sync(|data| {
//!         format!("Total ({})", data["currency"].as_str().unwrap_or("USD"))
//!     }))
//!     .description(computed::from_async(|data| async move {
//!         Ok(format!("{} line items", data["items"].as_array().map_or(0, Vec::len)))
//!     }));
//! assert!(total.label.is_some());
//! ```

use crate::error::{MetaError, MetaResult};
use crate::meta::{FieldMeta, FieldValidator};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Boxed future returned by every computed hook.
pub type MetaFuture<T> = BoxFuture<'static, MetaResult<T>>;

/// A hook computing one metadata attribute from a data snapshot.
pub struct ComputedFn<T> {
    inner: Arc<dyn Fn(Value) -> MetaFuture<T> + Send + Sync>,
}

impl<T> Clone for ComputedFn<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ComputedFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComputedFn(..)")
    }
}

impl<T: Send + 'static> ComputedFn<T> {
    /// Invoke the hook with a snapshot of the object's data.
    ///
    /// A panic inside the hook is returned as [`MetaError::Message`].
    pub async fn call(&self, data: &Value) -> MetaResult<T> {
        let inner = Arc::clone(&self.inner);
        let data = data.clone();
        AssertUnwindSafe(async move { inner(data).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(MetaError::msg(panic_message(&*payload))))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload");
    format!("hook panicked: {detail}")
}

/// Create a hook from an async function.
pub fn from_async<T, F, Fut>(f: F) -> ComputedFn<T>
where
    T: Send + 'static,
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MetaResult<T>> + Send + 'static,
{
    ComputedFn {
        inner: Arc::new(move |data| f(data).boxed()),
    }
}

/// Create a hook from an infallible synchronous function.
pub fn sync<T, F>(f: F) -> ComputedFn<T>
where
    T: Send + 'static,
    F: Fn(&Value) -> T + Send + Sync + 'static,
{
    ComputedFn {
        inner: Arc::new(move |data| {
            let out = f(&data);
            futures::future::ready(Ok(out)).boxed()
        }),
    }
}

/// Create a hook from a fallible synchronous function.
pub fn try_sync<T, F>(f: F) -> ComputedFn<T>
where
    T: Send + 'static,
    F: Fn(&Value) -> MetaResult<T> + Send + Sync + 'static,
{
    ComputedFn {
        inner: Arc::new(move |data| futures::future::ready(f(&data)).boxed()),
    }
}

/// The computed hooks registered for one field.
#[derive(Debug, Clone, Default)]
pub struct ComputedMeta {
    pub label: Option<ComputedFn<String>>,
    pub description: Option<ComputedFn<String>>,
    pub default_value: Option<ComputedFn<Value>>,
    pub validate_on_blur: Option<ComputedFn<FieldValidator>>,
    pub validate_on_submit: Option<ComputedFn<FieldValidator>>,
}

impl ComputedMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, hook: ComputedFn<String>) -> Self {
        self.label = Some(hook);
        self
    }

    pub fn description(mut self, hook: ComputedFn<String>) -> Self {
        self.description = Some(hook);
        self
    }

    pub fn default_value(mut self, hook: ComputedFn<Value>) -> Self {
        self.default_value = Some(hook);
        self
    }

    /// Hook choosing the blur validator from the current data.
    pub fn validate_on_blur(mut self, hook: ComputedFn<FieldValidator>) -> Self {
        self.validate_on_blur = Some(hook);
        self
    }

    pub fn validate_on_submit(mut self, hook: ComputedFn<FieldValidator>) -> Self {
        self.validate_on_submit = Some(hook);
        self
    }

    /// True when no hook is registered.
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.description.is_none()
            && self.default_value.is_none()
            && self.validate_on_blur.is_none()
            && self.validate_on_submit.is_none()
    }

    /// Run every registered hook in declaration order, awaiting each one
    /// before starting the next.
    ///
    /// The first failure stops evaluation and is returned with `field` and
    /// attribute context.
    pub async fn evaluate(&self, field: &str, data: &Value) -> MetaResult<FieldMeta> {
        let mut meta = FieldMeta::new();
        if let Some(hook) = &self.label {
            meta.label = Some(hook.call(data).await.map_err(|e| e.in_field(field, "label"))?);
        }
        if let Some(hook) = &self.description {
            meta.description = Some(
                hook.call(data)
                    .await
                    .map_err(|e| e.in_field(field, "description"))?,
            );
        }
        if let Some(hook) = &self.default_value {
            meta.default_value = Some(
                hook.call(data)
                    .await
                    .map_err(|e| e.in_field(field, "defaultValue"))?,
            );
        }
        if let Some(hook) = &self.validate_on_blur {
            meta.validate_on_blur = Some(
                hook.call(data)
                    .await
                    .map_err(|e| e.in_field(field, "validateOnBlur"))?,
            );
        }
        if let Some(hook) = &self.validate_on_submit {
            meta.validate_on_submit = Some(
                hook.call(data)
                    .await
                    .map_err(|e| e.in_field(field, "validateOnSubmit"))?,
            );
        }
        Ok(meta)
    }
}
