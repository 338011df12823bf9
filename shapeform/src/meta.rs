//! Static presentation metadata attached to schema nodes.

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

// =============================================================================
// Field Validators
// =============================================================================

/// Boxed future returned by a [`FieldValidator`].
pub type ValidationFuture = BoxFuture<'static, Option<String>>;

/// Interaction-time validation hook for a single field.
///
/// Receives the field's current value and a snapshot of the whole object and
/// returns an error message, or `None` when the value is acceptable. Used for
/// `validateOnBlur` and `validateOnSubmit`. Validators are code, so they never
/// appear in serialized metadata.
///
/// # Example
/// ```rust
/// use serde_json::json;
/// use shapeform::meta::FieldValidator;
///
/// let confirm = FieldValidator::sync(|value, data| {
///     (value != &data["password"]).then(|| "Passwords do not match".to_string())
/// });
/// let data = json!({"password": "a", "confirm": "b"});
/// let message = futures::executor::block_on(confirm.validate(&data["confirm"], &data));
/// assert_eq!(message.as_deref(), Some("Passwords do not match"));
/// ```
#[derive(Clone)]
pub struct FieldValidator {
    inner: Arc<dyn Fn(Value, Value) -> ValidationFuture + Send + Sync>,
}

impl FieldValidator {
    /// Create a validator from a synchronous function.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(move |value, data| futures::future::ready(f(&value, &data)).boxed()),
        }
    }

    /// Create a validator from an async function.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Value, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<String>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |value, data| f(value, data).boxed()),
        }
    }

    /// Validate `value` in the context of the object snapshot `data`.
    pub async fn validate(&self, value: &Value, data: &Value) -> Option<String> {
        (self.inner)(value.clone(), data.clone()).await
    }
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldValidator(..)")
    }
}

/// Two validators are equal when they share the same function.
impl PartialEq for FieldValidator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

// =============================================================================
// Field Metadata
// =============================================================================

/// Metadata associated with a schema node.
///
/// Every field is optional; `None` means "not set" so that overlays can tell
/// an unset value from an explicit one. Unknown keys are kept in `extra` so
/// consumers can carry their own hints through transformations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Longer help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Value a form starts from; also feeds computed metadata when the data
    /// snapshot lacks the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Runs when the field loses focus.
    #[serde(skip)]
    pub validate_on_blur: Option<FieldValidator>,

    /// Runs when the form is submitted.
    #[serde(skip)]
    pub validate_on_submit: Option<FieldValidator>,

    /// Consumer-defined hints.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldMeta {
    /// Create new empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the blur validator.
    pub fn with_validate_on_blur(mut self, validator: FieldValidator) -> Self {
        self.validate_on_blur = Some(validator);
        self
    }

    /// Set the submit validator.
    pub fn with_validate_on_submit(mut self, validator: FieldValidator) -> Self {
        self.validate_on_submit = Some(validator);
        self
    }

    /// Attach a consumer-defined hint.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// True when no serializable value is set; validators are not counted.
    pub fn has_no_data(&self) -> bool {
        self.label.is_none()
            && self.description.is_none()
            && self.default_value.is_none()
            && self.extra.is_empty()
    }

    /// True when nothing is set.
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.description.is_none()
            && self.default_value.is_none()
            && self.validate_on_blur.is_none()
            && self.validate_on_submit.is_none()
            && self.extra.is_empty()
    }

    /// Return a copy of `self` with every value set in `over` taking precedence.
    pub fn overlaid_with(&self, over: &FieldMeta) -> FieldMeta {
        let mut merged = self.clone();
        merged.overlay(over);
        merged
    }

    /// Overwrite values in place with those set in `over`.
    pub fn overlay(&mut self, over: &FieldMeta) {
        if over.label.is_some() {
            self.label.clone_from(&over.label);
        }
        if over.description.is_some() {
            self.description.clone_from(&over.description);
        }
        if over.default_value.is_some() {
            self.default_value.clone_from(&over.default_value);
        }
        if over.validate_on_blur.is_some() {
            self.validate_on_blur.clone_from(&over.validate_on_blur);
        }
        if over.validate_on_submit.is_some() {
            self.validate_on_submit.clone_from(&over.validate_on_submit);
        }
        for (key, value) in &over.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}
