//! Metadata resolution: static meta merged with computed hooks for a data
//! snapshot.
//!
//! ```rust
//! # futures::executor::block_on(async {
//! use serde_json::json;
//! use shapeform::computed::{self, ComputedMeta};
//! use shapeform::{number, object, FieldMeta};
//!
//! let order = object([
//!     ("qty", number().with_meta(FieldMeta::new().with_label("Quantity").with_default(1))),
//!     ("total", number().with_meta(FieldMeta::new().with_label("Total"))),
//! ])
//! .with_computed([(
//!     "total",
//!     ComputedMeta::new().label(computed::sync(|data| format!("Total for {}", data["qty"]))),
//! )]);
//!
//! // `qty` is missing, so hooks see its static default.
//! let meta = order.all_merged_meta(&json!({})).await;
//! assert_eq!(meta["total"].label.as_deref(), Some("Total for 1"));
//! assert_eq!(meta["qty"].label.as_deref(), Some("Quantity"));
//! # });
//! ```

use crate::error::{MetaError, MetaResult};
use crate::meta::FieldMeta;
use crate::schema::{ObjectSchema, Schema};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// Starting value for a field nobody provided.
fn zero_value(schema: &Schema) -> Value {
    match schema.unwrap_optional() {
        Schema::Primitive(p) => p.kind().zero_value(),
        _ => Value::Null,
    }
}

fn is_present(value: Option<&Value>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

impl ObjectSchema {
    /// Static metadata of one field, seen through any optional wrapper.
    pub fn static_meta(&self, field: &str) -> Option<FieldMeta> {
        self.field(field).map(Schema::effective_meta)
    }

    /// Static metadata of every field.
    pub fn static_meta_all(&self) -> BTreeMap<String, FieldMeta> {
        self.shape()
            .iter()
            .map(|(name, schema)| (name.to_string(), schema.effective_meta()))
            .collect()
    }

    /// Fill the gaps of `partial` so computed hooks see every field.
    ///
    /// A field counts as provided when its key holds a non-null value.
    /// Missing fields get their static default value, else the zero value of
    /// their type (`""`, `0`, `false`, `null` for containers). Keys of
    /// `partial` outside the shape are kept. A non-object `partial` is
    /// treated as empty.
    pub fn complete_data(&self, partial: &Value) -> Value {
        let mut data = match partial {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        for (name, schema) in self.shape().iter() {
            if is_present(data.get(name)) {
                continue;
            }
            let fill = schema
                .effective_meta()
                .default_value
                .unwrap_or_else(|| zero_value(schema));
            data.insert(name.to_string(), fill);
        }
        Value::Object(data)
    }

    /// Evaluate the computed hooks of one field against `data` as given.
    ///
    /// A field without hooks yields empty metadata.
    pub async fn computed_meta(&self, field: &str, data: &Value) -> MetaResult<FieldMeta> {
        if !self.shape().contains(field) {
            return Err(MetaError::UnknownField(field.to_string()));
        }
        match self.computed(field) {
            Some(hooks) => hooks.evaluate(field, data).await,
            None => Ok(FieldMeta::new()),
        }
    }

    /// Evaluate every registered hook set, field by field.
    ///
    /// Entries registered for names outside the shape are skipped.
    pub async fn all_computed_meta(&self, data: &Value) -> MetaResult<BTreeMap<String, FieldMeta>> {
        let mut out = BTreeMap::new();
        for (field, hooks) in self.computed_entries() {
            if !self.shape().contains(field) || hooks.is_empty() {
                continue;
            }
            let meta = hooks.evaluate(field, data).await?;
            out.insert(field.clone(), meta);
        }
        Ok(out)
    }

    /// One merged metadata view per shape field for a partial data snapshot.
    ///
    /// Computed values override static ones. If any hook fails the computed
    /// pass is abandoned and static metadata is returned; the failure is
    /// logged, never returned.
    pub async fn all_merged_meta(&self, partial: &Value) -> BTreeMap<String, FieldMeta> {
        let mut merged = self.static_meta_all();
        if !self.has_computed() {
            return merged;
        }

        let data = self.complete_data(partial);
        match self.all_computed_meta(&data).await {
            Ok(computed) => {
                trace!(fields = computed.len(), "Applying computed metadata");
                for (field, meta) in computed {
                    if let Some(slot) = merged.get_mut(&field) {
                        slot.overlay(&meta);
                    }
                }
            }
            Err(error) => {
                warn!(error = %error, "Computed metadata failed; using static metadata only");
            }
        }
        debug!(fields = merged.len(), "Resolved merged metadata");
        merged
    }
}
