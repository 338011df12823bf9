//! The schema node hierarchy.
//!
//! [`Schema`] is a closed union over the five node variants. Every node
//! carries a static [`FieldMeta`] slot and can be compiled into a
//! [`Validator`]. Object-only operations live on [`ObjectSchema`]; reach it
//! from a `Schema` with [`Schema::as_object`] or [`Schema::into_object`].

mod collection;
mod object;
mod optional;
mod primitive;
mod shape;

pub use collection::{ArraySchema, RecordSchema};
pub use object::{IdSelector, ObjectCheck, ObjectSchema};
pub use optional::OptionalSchema;
pub use primitive::{PrimitiveKind, PrimitiveSchema};
pub use shape::Shape;

use crate::config::ValidatorOptions;
use crate::error::{SchemaError, SchemaResult};
use crate::meta::FieldMeta;
use crate::validator::{self, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Discriminant of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Boolean,
    Optional,
    Object,
    Array,
    Record,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Optional => "optional",
            Self::Object => "object",
            Self::Array => "array",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One data-shape node.
#[derive(Debug, Clone)]
pub enum Schema {
    Primitive(PrimitiveSchema),
    Optional(OptionalSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    Record(RecordSchema),
}

impl Schema {
    pub fn schema_type(&self) -> SchemaType {
        match self {
            Self::Primitive(p) => match p.kind {
                PrimitiveKind::String => SchemaType::String,
                PrimitiveKind::Number => SchemaType::Number,
                PrimitiveKind::Boolean => SchemaType::Boolean,
            },
            Self::Optional(_) => SchemaType::Optional,
            Self::Object(_) => SchemaType::Object,
            Self::Array(_) => SchemaType::Array,
            Self::Record(_) => SchemaType::Record,
        }
    }

    /// Static metadata of this node (for an optional wrapper, its own slot).
    pub fn meta(&self) -> &FieldMeta {
        match self {
            Self::Primitive(p) => &p.meta,
            Self::Optional(o) => &o.meta,
            Self::Object(o) => o.meta(),
            Self::Array(a) => &a.meta,
            Self::Record(r) => &r.meta,
        }
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        match self {
            Self::Primitive(p) => &mut p.meta,
            Self::Optional(o) => &mut o.meta,
            Self::Object(o) => o.meta_mut(),
            Self::Array(a) => &mut a.meta,
            Self::Record(r) => &mut r.meta,
        }
    }

    /// Attach metadata; values set in `meta` overwrite existing ones.
    pub fn with_meta(mut self, meta: FieldMeta) -> Self {
        self.meta_mut().overlay(&meta);
        self
    }

    /// Wrap in an optional node. Already-optional nodes are returned as is.
    pub fn optional(self) -> Schema {
        OptionalSchema::wrap(Arc::new(self))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// The node under any optional wrapper.
    pub fn unwrap_optional(&self) -> &Schema {
        match self {
            Self::Optional(o) => o.inner.unwrap_optional(),
            other => other,
        }
    }

    /// Metadata a consumer should see for this node: through an optional
    /// wrapper, the inner meta overlaid with the wrapper's own.
    pub fn effective_meta(&self) -> FieldMeta {
        match self {
            Self::Optional(o) => o.inner.effective_meta().overlaid_with(&o.meta),
            other => other.meta().clone(),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Down-cast to an object schema.
    pub fn into_object(self) -> SchemaResult<ObjectSchema> {
        match self {
            Self::Object(o) => Ok(o),
            other => Err(SchemaError::NotAnObject {
                operation: "into_object".to_string(),
                type_name: other.schema_type().to_string(),
            }),
        }
    }

    /// Compile into a validator with default options.
    pub fn compile_to_validator(&self) -> Validator {
        self.compile_with_options(ValidatorOptions::default())
    }

    pub fn compile_with_options(&self, options: ValidatorOptions) -> Validator {
        Validator::new(validator::compile(self), options)
    }

    /// Compile a coercing validator. Only object roots support coercion.
    pub fn compile_to_validator_with_coercion(&self) -> SchemaResult<Validator> {
        match self {
            Self::Object(o) => Ok(o.compile_to_validator_with_coercion()),
            other => Err(SchemaError::NotAnObject {
                operation: "compile_to_validator_with_coercion".to_string(),
                type_name: other.schema_type().to_string(),
            }),
        }
    }
}

impl From<PrimitiveSchema> for Schema {
    fn from(schema: PrimitiveSchema) -> Self {
        Self::Primitive(schema)
    }
}

impl From<OptionalSchema> for Schema {
    fn from(schema: OptionalSchema) -> Self {
        Self::Optional(schema)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(schema: ObjectSchema) -> Self {
        Self::Object(schema)
    }
}

impl From<ArraySchema> for Schema {
    fn from(schema: ArraySchema) -> Self {
        Self::Array(schema)
    }
}

impl From<RecordSchema> for Schema {
    fn from(schema: RecordSchema) -> Self {
        Self::Record(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{array, number, object, string};

    #[test]
    fn test_double_optional_collapses() {
        let once = string().optional();
        let twice = once.clone().optional();
        assert_eq!(twice.schema_type(), SchemaType::Optional);
        assert_eq!(twice.unwrap_optional().schema_type(), SchemaType::String);
        match twice {
            Schema::Optional(o) => assert_eq!(o.inner().schema_type(), SchemaType::String),
            _ => panic!("expected optional"),
        }
    }

    #[test]
    fn test_with_meta_overlays() {
        let schema = number()
            .with_meta(FieldMeta::new().with_label("Age").with_default(18))
            .with_meta(FieldMeta::new().with_label("Years"));
        assert_eq!(schema.meta().label.as_deref(), Some("Years"));
        assert_eq!(schema.meta().default_value, Some(serde_json::json!(18)));
    }

    #[test]
    fn test_effective_meta_through_optional() {
        let schema = string()
            .with_meta(FieldMeta::new().with_label("Email").with_description("Work email"))
            .optional()
            .with_meta(FieldMeta::new().with_description("Optional work email"));
        let meta = schema.effective_meta();
        assert_eq!(meta.label.as_deref(), Some("Email"));
        assert_eq!(meta.description.as_deref(), Some("Optional work email"));
    }

    #[test]
    fn test_into_object_rejects_other_nodes() {
        let err = array(string()).into_object().unwrap_err();
        assert_eq!(
            err,
            SchemaError::NotAnObject {
                operation: "into_object".into(),
                type_name: "array".into(),
            }
        );
        assert!(Schema::from(object([("a", string())])).into_object().is_ok());
    }

    #[test]
    fn test_coercion_requires_object_root() {
        let err = number().compile_to_validator_with_coercion().unwrap_err();
        assert!(matches!(err, SchemaError::NotAnObject { .. }));
        let schema = Schema::from(object([("n", number())]));
        let validator = schema.compile_to_validator_with_coercion().unwrap();
        assert!(validator.is_valid(&serde_json::json!({"n": "5"})));
    }
}
