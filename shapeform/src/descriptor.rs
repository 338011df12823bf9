//! Serializable description of a schema tree.
//!
//! Descriptors carry everything that is plain data: node types, static
//! metadata, layouts, the id field, catchall and passthrough. Computed hooks
//! and check hooks are code and are left out.
//!
//! # Example
//! ```rust
//! use shapeform::{number, object, string, Schema};
//!
//! let schema: Schema = object([("id", number()), ("tags", shapeform::array(string()))]).into();
//! let json = schema.to_json().unwrap();
//! let back = Schema::from_json(&json).unwrap();
//! assert_eq!(back.to_descriptor(), schema.to_descriptor());
//! ```

use crate::error::{SchemaError, SchemaResult};
use crate::layout::Layout;
use crate::meta::FieldMeta;
use crate::schema::{
    ArraySchema, ObjectSchema, OptionalSchema, PrimitiveKind, PrimitiveSchema, RecordSchema,
    Schema, Shape,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

const KNOWN_TYPES: [&str; 7] = [
    "string", "number", "boolean", "optional", "object", "array", "record",
];

/// One node of a descriptor tree, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaDescriptor {
    String {
        #[serde(default, skip_serializing_if = "FieldMeta::has_no_data")]
        meta: FieldMeta,
    },
    Number {
        #[serde(default, skip_serializing_if = "FieldMeta::has_no_data")]
        meta: FieldMeta,
    },
    Boolean {
        #[serde(default, skip_serializing_if = "FieldMeta::has_no_data")]
        meta: FieldMeta,
    },
    Optional {
        inner: Box<SchemaDescriptor>,
        #[serde(default, skip_serializing_if = "FieldMeta::has_no_data")]
        meta: FieldMeta,
    },
    Object(ObjectDescriptor),
    Array {
        element: Box<SchemaDescriptor>,
        #[serde(default, skip_serializing_if = "FieldMeta::has_no_data")]
        meta: FieldMeta,
    },
    Record {
        value: Box<SchemaDescriptor>,
        #[serde(default, skip_serializing_if = "FieldMeta::has_no_data")]
        meta: FieldMeta,
    },
    /// Any `type` tag this version does not know.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescriptor {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layouts: BTreeMap<String, Layout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catchall: Option<Box<SchemaDescriptor>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub passthrough: bool,
    #[serde(default, skip_serializing_if = "FieldMeta::has_no_data")]
    pub meta: FieldMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub schema: SchemaDescriptor,
}

impl SchemaDescriptor {
    /// Build the schema this descriptor describes.
    pub fn into_schema(self) -> SchemaResult<Schema> {
        let schema = match self {
            Self::String { meta } => primitive(PrimitiveKind::String, meta),
            Self::Number { meta } => primitive(PrimitiveKind::Number, meta),
            Self::Boolean { meta } => primitive(PrimitiveKind::Boolean, meta),
            Self::Optional { inner, meta } => {
                OptionalSchema::wrap(Arc::new(inner.into_schema()?)).with_meta(meta)
            }
            Self::Object(object) => object.into_object_schema()?.into(),
            Self::Array { element, meta } => {
                Schema::from(ArraySchema::new(element.into_schema()?)).with_meta(meta)
            }
            Self::Record { value, meta } => {
                Schema::from(RecordSchema::new(value.into_schema()?)).with_meta(meta)
            }
            Self::Unsupported => return Err(SchemaError::unsupported_node("unknown")),
        };
        Ok(schema)
    }
}

fn primitive(kind: PrimitiveKind, meta: FieldMeta) -> Schema {
    Schema::from(PrimitiveSchema::new(kind)).with_meta(meta)
}

impl ObjectDescriptor {
    pub fn into_object_schema(self) -> SchemaResult<ObjectSchema> {
        let mut shape = Shape::new();
        for field in self.fields {
            shape.insert(field.name, field.schema.into_schema()?);
        }

        let mut object = ObjectSchema::new(shape)
            .with_meta(self.meta)
            .with_layouts(self.layouts);
        if let Some(id) = self.id_field {
            object = object.with_id(id)?;
        }
        if let Some(catchall) = self.catchall {
            object = object.catchall(catchall.into_schema()?);
        }
        if self.passthrough {
            object = object.passthrough();
        }
        Ok(object)
    }
}

/// First `type` tag in the tree that is not a known node type.
fn unknown_type_name(value: &Value) -> Option<String> {
    let type_name = value.get("type").and_then(Value::as_str)?;
    if !KNOWN_TYPES.contains(&type_name) {
        return Some(type_name.to_string());
    }
    for key in ["inner", "element", "value", "catchall"] {
        if let Some(name) = value.get(key).and_then(unknown_type_name) {
            return Some(name);
        }
    }
    value
        .get("fields")
        .and_then(Value::as_array)?
        .iter()
        .find_map(|field| field.get("schema").and_then(unknown_type_name))
}

impl Schema {
    /// Describe this schema as plain data.
    pub fn to_descriptor(&self) -> SchemaDescriptor {
        match self {
            Schema::Primitive(p) => {
                let meta = p.meta().clone();
                match p.kind() {
                    PrimitiveKind::String => SchemaDescriptor::String { meta },
                    PrimitiveKind::Number => SchemaDescriptor::Number { meta },
                    PrimitiveKind::Boolean => SchemaDescriptor::Boolean { meta },
                }
            }
            Schema::Optional(o) => SchemaDescriptor::Optional {
                inner: Box::new(o.inner().to_descriptor()),
                meta: o.meta().clone(),
            },
            Schema::Object(o) => SchemaDescriptor::Object(o.to_descriptor()),
            Schema::Array(a) => SchemaDescriptor::Array {
                element: Box::new(a.element().to_descriptor()),
                meta: a.meta().clone(),
            },
            Schema::Record(r) => SchemaDescriptor::Record {
                value: Box::new(r.value().to_descriptor()),
                meta: r.meta().clone(),
            },
        }
    }

    pub fn from_descriptor(descriptor: SchemaDescriptor) -> SchemaResult<Schema> {
        descriptor.into_schema()
    }

    /// Decode a descriptor held in a JSON value.
    pub fn from_value(value: Value) -> SchemaResult<Schema> {
        if let Some(type_name) = unknown_type_name(&value) {
            return Err(SchemaError::unsupported_node(type_name));
        }
        let descriptor: SchemaDescriptor = serde_json::from_value(value)?;
        debug!("Decoded schema descriptor");
        descriptor.into_schema()
    }

    pub fn from_json(json: &str) -> SchemaResult<Schema> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Pretty-printed JSON descriptor.
    pub fn to_json(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_descriptor())?)
    }
}

impl ObjectSchema {
    /// Describe this object as plain data. A dangling id field is left out.
    pub fn to_descriptor(&self) -> ObjectDescriptor {
        ObjectDescriptor {
            fields: self
                .shape()
                .iter()
                .map(|(name, schema)| FieldDescriptor {
                    name: name.to_string(),
                    schema: schema.to_descriptor(),
                })
                .collect(),
            layouts: self
                .layouts()
                .map(|(name, layout)| (name.to_string(), layout.clone()))
                .collect(),
            id_field: self.resolved_id_field().map(str::to_string),
            catchall: self
                .catchall_schema()
                .map(|schema| Box::new(schema.to_descriptor())),
            passthrough: self.is_passthrough(),
            meta: self.meta().clone(),
        }
    }
}
