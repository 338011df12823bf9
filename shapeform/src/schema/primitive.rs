//! Leaf nodes.

use crate::meta::FieldMeta;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which primitive a leaf accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// The value a form starts from when nothing else is known.
    pub fn zero_value(&self) -> Value {
        match self {
            Self::String => Value::String(String::new()),
            Self::Number => Value::from(0),
            Self::Boolean => Value::Bool(false),
        }
    }
}

/// A string, number or boolean node.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSchema {
    pub(crate) kind: PrimitiveKind,
    pub(crate) meta: FieldMeta,
}

impl PrimitiveSchema {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            meta: FieldMeta::default(),
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }
}
