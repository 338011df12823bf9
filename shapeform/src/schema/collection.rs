//! Array and record nodes.

use super::Schema;
use crate::meta::FieldMeta;
use std::sync::Arc;

/// A sequence of one element type.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    pub(crate) element: Arc<Schema>,
    pub(crate) meta: FieldMeta,
}

impl ArraySchema {
    pub fn new(element: impl Into<Schema>) -> Self {
        Self {
            element: Arc::new(element.into()),
            meta: FieldMeta::default(),
        }
    }

    pub fn element(&self) -> &Schema {
        &self.element
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }
}

/// A mapping from arbitrary string keys to one value type.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub(crate) value: Arc<Schema>,
    pub(crate) meta: FieldMeta,
}

impl RecordSchema {
    pub fn new(value: impl Into<Schema>) -> Self {
        Self {
            value: Arc::new(value.into()),
            meta: FieldMeta::default(),
        }
    }

    pub fn value(&self) -> &Schema {
        &self.value
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }
}
