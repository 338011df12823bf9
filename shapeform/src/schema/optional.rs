//! Optional wrapper.

use super::Schema;
use crate::meta::FieldMeta;
use std::sync::Arc;

/// Wraps one node; the value may be absent or `null`.
#[derive(Debug, Clone)]
pub struct OptionalSchema {
    pub(crate) inner: Arc<Schema>,
    pub(crate) meta: FieldMeta,
}

impl OptionalSchema {
    /// Wrap `inner`. An already-optional node is not wrapped twice.
    pub(crate) fn wrap(inner: Arc<Schema>) -> Schema {
        match inner.as_ref() {
            Schema::Optional(_) => (*inner).clone(),
            _ => Schema::Optional(Self {
                inner,
                meta: FieldMeta::default(),
            }),
        }
    }

    /// The wrapped node.
    pub fn inner(&self) -> &Schema {
        &self.inner
    }

    /// Metadata set on the wrapper itself.
    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    /// Inner node metadata overlaid with the wrapper's own.
    pub fn effective_meta(&self) -> FieldMeta {
        self.inner.meta().overlaid_with(&self.meta)
    }
}
