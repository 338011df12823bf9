//! Object schemas and the shape transformation engine.
//!
//! An [`ObjectSchema`] owns three side structures next to its shape: static
//! metadata (on each field node), computed metadata hooks (per field name)
//! and named layouts (referencing field names). Every transformation returns
//! a new schema and keeps the side structures consistent with the new shape:
//!
//! | Operation | Shape | Computed hooks | Layouts |
//! |-----------|-------|----------------|---------|
//! | [`omit`](ObjectSchema::omit) | keys removed | entries for removed keys dropped | references to removed keys filtered, groups kept |
//! | [`extend`](ObjectSchema::extend) | keys added / replaced | unchanged | unchanged |
//! | [`partial`](ObjectSchema::partial) | non-optional fields wrapped | unchanged | unchanged |
//! | [`catchall`](ObjectSchema::catchall) | unchanged | unchanged | unchanged |
//! | [`passthrough`](ObjectSchema::passthrough) | unchanged | unchanged | unchanged |
//!
//! Untouched containers are shared between the old and the new schema.

use super::{OptionalSchema, Schema, Shape};
use crate::computed::ComputedMeta;
use crate::config::ValidatorOptions;
use crate::error::{Issue, SchemaError, SchemaResult};
use crate::layout::{FormLayout, Layout, TableLayout};
use crate::meta::FieldMeta;
use crate::validator::{self, Validator};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Whole-object validation hook.
///
/// Runs after every field validated, with the normalized object. Returned
/// issue paths are relative to the object (use a field name, or
/// [`ROOT_PATH`](crate::error::ROOT_PATH) for the object itself).
#[derive(Clone)]
pub struct ObjectCheck {
    inner: Arc<dyn Fn(&Map<String, Value>) -> Vec<Issue> + Send + Sync>,
}

impl ObjectCheck {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Vec<Issue> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    pub(crate) fn run(&self, data: &Map<String, Value>) -> Vec<Issue> {
        (self.inner)(data)
    }
}

impl fmt::Debug for ObjectCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObjectCheck(..)")
    }
}

/// How the identifier of a record is found.
#[derive(Clone)]
pub enum IdSelector {
    /// A field of the shape.
    Field(String),
    /// A function deriving the id from a record. Not supported by
    /// [`ObjectSchema::with_id`].
    Function(Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>),
}

impl IdSelector {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }
}

impl fmt::Debug for IdSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<&str> for IdSelector {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for IdSelector {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

/// An object node.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    shape: Arc<Shape>,
    meta: FieldMeta,
    computed: Arc<BTreeMap<String, ComputedMeta>>,
    layouts: Arc<BTreeMap<String, Arc<Layout>>>,
    id_field: Option<String>,
    catchall: Option<Arc<Schema>>,
    passthrough: bool,
    check: Option<ObjectCheck>,
}

impl ObjectSchema {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape: Arc::new(shape),
            ..Self::default()
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Field names in declaration order.
    pub fn keys(&self) -> Vec<&str> {
        self.shape.keys().collect()
    }

    pub fn field(&self, name: &str) -> Option<&Schema> {
        self.shape.get(name)
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    pub(crate) fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    pub fn catchall_schema(&self) -> Option<&Schema> {
        self.catchall.as_deref()
    }

    pub fn is_passthrough(&self) -> bool {
        self.passthrough
    }

    pub fn check(&self) -> Option<&ObjectCheck> {
        self.check.as_ref()
    }

    // =========================================================================
    // Metadata attachment (same instance)
    // =========================================================================

    /// Attach object-level metadata; values set in `meta` overwrite existing ones.
    pub fn with_meta(mut self, meta: FieldMeta) -> Self {
        self.meta.overlay(&meta);
        self
    }

    /// Wrap in an optional node.
    pub fn optional(self) -> Schema {
        Schema::from(self).optional()
    }

    /// Register computed metadata hooks per field. A later registration for
    /// the same field replaces the earlier one.
    pub fn with_computed<K, I>(mut self, computed: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ComputedMeta)>,
    {
        let map = Arc::make_mut(&mut self.computed);
        for (field, hooks) in computed {
            let field = field.into();
            if !self.shape.contains(&field) {
                warn!(field = %field, "Computed metadata registered for a field outside the shape");
            }
            map.insert(field, hooks);
        }
        self
    }

    /// Install the whole-object validation hook.
    pub fn with_check<F>(mut self, f: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Vec<Issue> + Send + Sync + 'static,
    {
        self.check = Some(ObjectCheck::new(f));
        self
    }

    /// Designate the identifier field used for CRUD matching.
    ///
    /// The field must exist in the shape. Selector functions are not
    /// supported and return [`SchemaError::IdSelectorUnsupported`].
    pub fn with_id(mut self, id: impl Into<IdSelector>) -> SchemaResult<Self> {
        match id.into() {
            IdSelector::Field(name) => {
                if !self.shape.contains(&name) {
                    return Err(SchemaError::unknown_field("with_id", name));
                }
                self.id_field = Some(name);
                Ok(self)
            }
            IdSelector::Function(_) => Err(SchemaError::IdSelectorUnsupported),
        }
    }

    /// The designated id field, even if a later `omit` removed it.
    pub fn id_field(&self) -> Option<&str> {
        self.id_field.as_deref()
    }

    /// The designated id field, only while it still names a shape field.
    pub fn resolved_id_field(&self) -> Option<&str> {
        self.id_field
            .as_deref()
            .filter(|name| self.shape.contains(name))
    }

    /// Extract the id value of a record.
    pub fn id_of<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        let field = self.resolved_id_field()?;
        record.get(field).filter(|v| !v.is_null())
    }

    // =========================================================================
    // Layout registry
    // =========================================================================

    /// Merge form layouts by name; an existing layout of the same name is replaced.
    pub fn with_form_layouts<K, I>(self, layouts: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FormLayout)>,
    {
        self.with_layouts(layouts.into_iter().map(|(k, v)| (k, Layout::from(v))))
    }

    /// Merge table layouts by name; an existing layout of the same name is replaced.
    pub fn with_table_layouts<K, I>(self, layouts: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, TableLayout)>,
    {
        self.with_layouts(layouts.into_iter().map(|(k, v)| (k, Layout::from(v))))
    }

    /// Merge already-built layouts of any kind.
    pub fn with_layouts<K, I>(mut self, layouts: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Layout)>,
    {
        let map = Arc::make_mut(&mut self.layouts);
        for (name, layout) in layouts {
            let name = name.into();
            for field in layout.fields() {
                if !self.shape.contains(&field.name) {
                    warn!(layout = %name, field = %field.name, "Layout references a field outside the shape");
                }
            }
            trace!(layout = %name, kind = %layout.kind, "Registering layout");
            map.insert(name, Arc::new(layout));
        }
        self
    }

    pub fn layout(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(name).map(Arc::as_ref)
    }

    pub fn has_layout(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Layout names in sorted order.
    pub fn layout_names(&self) -> Vec<&str> {
        self.layouts.keys().map(String::as_str).collect()
    }

    pub fn layouts(&self) -> impl Iterator<Item = (&str, &Layout)> {
        self.layouts.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// `(layout, field)` pairs whose field is not in the shape.
    ///
    /// Empty after `omit`; `extend` never introduces any, but layouts
    /// attached by hand can.
    pub fn dangling_layout_fields(&self) -> Vec<(&str, &str)> {
        self.layouts
            .iter()
            .flat_map(|(name, layout)| {
                layout
                    .fields()
                    .filter(|f| !self.shape.contains(&f.name))
                    .map(move |f| (name.as_str(), f.name.as_str()))
            })
            .collect()
    }

    /// Registered computed hooks for one field.
    pub fn computed(&self, field: &str) -> Option<&ComputedMeta> {
        self.computed.get(field)
    }

    pub fn has_computed(&self) -> bool {
        self.computed.values().any(|c| !c.is_empty())
    }

    pub(crate) fn computed_entries(&self) -> &BTreeMap<String, ComputedMeta> {
        &self.computed
    }

    // =========================================================================
    // Shape transformations (new instance)
    // =========================================================================

    /// Remove fields.
    ///
    /// Computed hooks for removed fields are dropped and layouts stop
    /// referencing them. Layout groups that end up empty are kept. The id
    /// field is left as is even when removed; see
    /// [`resolved_id_field`](Self::resolved_id_field).
    pub fn omit<I, S>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requested: Vec<S> = keys.into_iter().collect();
        let removed: HashSet<&str> = requested
            .iter()
            .map(|k| -> &str { k.as_ref() })
            .filter(|k| self.shape.contains(k))
            .collect();

        if removed.len() < requested.len() {
            debug!(
                requested = requested.len(),
                present = removed.len(),
                "omit called with keys outside the shape"
            );
        }

        let shape = Shape::from_entries(
            self.shape
                .entries()
                .iter()
                .filter(|(name, _)| !removed.contains(name.as_str()))
                .cloned()
                .collect(),
        );

        let computed = if self.computed.keys().any(|k| removed.contains(k.as_str())) {
            Arc::new(
                self.computed
                    .iter()
                    .filter(|(k, _)| !removed.contains(k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            )
        } else {
            Arc::clone(&self.computed)
        };

        let layouts = if self
            .layouts
            .values()
            .any(|l| removed.iter().any(|k| l.references(k)))
        {
            Arc::new(
                self.layouts
                    .iter()
                    .map(|(name, layout)| {
                        let layout = if removed.iter().any(|k| layout.references(k)) {
                            Arc::new(layout.without_fields(&removed))
                        } else {
                            Arc::clone(layout)
                        };
                        (name.clone(), layout)
                    })
                    .collect(),
            )
        } else {
            Arc::clone(&self.layouts)
        };

        if let Some(id) = &self.id_field {
            if removed.contains(id.as_str()) {
                warn!(id_field = %id, "omit removed the id field; id lookups will find nothing");
            }
        }

        debug!(removed = ?removed, remaining = shape.len(), "Omitted fields");

        Self {
            shape: Arc::new(shape),
            meta: self.meta.clone(),
            computed,
            layouts,
            id_field: self.id_field.clone(),
            catchall: self.catchall.clone(),
            passthrough: self.passthrough,
            check: self.check.clone(),
        }
    }

    /// Add or replace fields. A replaced field takes the new node along with
    /// its metadata. Computed hooks and layouts are carried over unchanged.
    pub fn extend<K, V, I>(&self, additions: I) -> Self
    where
        K: Into<String>,
        V: Into<Schema>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut shape = (*self.shape).clone();
        let mut added = Vec::new();
        for (name, schema) in additions {
            let name = name.into();
            added.push(name.clone());
            shape.insert_shared(name, Arc::new(schema.into()));
        }
        debug!(added = ?added, total = shape.len(), "Extended shape");

        Self {
            shape: Arc::new(shape),
            ..self.clone()
        }
    }

    /// Make every field optional. Already-optional fields are kept as they are.
    pub fn partial(&self) -> Self {
        let shape = Shape::from_entries(
            self.shape
                .entries()
                .iter()
                .map(|(name, schema)| {
                    let schema = if schema.is_optional() {
                        Arc::clone(schema)
                    } else {
                        Arc::new(OptionalSchema::wrap(Arc::clone(schema)))
                    };
                    (name.clone(), schema)
                })
                .collect(),
        );
        trace!(fields = shape.len(), "Made shape partial");

        Self {
            shape: Arc::new(shape),
            ..self.clone()
        }
    }

    /// Validate undeclared fields against `schema` and keep them.
    ///
    /// Takes precedence over [`passthrough`](Self::passthrough) when
    /// validating; the passthrough flag itself is preserved.
    pub fn catchall(&self, schema: impl Into<Schema>) -> Self {
        Self {
            catchall: Some(Arc::new(schema.into())),
            ..self.clone()
        }
    }

    /// Keep undeclared fields without validating their values.
    pub fn passthrough(&self) -> Self {
        Self {
            passthrough: true,
            ..self.clone()
        }
    }

    // =========================================================================
    // Compilation
    // =========================================================================

    pub fn compile_to_validator(&self) -> Validator {
        self.compile_with_options(ValidatorOptions::default())
    }

    pub fn compile_with_options(&self, options: ValidatorOptions) -> Validator {
        Validator::new(validator::compile_object(self), options)
    }

    /// Compile a validator that coerces string input for top-level number
    /// and boolean fields. Nested objects are not coerced.
    pub fn compile_to_validator_with_coercion(&self) -> Validator {
        self.compile_with_coercion_options(ValidatorOptions::default())
    }

    pub fn compile_with_coercion_options(&self, options: ValidatorOptions) -> Validator {
        Validator::new(validator::compile_object_coercing(self), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::computed::{self, ComputedMeta};
    use crate::layout::{LayoutGroup, TableLayout};
    use crate::{boolean, number, object, string, SchemaType};

    fn person() -> ObjectSchema {
        object([
            ("id", number()),
            ("name", string()),
            ("email", string().optional()),
        ])
    }

    #[test]
    fn test_omit_removes_fields_and_leaves_receiver() {
        let base = person();
        let omitted = base.omit(["email"]);
        assert_eq!(omitted.keys(), vec!["id", "name"]);
        assert_eq!(base.keys(), vec!["id", "name", "email"]);
    }

    #[test]
    fn test_omit_drops_computed_for_removed_keys() {
        let base = person().with_computed([
            ("name", ComputedMeta::new().label(computed::sync(|_| "Name".to_string()))),
            ("email", ComputedMeta::new().label(computed::sync(|_| "Email".to_string()))),
        ]);
        let omitted = base.omit(["email"]);
        assert!(omitted.computed("name").is_some());
        assert!(omitted.computed("email").is_none());
        assert!(base.computed("email").is_some());
    }

    #[test]
    fn test_omit_filters_layouts_and_keeps_empty_groups() {
        let base = person()
            .with_form_layouts([(
                "edit",
                FormLayout::new()
                    .group(LayoutGroup::titled("Identity").field("id").field("name"))
                    .group(LayoutGroup::titled("Contact").field("email")),
            )])
            .with_table_layouts([("list", TableLayout::new().field("name").field("email"))]);

        let omitted = base.omit(["email"]);
        let edit = omitted.layout("edit").unwrap();
        assert_eq!(edit.groups.len(), 2);
        assert!(edit.groups[1].fields.is_empty());
        assert_eq!(omitted.layout("list").unwrap().field_names(), vec!["name"]);
        assert!(omitted.dangling_layout_fields().is_empty());
        assert_eq!(base.layout("list").unwrap().field_names(), vec!["name", "email"]);
    }

    #[test]
    fn test_omit_shares_untouched_layouts() {
        let base = person()
            .with_table_layouts([("ids", TableLayout::new().field("id"))])
            .with_table_layouts([("names", TableLayout::new().field("name"))]);
        let omitted = base.omit(["name"]);
        assert!(Arc::ptr_eq(&base.layouts["ids"], &omitted.layouts["ids"]));
        assert!(!Arc::ptr_eq(&base.layouts["names"], &omitted.layouts["names"]));
    }

    #[test]
    fn test_omit_keeps_dangling_id_field() {
        let base = person().with_id("id").unwrap();
        let omitted = base.omit(["id"]);
        assert_eq!(omitted.id_field(), Some("id"));
        assert_eq!(omitted.resolved_id_field(), None);
        assert_eq!(base.resolved_id_field(), Some("id"));
    }

    #[test]
    fn test_extend_replaces_and_appends() {
        let base = person().with_table_layouts([("list", TableLayout::new().field("name"))]);
        let extended = base.extend([("name", number()), ("active", boolean())]);

        assert_eq!(extended.keys(), vec!["id", "name", "email", "active"]);
        assert_eq!(
            extended.field("name").map(Schema::schema_type),
            Some(SchemaType::Number)
        );
        assert_eq!(extended.layout("list").unwrap().field_names(), vec!["name"]);
        assert!(!extended.layout("list").unwrap().references("active"));
    }

    #[test]
    fn test_partial_wraps_only_required_fields() {
        let base = person();
        let partial = base.partial();
        for name in partial.keys() {
            assert!(partial.field(name).unwrap().is_optional(), "{name} should be optional");
        }
        let email_before = base.shape.entries()[2].1.clone();
        let email_after = partial.shape.entries()[2].1.clone();
        assert!(Arc::ptr_eq(&email_before, &email_after));
    }

    #[test]
    fn test_catchall_after_passthrough_keeps_flag() {
        let schema = person().passthrough().catchall(number());
        assert!(schema.is_passthrough());
        assert_eq!(
            schema.catchall_schema().map(Schema::schema_type),
            Some(SchemaType::Number)
        );
    }

    #[test]
    fn test_with_id_rejects_unknown_field_and_selectors() {
        assert_eq!(
            person().with_id("uuid").unwrap_err(),
            SchemaError::unknown_field("with_id", "uuid")
        );
        let selector = IdSelector::function(|record| record.get("id").cloned());
        assert_eq!(
            person().with_id(selector).unwrap_err(),
            SchemaError::IdSelectorUnsupported
        );
    }

    #[test]
    fn test_id_of() {
        let schema = person().with_id("id").unwrap();
        let record = serde_json::json!({"id": 7, "name": "x"});
        assert_eq!(schema.id_of(&record), Some(&serde_json::json!(7)));
        assert_eq!(schema.id_of(&serde_json::json!({"id": null})), None);
    }

    #[test]
    fn test_layout_accessors() {
        let schema = person()
            .with_table_layouts([("b", TableLayout::new().field("id"))])
            .with_form_layouts([("a", FormLayout::new())]);
        assert_eq!(schema.layout_names(), vec!["a", "b"]);
        assert!(schema.has_layout("a"));
        assert!(!schema.has_layout("c"));
    }

    #[test]
    fn test_later_layout_overwrites_earlier() {
        let schema = person()
            .with_table_layouts([("main", TableLayout::new().field("id"))])
            .with_table_layouts([("main", TableLayout::new().field("name"))]);
        assert_eq!(schema.layout("main").unwrap().field_names(), vec!["name"]);
    }

    #[test]
    fn test_dangling_layout_fields_reports_unknown_refs() {
        let schema = person().with_table_layouts([("t", TableLayout::new().field("ghost"))]);
        assert_eq!(schema.dangling_layout_fields(), vec![("t", "ghost")]);
    }
}
