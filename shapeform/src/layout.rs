//! Named layout descriptors for rendering an object schema.
//!
//! Layouts only reference field names; they never change validation. Form
//! layouts hold titled groups of fields, table layouts hold a flat column
//! list. Both are stored as a [`Layout`] made of groups (a table becomes a
//! single untitled group) so shape transformations can filter them without
//! caring which kind they are.
//!
//! # Example
//! ```rust
//! use shapeform::layout::{FormLayout, LayoutField, LayoutGroup, TableLayout};
//!
//! let form = FormLayout::new().group(
//!     LayoutGroup::titled("Contact")
//!         .field("name")
//!         .field(LayoutField::new("email").with_width(6)),
//! );
//! let table = TableLayout::new().field("name").field(LayoutField::new("id").hidden());
//! assert_eq!(form.groups[0].fields.len(), 2);
//! assert!(table.fields[1].hidden);
//! ```

use crate::meta::FieldMeta;
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Kind tag of a stored layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayoutKind {
    Form,
    Table,
    /// Any other consumer-defined kind (e.g. "card", "kanban").
    Custom(String),
}

impl LayoutKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Form => "form",
            Self::Table => "table",
            Self::Custom(name) => name,
        }
    }
}

impl From<String> for LayoutKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "form" => Self::Form,
            "table" => Self::Table,
            _ => Self::Custom(value),
        }
    }
}

impl From<LayoutKind> for String {
    fn from(kind: LayoutKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to one field plus display hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutField {
    /// Field name in the object shape
    pub name: String,
    /// Width hint (grid columns for forms, pixels for tables)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Whether the field is rendered hidden
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl LayoutField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: None,
            hidden: false,
        }
    }

    /// Set the width hint.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Mark as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Title to render for this field: the label from `meta` when present,
    /// otherwise the field name in title case (`createdAt` -> `Created At`).
    pub fn display_title(&self, meta: Option<&FieldMeta>) -> String {
        meta.and_then(|m| m.label.clone())
            .unwrap_or_else(|| self.name.to_case(Case::Title))
    }
}

impl From<&str> for LayoutField {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for LayoutField {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A group of fields inside a layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<LayoutField>,
}

impl LayoutGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group with a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a field.
    pub fn field(mut self, field: impl Into<LayoutField>) -> Self {
        self.fields.push(field.into());
        self
    }
}

/// Input for [`ObjectSchema::with_form_layouts`](crate::ObjectSchema::with_form_layouts).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub groups: Vec<LayoutGroup>,
}

impl FormLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a group.
    pub fn group(mut self, group: LayoutGroup) -> Self {
        self.groups.push(group);
        self
    }
}

/// Input for [`ObjectSchema::with_table_layouts`](crate::ObjectSchema::with_table_layouts).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub fields: Vec<LayoutField>,
}

impl TableLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a column.
    pub fn field(mut self, field: impl Into<LayoutField>) -> Self {
        self.fields.push(field.into());
        self
    }
}

/// A stored layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(rename = "type")]
    pub kind: LayoutKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub groups: Vec<LayoutGroup>,
}

impl Layout {
    /// Create an empty layout of any kind.
    pub fn new(kind: LayoutKind) -> Self {
        Self {
            kind,
            title: None,
            groups: Vec::new(),
        }
    }

    /// Every field reference, across groups, in order.
    pub fn fields(&self) -> impl Iterator<Item = &LayoutField> {
        self.groups.iter().flat_map(|g| g.fields.iter())
    }

    /// Field references not marked hidden.
    pub fn visible_fields(&self) -> impl Iterator<Item = &LayoutField> {
        self.fields().filter(|f| !f.hidden)
    }

    /// Names of every referenced field.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields().map(|f| f.name.as_str()).collect()
    }

    /// True if any group references `name`.
    pub fn references(&self, name: &str) -> bool {
        self.fields().any(|f| f.name == name)
    }

    /// Copy of this layout with references to `removed` filtered out.
    ///
    /// Groups are kept even when they end up empty.
    pub fn without_fields(&self, removed: &HashSet<&str>) -> Layout {
        Layout {
            kind: self.kind.clone(),
            title: self.title.clone(),
            groups: self
                .groups
                .iter()
                .map(|group| LayoutGroup {
                    title: group.title.clone(),
                    description: group.description.clone(),
                    fields: group
                        .fields
                        .iter()
                        .filter(|f| !removed.contains(f.name.as_str()))
                        .cloned()
                        .collect(),
                })
                .collect(),
        }
    }
}

impl From<FormLayout> for Layout {
    fn from(form: FormLayout) -> Self {
        Self {
            kind: LayoutKind::Form,
            title: form.title,
            groups: form.groups,
        }
    }
}

impl From<TableLayout> for Layout {
    fn from(table: TableLayout) -> Self {
        Self {
            kind: LayoutKind::Table,
            title: table.title,
            groups: vec![LayoutGroup {
                title: None,
                description: None,
                fields: table.fields,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_becomes_single_group() {
        let layout: Layout = TableLayout::new().field("a").field("b").into();
        assert_eq!(layout.kind, LayoutKind::Table);
        assert_eq!(layout.groups.len(), 1);
        assert_eq!(layout.field_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_without_fields_keeps_empty_groups() {
        let layout: Layout = FormLayout::new()
            .group(LayoutGroup::titled("One").field("a"))
            .group(LayoutGroup::titled("Two").field("b").field("c"))
            .into();
        let removed: HashSet<&str> = ["a", "c"].into_iter().collect();
        let filtered = layout.without_fields(&removed);

        assert_eq!(filtered.groups.len(), 2);
        assert!(filtered.groups[0].fields.is_empty());
        assert_eq!(filtered.field_names(), vec!["b"]);
        assert_eq!(layout.field_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_kind_round_trips_through_string() {
        assert_eq!(LayoutKind::from("card".to_string()), LayoutKind::Custom("card".into()));
        assert_eq!(String::from(LayoutKind::Form), "form");
    }

    #[test]
    fn test_display_title() {
        let field = LayoutField::new("createdAt");
        assert_eq!(field.display_title(None), "Created At");
        let meta = FieldMeta::new().with_label("Created");
        assert_eq!(field.display_title(Some(&meta)), "Created");
    }

    #[test]
    fn test_visible_fields() {
        let layout: Layout = TableLayout::new()
            .field("id")
            .field(LayoutField::new("secret").hidden())
            .into();
        let visible: Vec<_> = layout.visible_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(visible, vec!["id"]);
    }
}
