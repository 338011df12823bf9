//! Ordered field-name to node mapping owned by an object schema.

use super::Schema;
use std::sync::Arc;

/// Ordered, name-unique list of fields.
///
/// Nodes are reference counted so derived schemas share every field they do
/// not change.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    entries: Vec<(String, Arc<Schema>)>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.insert(name, schema);
        self
    }

    /// Insert a field. An existing field of the same name is replaced in
    /// place and keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, schema: impl Into<Schema>) {
        self.insert_shared(name.into(), Arc::new(schema.into()));
    }

    pub(crate) fn insert_shared(&mut self, name: String, schema: Arc<Schema>) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = schema,
            None => self.entries.push((name, schema)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Field names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s.as_ref()))
    }

    pub(crate) fn entries(&self) -> &[(String, Arc<Schema>)] {
        &self.entries
    }

    pub(crate) fn from_entries(entries: Vec<(String, Arc<Schema>)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Shape
where
    K: Into<String>,
    V: Into<Schema>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut shape = Shape::new();
        for (name, schema) in iter {
            shape.insert(name, schema);
        }
        shape
    }
}

impl IntoIterator for Shape {
    type Item = (String, Schema);
    type IntoIter = std::vec::IntoIter<(String, Schema)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .into_iter()
            .map(|(name, schema)| {
                let schema = Arc::try_unwrap(schema).unwrap_or_else(|shared| (*shared).clone());
                (name, schema)
            })
            .collect::<Vec<_>>()
            .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{number, string};

    #[test]
    fn test_insert_replaces_in_place() {
        let mut shape = Shape::new().with("a", string()).with("b", string());
        shape.insert("a", number());

        assert_eq!(shape.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(
            shape.get("a").map(Schema::schema_type),
            Some(crate::SchemaType::Number)
        );
    }

    #[test]
    fn test_from_iter_keeps_order() {
        let shape: Shape = [("z", string()), ("a", number())].into_iter().collect();
        assert_eq!(shape.keys().collect::<Vec<_>>(), vec!["z", "a"]);
        assert_eq!(shape.len(), 2);
        assert!(shape.contains("z"));
        assert!(!shape.contains("missing"));
    }
}
