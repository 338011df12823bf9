//! Stateless constructors for every node type.

use crate::schema::{
    ArraySchema, ObjectSchema, PrimitiveKind, PrimitiveSchema, RecordSchema, Schema, Shape,
};

/// A string leaf.
pub fn string() -> Schema {
    PrimitiveSchema::new(PrimitiveKind::String).into()
}

/// A finite number leaf.
pub fn number() -> Schema {
    PrimitiveSchema::new(PrimitiveKind::Number).into()
}

/// A boolean leaf.
pub fn boolean() -> Schema {
    PrimitiveSchema::new(PrimitiveKind::Boolean).into()
}

/// An object with fields in the given order. A repeated name keeps its first
/// position and takes the last schema.
///
/// ```rust
/// use shapeform::{number, object, string};
///
/// let user = object([("id", number()), ("name", string())]);
/// assert_eq!(user.keys(), vec!["id", "name"]);
/// ```
pub fn object<K, V, I>(fields: I) -> ObjectSchema
where
    K: Into<String>,
    V: Into<Schema>,
    I: IntoIterator<Item = (K, V)>,
{
    ObjectSchema::new(fields.into_iter().collect::<Shape>())
}

/// A sequence of `element`.
pub fn array(element: impl Into<Schema>) -> Schema {
    ArraySchema::new(element).into()
}

/// A string-keyed map of `value`.
pub fn record(value: impl Into<Schema>) -> Schema {
    RecordSchema::new(value).into()
}
