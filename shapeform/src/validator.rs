//! Validator compiler.
//!
//! A schema tree is compiled once into a tree of checks which then validates
//! and normalizes any number of `serde_json::Value` inputs.
//!
//! Semantics worth knowing:
//!
//! - Objects drop undeclared keys unless a catchall (validated) or the
//!   passthrough flag (unvalidated) keeps them. Catchall wins when both are set.
//! - Optional fields accept absence and explicit `null`. An absent key stays
//!   absent in the output and an explicit `null` is kept.
//! - Coercing validators convert strings for top-level number and boolean
//!   fields only.
//!
//! # Example
//! ```rust
//! use serde_json::json;
//! use shapeform::{number, object, string};
//!
//! let user = object([("id", number()), ("name", string())]);
//! let validator = user.compile_to_validator();
//!
//! let parsed = validator.parse(&json!({"id": 1, "name": "a", "extra": true})).unwrap();
//! assert_eq!(parsed, json!({"id": 1, "name": "a"}));
//!
//! let err = validator.parse(&json!({"name": 5})).unwrap_err();
//! assert_eq!(err.issues()[0].path, "id");
//! ```

use crate::config::{ArrayErrors, PathStyle, ValidatorOptions};
use crate::error::{Issue, ParseResult, ValidationError, ROOT_PATH};
use crate::schema::{ObjectCheck, ObjectSchema, PrimitiveKind, Schema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::{debug, trace};

/// Compiled check tree.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    String,
    Number,
    Boolean,
    Optional(Box<Node>),
    Object(ObjectNode),
    Array(Box<Node>),
    Record(Box<Node>),
    CoerceNumber,
    CoerceBoolean,
}

#[derive(Debug, Clone)]
pub(crate) struct ObjectNode {
    fields: Vec<(String, Node)>,
    unknown: UnknownKeys,
    check: Option<ObjectCheck>,
}

#[derive(Debug, Clone)]
enum UnknownKeys {
    Strip,
    Passthrough,
    Catchall(Box<Node>),
}

pub(crate) fn compile(schema: &Schema) -> Node {
    match schema {
        Schema::Primitive(p) => match p.kind() {
            PrimitiveKind::String => Node::String,
            PrimitiveKind::Number => Node::Number,
            PrimitiveKind::Boolean => Node::Boolean,
        },
        Schema::Optional(o) => Node::Optional(Box::new(compile(o.inner()))),
        Schema::Object(o) => compile_object(o),
        Schema::Array(a) => Node::Array(Box::new(compile(a.element()))),
        Schema::Record(r) => Node::Record(Box::new(compile(r.value()))),
    }
}

pub(crate) fn compile_object(object: &ObjectSchema) -> Node {
    build_object(object, compile)
}

pub(crate) fn compile_object_coercing(object: &ObjectSchema) -> Node {
    build_object(object, |schema| coerce_field(compile(schema)))
}

fn build_object(object: &ObjectSchema, field: impl Fn(&Schema) -> Node) -> Node {
    let unknown = match (object.catchall_schema(), object.is_passthrough()) {
        (Some(catchall), _) => UnknownKeys::Catchall(Box::new(compile(catchall))),
        (None, true) => UnknownKeys::Passthrough,
        (None, false) => UnknownKeys::Strip,
    };
    Node::Object(ObjectNode {
        fields: object
            .shape()
            .iter()
            .map(|(name, schema)| (name.to_string(), field(schema)))
            .collect(),
        unknown,
        check: object.check().cloned(),
    })
}

/// Swap number/boolean leaves (optionally wrapped) for their coercing form.
fn coerce_field(node: Node) -> Node {
    match node {
        Node::Number => Node::CoerceNumber,
        Node::Boolean => Node::CoerceBoolean,
        Node::Optional(inner) => Node::Optional(Box::new(coerce_field(*inner))),
        other => other,
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Key(String),
    Index(usize),
}

struct Run<'a> {
    options: &'a ValidatorOptions,
    path: Vec<Segment>,
    issues: Vec<Issue>,
}

impl Run<'_> {
    fn render_path(&self) -> String {
        if self.path.is_empty() {
            return ROOT_PATH.to_string();
        }
        let mut out = String::new();
        for segment in &self.path {
            match (segment, self.options.path_style) {
                (Segment::Key(key), _) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                (Segment::Index(i), PathStyle::Bracketed) => {
                    out.push_str(&format!("[{}]", i));
                }
                (Segment::Index(i), PathStyle::Dotted) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(&i.to_string());
                }
            }
        }
        out
    }

    fn issue(&mut self, message: impl Into<String>) {
        let path = self.render_path();
        self.issues.push(Issue::new(path, message));
    }

    fn expected(&mut self, expected: &str, value: &Value) {
        self.issue(format!("Expected {}, received {}", expected, describe(value)));
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Node {
    fn run(&self, value: &Value, run: &mut Run<'_>) -> Option<Value> {
        match self {
            Node::String => match value {
                Value::String(_) => Some(value.clone()),
                other => {
                    run.expected("string", other);
                    None
                }
            },
            // serde_json numbers are always finite
            Node::Number => match value {
                Value::Number(_) => Some(value.clone()),
                other => {
                    run.expected("number", other);
                    None
                }
            },
            Node::Boolean => match value {
                Value::Bool(_) => Some(value.clone()),
                other => {
                    run.expected("boolean", other);
                    None
                }
            },
            Node::Optional(inner) => match value {
                Value::Null => Some(Value::Null),
                other => inner.run(other, run),
            },
            Node::Object(object) => object.run(value, run),
            Node::Array(element) => {
                let Value::Array(items) = value else {
                    run.expected("array", value);
                    return None;
                };
                let mut out = Vec::with_capacity(items.len());
                let mut ok = true;
                for (i, item) in items.iter().enumerate() {
                    run.path.push(Segment::Index(i));
                    let result = element.run(item, run);
                    run.path.pop();
                    match result {
                        Some(v) => out.push(v),
                        None => {
                            ok = false;
                            if run.options.array_errors == ArrayErrors::FirstInvalid {
                                break;
                            }
                        }
                    }
                }
                ok.then_some(Value::Array(out))
            }
            Node::Record(value_node) => {
                let Value::Object(map) = value else {
                    run.expected("object", value);
                    return None;
                };
                let mut out = Map::new();
                let mut ok = true;
                for (key, item) in map {
                    run.path.push(Segment::Key(key.clone()));
                    match value_node.run(item, run) {
                        Some(v) => {
                            out.insert(key.clone(), v);
                        }
                        None => ok = false,
                    }
                    run.path.pop();
                }
                ok.then_some(Value::Object(out))
            }
            Node::CoerceNumber => match value {
                Value::Number(_) => Some(value.clone()),
                Value::String(s) => match coerce_number(s) {
                    Some(n) => Some(Value::Number(n)),
                    None => {
                        run.issue(format!("Expected number, received '{}'", s));
                        None
                    }
                },
                other => {
                    run.expected("number", other);
                    None
                }
            },
            Node::CoerceBoolean => match value {
                Value::Bool(_) => Some(value.clone()),
                Value::String(s) => match s.to_ascii_lowercase().as_str() {
                    "true" | "1" => Some(Value::Bool(true)),
                    "false" | "0" => Some(Value::Bool(false)),
                    _ => {
                        run.issue(format!("Expected boolean, received '{}'", s));
                        None
                    }
                },
                other => {
                    run.expected("boolean", other);
                    None
                }
            },
        }
    }
}

impl ObjectNode {
    fn run(&self, value: &Value, run: &mut Run<'_>) -> Option<Value> {
        let Value::Object(map) = value else {
            run.expected("object", value);
            return None;
        };

        let mut out = Map::new();
        let mut ok = true;

        for (name, node) in &self.fields {
            run.path.push(Segment::Key(name.clone()));
            match (map.get(name), node) {
                (None, Node::Optional(_)) => {}
                (None, _) => {
                    run.issue("Required");
                    ok = false;
                }
                (Some(field_value), _) => match node.run(field_value, run) {
                    Some(v) => {
                        out.insert(name.clone(), v);
                    }
                    None => ok = false,
                },
            }
            run.path.pop();
        }

        for (key, extra) in map {
            if self.fields.iter().any(|(name, _)| name == key) {
                continue;
            }
            match &self.unknown {
                UnknownKeys::Strip => {}
                UnknownKeys::Passthrough => {
                    out.insert(key.clone(), extra.clone());
                }
                UnknownKeys::Catchall(node) => {
                    run.path.push(Segment::Key(key.clone()));
                    match node.run(extra, run) {
                        Some(v) => {
                            out.insert(key.clone(), v);
                        }
                        None => ok = false,
                    }
                    run.path.pop();
                }
            }
        }

        if !ok {
            return None;
        }

        if let Some(check) = &self.check {
            let issues = check.run(&out);
            if !issues.is_empty() {
                for issue in issues {
                    if issue.path == ROOT_PATH || issue.path.is_empty() {
                        run.issue(issue.message);
                    } else {
                        run.path.push(Segment::Key(issue.path));
                        run.issue(issue.message);
                        run.path.pop();
                    }
                }
                return None;
            }
        }

        Some(Value::Object(out))
    }
}

/// Parse a string as a finite number, preferring an integer representation.
fn coerce_number(s: &str) -> Option<Number> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(Number::from(u));
    }
    let f = s.parse::<f64>().ok()?;
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        return Some(Number::from(f as i64));
    }
    Number::from_f64(f)
}

/// Serializable outcome of [`Validator::safe_parse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

/// An executable validator compiled from a schema.
#[derive(Debug, Clone)]
pub struct Validator {
    root: Node,
    options: ValidatorOptions,
}

impl Validator {
    pub(crate) fn new(root: Node, options: ValidatorOptions) -> Self {
        Self { root, options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Validate and normalize `value`.
    pub fn parse(&self, value: &Value) -> ParseResult<Value> {
        let mut run = Run {
            options: &self.options,
            path: Vec::new(),
            issues: Vec::new(),
        };
        match self.root.run(value, &mut run) {
            Some(out) if run.issues.is_empty() => {
                trace!("Validation passed");
                Ok(out)
            }
            _ => {
                let paths: Vec<_> = run.issues.iter().map(|i| i.path.as_str()).collect();
                debug!(error_count = run.issues.len(), paths = ?paths, "Validation failed");
                Err(ValidationError::new(run.issues))
            }
        }
    }

    /// Like [`parse`](Self::parse) but never fails; the outcome carries either
    /// the data or the issues.
    pub fn safe_parse(&self, value: &Value) -> ParseOutcome {
        match self.parse(value) {
            Ok(data) => ParseOutcome {
                success: true,
                data: Some(data),
                issues: Vec::new(),
            },
            Err(err) => ParseOutcome {
                success: false,
                data: None,
                issues: err.into_issues(),
            },
        }
    }

    /// Parse, then deserialize the normalized value into `T`.
    pub fn parse_as<T: DeserializeOwned>(&self, value: &Value) -> ParseResult<T> {
        let normalized = self.parse(value)?;
        serde_json::from_value(normalized)
            .map_err(|e| ValidationError::new(vec![Issue::root(e.to_string())]))
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.parse(value).is_ok()
    }
}
