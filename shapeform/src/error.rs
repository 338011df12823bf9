//! Error types for schema construction, validation and metadata resolution.
//!
//! Three families of failure are kept apart:
//!
//! - [`SchemaError`]: defects in how a schema was put together (unknown id
//!   field, unsupported node type in a descriptor, ...). These surface at
//!   definition time, never while validating data.
//! - [`ValidationError`]: the data did not match the schema. Carries one
//!   [`Issue`] per offending path.
//! - [`MetaError`]: a computed metadata hook failed. The resolution service
//!   downgrades these to a warning, so callers of
//!   [`ObjectSchema::all_merged_meta`](crate::ObjectSchema::all_merged_meta)
//!   never see them.
//!
//! # Example
//! ```rust
//! use shapeform::ValidationError;
//!
//! let error = ValidationError::from_messages([
//!     "Property 'email': must be a valid email address",
//!     "something else went wrong",
//! ]);
//! assert_eq!(error.issues()[0].path, "email");
//! assert_eq!(error.issues()[1].path, "root");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Path used for issues that cannot be attributed to a field.
pub const ROOT_PATH: &str = "root";

/// Definition-time schema errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A node type the compiler does not know how to handle.
    #[error("unsupported schema node type '{type_name}'")]
    UnsupportedNode { type_name: String },

    /// An operation referenced a field that is not part of the shape.
    #[error("{operation}: field '{field}' does not exist in the object shape")]
    UnknownField { operation: String, field: String },

    /// `with_id` was given a selector function instead of a field name.
    #[error(
        "with_id: selector functions are not implemented; pass the name of an existing field instead"
    )]
    IdSelectorUnsupported,

    /// An object-only operation was requested on another node type.
    #[error("{operation} requires an object schema, got '{type_name}'")]
    NotAnObject {
        operation: String,
        type_name: String,
    },

    /// A schema descriptor could not be decoded.
    #[error("invalid schema descriptor: {0}")]
    Descriptor(String),
}

impl SchemaError {
    /// Create an UNKNOWN_FIELD error.
    pub fn unknown_field(operation: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            operation: operation.into(),
            field: field.into(),
        }
    }

    /// Create an UNSUPPORTED_NODE error.
    pub fn unsupported_node(type_name: impl Into<String>) -> Self {
        Self::UnsupportedNode {
            type_name: type_name.into(),
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Descriptor(err.to_string())
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    /// Joined path of the offending value (`"root"` for the value itself)
    pub path: String,
    /// Human-readable error message
    pub message: String,
}

impl Issue {
    /// Create a new issue.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an issue attached to the root value.
    pub fn root(message: impl Into<String>) -> Self {
        Self::new(ROOT_PATH, message)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validation failure aggregating every [`Issue`] found in one parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("Validation failed: {}", format_issues(.issues))]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    /// Create a validation error from a list of issues.
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Build a structured error from plain messages.
    ///
    /// Messages of the form `Property '<name>': <message>` are attributed to
    /// `<name>`; anything else lands on the `root` path.
    pub fn from_messages<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let issues = messages
            .into_iter()
            .map(|message| {
                let message = message.as_ref();
                match property_message_regex().captures(message) {
                    Some(caps) => Issue::new(&caps[1], &caps[2]),
                    None => Issue::root(message),
                }
            })
            .collect();
        Self { issues }
    }

    /// All issues in the order they were found.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consume the error, returning its issues.
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// Group messages by path for easier lookup.
    pub fn issues_by_path(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut map: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for issue in &self.issues {
            map.entry(issue.path.as_str())
                .or_default()
                .push(issue.message.as_str());
        }
        map
    }

    /// Paths that failed, deduplicated, in first-seen order.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for issue in &self.issues {
            if !paths.contains(&issue.path.as_str()) {
                paths.push(issue.path.as_str());
            }
        }
        paths
    }
}

fn property_message_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^Property '([^']+)': (.*)$").expect("static pattern is valid")
    })
}

fn format_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(Issue::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure raised while evaluating computed metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaError {
    /// Raised by a computed hook.
    #[error("{0}")]
    Message(String),

    /// A hook failed while resolving a specific field attribute.
    #[error("computing {attribute} for field '{field}' failed: {message}")]
    Computation {
        field: String,
        attribute: &'static str,
        message: String,
    },

    /// Computed metadata was requested for a field that is not in the shape.
    #[error("field '{0}' does not exist in the object shape")]
    UnknownField(String),
}

impl MetaError {
    /// Create an error from a plain message; intended for use inside hooks.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn in_field(self, field: &str, attribute: &'static str) -> Self {
        match self {
            Self::Message(message) => Self::Computation {
                field: field.to_string(),
                attribute,
                message,
            },
            other => other,
        }
    }
}

/// Result type alias for schema definition operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type alias for validation.
pub type ParseResult<T> = Result<T, ValidationError>;

/// Result type alias for computed metadata.
pub type MetaResult<T> = Result<T, MetaError>;
