//! Compile-time options for validators.
//!
//! # Example
//! ```rust
//! use shapeform::{ArrayErrors, PathStyle, ValidatorOptions};
//!
//! let options = ValidatorOptions::new()
//!     .with_path_style(PathStyle::Dotted)
//!     .with_array_errors(ArrayErrors::CollectAll);
//! assert_eq!(options.path_style, PathStyle::Dotted);
//! ```

use serde::{Deserialize, Serialize};

/// How nested issue paths are joined.
///
/// * `Bracketed` - object keys joined with `.`, array indices in brackets:
///   `items[2].name`.
///
/// * `Dotted` - everything joined with `.`: `items.2.name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PathStyle {
    #[default]
    Bracketed,
    Dotted,
}

/// How many element failures an array validator reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArrayErrors {
    /// Stop at the first invalid element.
    #[default]
    FirstInvalid,
    /// Validate every element and report each failure.
    CollectAll,
}

/// Options applied when compiling a schema into a [`Validator`](crate::Validator).
///
/// # Fields
///
/// * `path_style` - How issue paths are rendered. Default: `Bracketed`.
///
/// * `array_errors` - Whether arrays stop at the first invalid element.
///   Default: `FirstInvalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Issue path rendering (default: Bracketed)
    pub path_style: PathStyle,
    /// Array failure reporting (default: FirstInvalid)
    pub array_errors: ArrayErrors,
}

impl ValidatorOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path style.
    pub fn with_path_style(mut self, style: PathStyle) -> Self {
        self.path_style = style;
        self
    }

    /// Set array failure reporting.
    pub fn with_array_errors(mut self, mode: ArrayErrors) -> Self {
        self.array_errors = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ValidatorOptions::default();
        assert_eq!(options.path_style, PathStyle::Bracketed);
        assert_eq!(options.array_errors, ArrayErrors::FirstInvalid);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: ValidatorOptions =
            serde_json::from_str(r#"{"array_errors": "collect_all"}"#).unwrap();
        assert_eq!(options.array_errors, ArrayErrors::CollectAll);
        assert_eq!(options.path_style, PathStyle::Bracketed);
    }
}
