//! Error types for the CLI.
//!
//! Every failure a command can hit maps to one [`CliError`] variant. Data that
//! fails validation is reported through [`CliError::Invalid`], which the binary
//! turns into exit code 2.

use shapeform::{Issue, SchemaError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error reading a schema descriptor or data file.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// The descriptor described an invalid schema.
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// The data did not match the schema.
    #[error("Data does not match the schema ({} issue(s))", .issues.len())]
    Invalid { issues: Vec<Issue> },

    /// A command was used incorrectly (missing layout, existing file, ...).
    #[error("{0}")]
    Usage(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}

/// Error reading an input file.
#[derive(Debug, Error)]
pub enum InputError {
    /// File could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON.
    #[error("Invalid JSON in {path}: {message}")]
    Json { path: PathBuf, message: String },
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid TOML syntax or an unknown value.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    /// Create an invalid JSON error.
    pub fn json(path: PathBuf, message: impl Into<String>) -> Self {
        Self::Json {
            path,
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_error_counts_issues() {
        let error = CliError::Invalid {
            issues: vec![Issue::new("a", "Required"), Issue::new("b", "Required")],
        };
        assert_eq!(error.to_string(), "Data does not match the schema (2 issue(s))");
    }

    #[test]
    fn test_schema_error_converts() {
        let error: CliError = SchemaError::unsupported_node("bigint").into();
        assert_eq!(
            error.to_string(),
            "Invalid schema: unsupported schema node type 'bigint'"
        );
    }
}
