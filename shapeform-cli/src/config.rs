//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `shapeform.toml` files
//! and merging with command-line arguments.

use crate::error::{CliResult, ConfigError};
use serde::Deserialize;
use shapeform::{ArrayErrors, PathStyle, ValidatorOptions};
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "shapeform.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Validation behaviour.
    pub validation: ValidationConfig,

    /// Output formatting.
    pub output: OutputConfig,
}

/// Validation configuration.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// How issue paths are rendered.
    pub path_style: PathStyle,

    /// Whether arrays stop at the first invalid element.
    pub array_errors: ArrayErrors,

    /// Coerce string input for top-level number and boolean fields.
    pub coerce: bool,
}

/// How command results are printed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Colored, human-readable text.
    #[default]
    Pretty,
    /// Machine-readable JSON on stdout.
    Json,
}

/// Output configuration.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Config {
    /// Validator options derived from the `[validation]` table.
    pub fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions::new()
            .with_path_style(self.validation.path_style)
            .with_array_errors(self.validation.array_errors)
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No configuration file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if args.coerce {
            config.validation.coerce = true;
        }

        if let Some(style) = args.path_style {
            config.validation.path_style = style;
        }

        if args.collect_all {
            config.validation.array_errors = ArrayErrors::CollectAll;
        }

        if let Some(format) = args.format {
            config.output.format = format;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# shapeform configuration file

[validation]
# How issue paths are rendered: "bracketed" (items[2].name) or "dotted" (items.2.name)
path_style = "bracketed"

# "first_invalid" stops at the first bad array element, "collect_all" reports every one
array_errors = "first_invalid"

# Convert string input for top-level number and boolean fields
coerce = false

[output]
# "pretty" for colored text, "json" for machine-readable output
format = "pretty"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Force coercion on.
    pub coerce: bool,

    /// Path style override.
    pub path_style: Option<PathStyle>,

    /// Report every invalid array element.
    pub collect_all: bool,

    /// Output format override.
    pub format: Option<OutputFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.validation.path_style, PathStyle::Bracketed);
        assert_eq!(config.validation.array_errors, ArrayErrors::FirstInvalid);
        assert!(!config.validation.coerce);
        assert_eq!(config.output.format, OutputFormat::Pretty);
    }

    #[test]
    fn test_default_content_parses_to_default() {
        let config: Config = toml::from_str(ConfigManager::default_config_content()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_merge_cli_args_overrides() {
        let args = CliArgs {
            coerce: true,
            path_style: Some(PathStyle::Dotted),
            collect_all: true,
            format: Some(OutputFormat::Json),
        };

        let merged = ConfigManager::merge_cli_args(Config::default(), &args);
        assert!(merged.validation.coerce);
        assert_eq!(merged.validation.path_style, PathStyle::Dotted);
        assert_eq!(merged.validation.array_errors, ArrayErrors::CollectAll);
        assert_eq!(merged.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_merge_cli_args_preserves_unset() {
        let mut config = Config::default();
        config.validation.coerce = true;
        config.output.format = OutputFormat::Json;

        let merged = ConfigManager::merge_cli_args(config.clone(), &CliArgs::default());
        assert_eq!(merged, config);
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[validation]
path_style = "dotted"
array_errors = "collect_all"
coerce = true

[output]
format = "json"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.validation.path_style, PathStyle::Dotted);
        assert_eq!(config.validation.array_errors, ArrayErrors::CollectAll);
        assert!(config.validation.coerce);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(
            config.validator_options(),
            ValidatorOptions::new()
                .with_path_style(PathStyle::Dotted)
                .with_array_errors(ArrayErrors::CollectAll)
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[output]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.validation, ValidationConfig::default());
        assert_eq!(config.output.format, OutputFormat::Json);
    }
}
