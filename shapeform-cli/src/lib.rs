//! # shapeform-cli
//!
//! CLI library for checking JSON data against shapeform schema descriptors
//! and inspecting their metadata and layouts.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`commands`] - `check`, `meta` and `layout` implementations
//! - [`writer`] - File output and dry-run support
//! - [`error`] - Error types and handling

pub mod commands;
pub mod config;
pub mod error;
pub mod writer;

pub use config::{Config, ConfigManager, OutputFormat};
pub use error::{CliError, CliResult};
pub use writer::{FileWriter, WriteResult};
