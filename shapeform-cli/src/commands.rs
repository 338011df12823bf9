//! Command implementations, independent of argument parsing and printing.

use crate::config::Config;
use crate::error::{CliError, CliResult, InputError};
use serde::Serialize;
use serde_json::Value;
use shapeform::{FieldMeta, ObjectSchema, Schema, SchemaError};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Read and parse a JSON file.
pub fn load_json(path: &Path) -> CliResult<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| InputError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let value = serde_json::from_str(&content)
        .map_err(|e| InputError::json(path.to_path_buf(), e.to_string()))?;
    Ok(value)
}

/// Load a schema from a JSON descriptor file.
pub fn load_schema(path: &Path) -> CliResult<Schema> {
    let schema = Schema::from_value(load_json(path)?)?;
    info!(path = %path.display(), kind = %schema.schema_type(), "Loaded schema descriptor");
    Ok(schema)
}

fn require_object<'a>(schema: &'a Schema, operation: &str) -> CliResult<&'a ObjectSchema> {
    schema.as_object().ok_or_else(|| {
        SchemaError::NotAnObject {
            operation: operation.to_string(),
            type_name: schema.schema_type().to_string(),
        }
        .into()
    })
}

/// Validate `data`, returning the normalized value.
pub fn check(schema: &Schema, data: &Value, config: &Config) -> CliResult<Value> {
    let options = config.validator_options();
    let validator = if config.validation.coerce {
        require_object(schema, "coercion")?.compile_with_coercion_options(options)
    } else {
        schema.compile_with_options(options)
    };

    validator.parse(data).map_err(|err| CliError::Invalid {
        issues: err.into_issues(),
    })
}

/// Merged metadata per field for an optional partial data snapshot.
pub fn meta(schema: &Schema, partial: Option<&Value>) -> CliResult<BTreeMap<String, FieldMeta>> {
    let object = require_object(schema, "meta")?;
    let empty = Value::Object(Default::default());
    let partial = partial.unwrap_or(&empty);
    Ok(futures::executor::block_on(object.all_merged_meta(partial)))
}

/// One rendered field of a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutColumn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub field: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    pub hidden: bool,
}

/// Names of the layouts registered on the schema.
pub fn layout_names(schema: &Schema) -> CliResult<Vec<String>> {
    let object = require_object(schema, "layout")?;
    Ok(object.layout_names().into_iter().map(str::to_string).collect())
}

/// Resolve a named layout into display columns.
pub fn layout(schema: &Schema, name: &str) -> CliResult<Vec<LayoutColumn>> {
    let object = require_object(schema, "layout")?;
    let layout = object.layout(name).ok_or_else(|| {
        CliError::usage(format!(
            "Layout '{}' not found (available: {})",
            name,
            object.layout_names().join(", ")
        ))
    })?;

    let columns: Vec<LayoutColumn> = layout
        .groups
        .iter()
        .flat_map(|group| {
            group.fields.iter().map(move |field| LayoutColumn {
                group: group.title.clone(),
                field: field.name.clone(),
                title: field.display_title(object.static_meta(&field.name).as_ref()),
                width: field.width,
                hidden: field.hidden,
            })
        })
        .collect();
    debug!(layout = %name, columns = columns.len(), "Resolved layout");
    Ok(columns)
}
