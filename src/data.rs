//! Structured-data files: TOML, JSON and YAML into [`Meta`].
//!
//! Metadata and defaults files go through this module, and the project config
//! shares its [`DataFormat`] extension mapping. The document's top level must
//! be a table/object.

use crate::meta::Meta;
use serde_json::{Number, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported data format: {0:?}")]
    UnsupportedFormat(String),
    #[error("top level of a data file must be a table, found {0}")]
    NotATable(&'static str),
}

/// Supported structured-data formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Toml,
    Json,
    Yaml,
}

impl DataFormat {
    /// Match a file extension (without the dot, case-insensitive).
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Read and parse the data file at `path`.
pub fn load_data_file(path: &Path) -> Result<Meta, DataError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    let format =
        DataFormat::from_ext(&ext).ok_or_else(|| DataError::UnsupportedFormat(ext.clone()))?;
    let text = fs::read_to_string(path)?;
    parse_data(format, &text)
}

/// Parse `text` as `format`. Blank input is an empty table.
pub fn parse_data(format: DataFormat, text: &str) -> Result<Meta, DataError> {
    if text.trim().is_empty() {
        return Ok(Meta::new());
    }
    let value = match format {
        DataFormat::Toml => toml_to_json(toml::from_str::<toml::Value>(text)?),
        DataFormat::Json => serde_json::from_str::<Value>(text)?,
        DataFormat::Yaml => serde_yaml::from_str::<Value>(text)?,
    };
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Null => Ok(Meta::new()),
        other => Err(DataError::NotATable(value_kind(&other))),
    }
}

/// TOML datetimes become their RFC 3339 string form rather than the
/// serializer's private wrapper table.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}
