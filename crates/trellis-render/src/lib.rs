//! Encoders over built value trees.
//!
//! The build engine hands back a plain [`Value`] and has no opinion on
//! output; this crate turns one into text, JSON or YAML. Hosts pick a
//! format with [`OutputFormat`]; JSON is the default.

use thiserror::Error;
use trellis_engine::Value;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Output encodings a host can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Text,
    #[default]
    Json,
    Yaml,
}

/// Encode a value in the requested format.
pub fn encode(value: &Value, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Text => Ok(to_text(value)),
        OutputFormat::Json => to_json(value),
        OutputFormat::Yaml => to_yaml(value),
    }
}

/// Plain-text rendering, the value's `Display` form.
pub fn to_text(value: &Value) -> String {
    value.to_string()
}

pub fn to_json(value: &Value) -> Result<String, RenderError> {
    Ok(serde_json::to_string(value)?)
}

pub fn to_yaml(value: &Value) -> Result<String, RenderError> {
    Ok(serde_yaml::to_string(value)?)
}
