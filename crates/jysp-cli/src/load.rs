//! # Document Loading
//!
//! Reads schema and data documents from disk and decodes them into the
//! generic [`serde_json::Value`] tree the schema crate works on. The format
//! is chosen by file extension: `.yml`/`.yaml` for YAML, `.json` for JSON.
//!
//! YAML has a richer data model than the tree the validator sees. Tags are
//! dropped, scalar mapping keys are stringified, and anything that has no
//! JSON equivalent (collection keys, non-finite floats) is rejected.
//! Mapping key order is preserved in both formats.

use std::fmt;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use tracing::debug;

/// Supported document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => f.write_str("YAML"),
            Self::Json => f.write_str("JSON"),
        }
    }
}

/// Read and decode the document at `path`.
///
/// # Errors
///
/// Fails if the extension is not supported, the file cannot be read, or
/// its content is not a well-formed document of that format.
pub fn load_document(path: &Path) -> Result<Value> {
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| anyhow!("unsupported file format: {}", path.display()))?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    debug!(path = %path.display(), %format, bytes = content.len(), "loading document");
    parse_document(&content, format)
        .with_context(|| format!("invalid {format} document: {}", path.display()))
}

/// Decode `content` as a document of the given format.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(content)?),
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
            yaml_to_json_value(&yaml)
        }
    }
}

/// Convert a `serde_yaml::Value` tree into a `serde_json::Value` tree.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| anyhow!("cannot represent float {f} in a document tree"))
            } else {
                bail!("unsupported YAML number: {n:?}")
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => bail!("unsupported YAML map key: {other:?}"),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
