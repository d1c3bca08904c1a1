//! JSON / YAML serialization of the documentation model and atomic output writing.

use crate::model::{ApiDeclaration, ResourceListing};
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const JSON_INDENT: &[u8] = b"    ";

/// Serializes a value to JSON indented with four spaces.
///
/// Object keys come out in struct declaration order, so the output is stable for a given
/// model.
///
/// # Errors
///
/// Returns an error if the value cannot be represented as JSON.
pub fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize documentation to JSON")?;
    String::from_utf8(buffer).context("Serialized JSON is not valid UTF-8")
}

/// The whole documentation set as one document, for the `json` and `yaml` output formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecBundle {
    pub resource_listing: ResourceListing,
    pub api_declarations: BTreeMap<String, ApiDeclaration>,
}

pub fn serialize_json(bundle: &SpecBundle) -> Result<String> {
    debug!("Serializing documentation bundle to JSON");
    to_indented_json(bundle)
}

pub fn serialize_yaml(bundle: &SpecBundle) -> Result<String> {
    debug!("Serializing documentation bundle to YAML");
    serde_yaml::to_string(bundle).context("Failed to serialize documentation to YAML")
}

/// Writes `content` to `path` atomically.
///
/// The content goes to a temporary file in the destination directory which then replaces
/// `path`, so readers never observe a partially written file. Parent directories are
/// created as needed.
///
/// # Errors
///
/// Returns an error if the directory, the temporary file or the final rename fails.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing {} bytes to {}", content.len(), path.display());

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let mut temp_file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    temp_file
        .write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    Ok(())
}
