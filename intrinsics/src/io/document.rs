//! JSON document loading and writing.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use tracing::debug;

use crate::core::actions::IdRefs;
use crate::core::document::depth;
use crate::core::resource_refs::SupportedResourceReferences;

/// Read and parse a JSON document.
pub fn load_document(path: &Path) -> Result<Value> {
    debug!(path = %path.display(), "loading document");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}

/// Load a derived-reference table (`{"LogicalId": {"Property": "Value"}}`).
pub fn load_resource_refs(path: &Path) -> Result<SupportedResourceReferences> {
    let value = load_document(path)?;
    SupportedResourceReferences::from_value(&value)
        .with_context(|| format!("load resource refs {}", path.display()))
}

/// Load an old-id to new-id remap (`{"OldId": "NewId"}`).
pub fn load_id_refs(path: &Path) -> Result<IdRefs> {
    let value = load_document(path)?;
    let entries = value
        .as_object()
        .ok_or_else(|| anyhow!("id refs {} must be a JSON object", path.display()))?;
    entries
        .iter()
        .map(|(old, new)| match new.as_str() {
            Some(new) => Ok((old.clone(), new.to_string())),
            None => Err(anyhow!("id ref '{}' in {} must map to a string", old, path.display())),
        })
        .collect()
}

/// Fail if `document` is nested deeper than `max_depth`.
pub fn check_depth(document: &Value, max_depth: usize) -> Result<()> {
    let actual = depth(document);
    if actual > max_depth {
        bail!("document depth {} exceeds max_depth {}", actual, max_depth);
    }
    Ok(())
}

/// Serialize `document` as JSON with a trailing newline.
pub fn render_document(document: &Value, pretty: bool) -> Result<String> {
    let mut buf = if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    }
    .context("serialize document")?;
    buf.push('\n');
    Ok(buf)
}

pub fn write_document(path: &Path, document: &Value, pretty: bool) -> Result<()> {
    let buf = render_document(document, pretty)?;
    fs::write(path, buf).with_context(|| format!("write {}", path.display()))
}
