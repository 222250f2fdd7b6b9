//! Lookup table for references to derived resources.
//!
//! A derived resource is one generated from another, such as the alias of a
//! function or the stage of an API. Templates refer to it as
//! `LogicalId.Property` and this table maps that pair to the value the
//! reference should become.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedResourceReferences {
    refs: BTreeMap<String, BTreeMap<String, String>>,
}

impl SupportedResourceReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `logical_id.property` resolves to `value`.
    ///
    /// Each pair may only be set once.
    pub fn add(&mut self, logical_id: &str, property: &str, value: &str) -> Result<()> {
        if logical_id.is_empty() || property.is_empty() {
            return Err(Error::InvalidResourceReference(
                "logical id and property must be non-empty strings".to_string(),
            ));
        }
        if value.is_empty() {
            return Err(Error::InvalidResourceReference(format!(
                "value for {logical_id}.{property} must be a non-empty string"
            )));
        }

        let properties = self.refs.entry(logical_id.to_string()).or_default();
        if properties.contains_key(property) {
            return Err(Error::InvalidResourceReference(format!(
                "cannot add second reference value to {logical_id}.{property}"
            )));
        }
        properties.insert(property.to_string(), value.to_string());
        Ok(())
    }

    /// True if any property of `logical_id` is registered.
    pub fn has(&self, logical_id: &str) -> bool {
        self.refs.contains_key(logical_id)
    }

    pub fn has_property(&self, logical_id: &str, property: &str) -> bool {
        self.get(logical_id, property).is_some()
    }

    pub fn get(&self, logical_id: &str, property: &str) -> Option<&str> {
        self.refs
            .get(logical_id)?
            .get(property)
            .map(String::as_str)
    }

    /// All properties registered for `logical_id`.
    pub fn get_all(&self, logical_id: &str) -> Option<&BTreeMap<String, String>> {
        self.refs.get(logical_id)
    }

    /// Number of logical ids with at least one property.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Build a table from `{"LogicalId": {"Property": "Value"}}`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let entries = value.as_object().ok_or_else(|| {
            Error::InvalidResourceReference("resource reference table must be an object".to_string())
        })?;

        let mut table = Self::new();
        for (logical_id, properties) in entries {
            let properties = properties.as_object().ok_or_else(|| {
                Error::InvalidResourceReference(format!(
                    "properties of {logical_id} must be an object"
                ))
            })?;
            for (property, resolved) in properties {
                let resolved = resolved.as_str().ok_or_else(|| {
                    Error::InvalidResourceReference(format!(
                        "value for {logical_id}.{property} must be a string"
                    ))
                })?;
                table.add(logical_id, property, resolved)?;
            }
        }
        Ok(table)
    }
}

impl fmt::Display for SupportedResourceReferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (logical_id, properties) in &self.refs {
            for (property, value) in properties {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{logical_id}.{property} -> {value}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_then_get() {
        let mut refs = SupportedResourceReferences::new();
        refs.add("MyFn", "Alias", "MyFnAliasLive").expect("add");
        refs.add("MyFn", "Version", "MyFnVersion1").expect("add");

        assert_eq!(refs.get("MyFn", "Alias"), Some("MyFnAliasLive"));
        assert_eq!(refs.get("MyFn", "Missing"), None);
        assert_eq!(refs.get("Other", "Alias"), None);
        assert!(refs.has("MyFn"));
        assert!(refs.has_property("MyFn", "Version"));
        assert!(!refs.has("Other"));
        assert_eq!(refs.get_all("MyFn").map(BTreeMap::len), Some(2));
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn add_rejects_empty_parts() {
        let mut refs = SupportedResourceReferences::new();
        assert!(matches!(
            refs.add("", "Alias", "x"),
            Err(Error::InvalidResourceReference(_))
        ));
        assert!(matches!(
            refs.add("MyFn", "", "x"),
            Err(Error::InvalidResourceReference(_))
        ));
        assert!(matches!(
            refs.add("MyFn", "Alias", ""),
            Err(Error::InvalidResourceReference(_))
        ));
        assert!(refs.is_empty());
    }

    #[test]
    fn add_rejects_second_value_for_same_pair() {
        let mut refs = SupportedResourceReferences::new();
        refs.add("MyFn", "Alias", "A").expect("add");
        let err = refs.add("MyFn", "Alias", "B").unwrap_err();
        assert!(err.to_string().contains("MyFn.Alias"));
        assert_eq!(refs.get("MyFn", "Alias"), Some("A"));
    }

    #[test]
    fn from_value_loads_nested_table() {
        let refs = SupportedResourceReferences::from_value(&json!({
            "MyFn": {"Alias": "MyFnAliasLive"},
            "MyApi": {"Stage": "MyApiProdStage"}
        }))
        .expect("load");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs.get("MyApi", "Stage"), Some("MyApiProdStage"));
    }

    #[test]
    fn from_value_rejects_non_string_values() {
        let err = SupportedResourceReferences::from_value(&json!({"MyFn": {"Alias": 1}}))
            .unwrap_err();
        assert!(err.to_string().contains("MyFn.Alias"));
    }

    #[test]
    fn display_lists_every_pair() {
        let mut refs = SupportedResourceReferences::new();
        refs.add("B", "P", "v2").expect("add");
        refs.add("A", "P", "v1").expect("add");
        assert_eq!(refs.to_string(), "A.P -> v1, B.P -> v2");
    }
}
