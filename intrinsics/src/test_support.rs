//! Test-only helpers for building resolution data and stub handlers.

use std::cell::RefCell;

use serde_json::{Map, Value};

use crate::core::actions::{IdRefs, IntrinsicAction};
use crate::core::resource_refs::SupportedResourceReferences;

/// Build a derived-reference table from `(logical_id, property, value)` rows.
pub fn resource_refs(rows: &[(&str, &str, &str)]) -> SupportedResourceReferences {
    let mut refs = SupportedResourceReferences::new();
    for (logical_id, property, value) in rows {
        refs.add(logical_id, property, value)
            .expect("test resource reference should be valid");
    }
    refs
}

/// Build an old-id to new-id remap.
pub fn id_refs(rows: &[(&str, &str)]) -> IdRefs {
    rows.iter()
        .map(|(old, new)| (old.to_string(), new.to_string()))
        .collect()
}

/// Handler that fails the test if it is ever invoked.
#[derive(Debug, Clone)]
pub struct PanickingAction {
    name: String,
}

impl PanickingAction {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl IntrinsicAction for PanickingAction {
    fn intrinsic_name(&self) -> &str {
        &self.name
    }

    fn resolve_parameter_refs(&self, _input: Value, _parameters: &Map<String, Value>) -> Value {
        panic!("{} handler must not be invoked", self.name)
    }

    fn resolve_resource_refs(&self, _input: Value, _refs: &SupportedResourceReferences) -> Value {
        panic!("{} handler must not be invoked", self.name)
    }

    fn resolve_resource_id_refs(&self, _input: Value, _id_refs: &IdRefs) -> Value {
        panic!("{} handler must not be invoked", self.name)
    }
}

/// Handler that replaces its node with a fixed value in every mode.
#[derive(Debug, Clone)]
pub struct FixedAction {
    name: String,
    output: Value,
}

impl FixedAction {
    pub fn new(name: &str, output: Value) -> Self {
        Self {
            name: name.to_string(),
            output,
        }
    }
}

impl IntrinsicAction for FixedAction {
    fn intrinsic_name(&self) -> &str {
        &self.name
    }

    fn resolve_parameter_refs(&self, _input: Value, _parameters: &Map<String, Value>) -> Value {
        self.output.clone()
    }

    fn resolve_resource_refs(&self, _input: Value, _refs: &SupportedResourceReferences) -> Value {
        self.output.clone()
    }

    fn resolve_resource_id_refs(&self, _input: Value, _id_refs: &IdRefs) -> Value {
        self.output.clone()
    }
}

/// Handler that records every node it is given and returns it unchanged.
#[derive(Debug, Default)]
pub struct RecordingAction {
    name: String,
    seen: RefCell<Vec<Value>>,
}

impl RecordingAction {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            seen: RefCell::new(Vec::new()),
        }
    }

    /// Nodes received so far, in dispatch order.
    pub fn seen(&self) -> Vec<Value> {
        self.seen.borrow().clone()
    }

    fn record(&self, input: Value) -> Value {
        self.seen.borrow_mut().push(input.clone());
        input
    }
}

impl IntrinsicAction for RecordingAction {
    fn intrinsic_name(&self) -> &str {
        &self.name
    }

    fn resolve_parameter_refs(&self, input: Value, _parameters: &Map<String, Value>) -> Value {
        self.record(input)
    }

    fn resolve_resource_refs(&self, input: Value, _refs: &SupportedResourceReferences) -> Value {
        self.record(input)
    }

    fn resolve_resource_id_refs(&self, input: Value, _id_refs: &IdRefs) -> Value {
        self.record(input)
    }
}
