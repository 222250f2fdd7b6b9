//! Shape helpers for JSON template documents.
//!
//! A document is a plain `serde_json::Value`: objects and arrays are the only
//! structural nodes, everything else is a leaf.

use serde_json::{Map, Value};

/// Return the only key of a single-key object.
///
/// Every intrinsic function is written this way (`{"Ref": "Name"}`), so this is
/// the first check before looking a node up in a registry.
pub fn sole_key(node: &Value) -> Option<&str> {
    let map = node.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.keys().next().map(String::as_str)
}

/// Build a single-key object `{name: argument}`.
pub fn intrinsic(name: &str, argument: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(name.to_string(), argument);
    Value::Object(map)
}

/// Borrow the argument of `node` when it is an intrinsic named `name`.
pub fn argument<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    if sole_key(node)? != name {
        return None;
    }
    node.get(name)
}

pub fn argument_mut<'a>(node: &'a mut Value, name: &str) -> Option<&'a mut Value> {
    if sole_key(node)? != name {
        return None;
    }
    node.get_mut(name)
}

/// Nesting depth of a document. Scalars are 0; a container adds one level.
pub fn depth(node: &Value) -> usize {
    match node {
        Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}
