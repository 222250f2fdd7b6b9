//! Intrinsic function handlers.
//!
//! Each handler owns one function name and knows how to rewrite a node of that
//! name in the three resolution modes. Handlers are total: when a reference
//! cannot be resolved they hand the node back untouched.

mod get_att;
mod ref_action;
mod sub;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::core::resource_refs::SupportedResourceReferences;

pub use get_att::{GET_ATT, GetAttAction};
pub use ref_action::{REF, RefAction};
pub use sub::{SUB, SubAction};

/// Old logical id to new logical id.
pub type IdRefs = HashMap<String, String>;

/// Separator between a logical id and a derived property (`MyFunction.Alias`).
pub const RESOURCE_REF_SEPARATOR: char = '.';

/// Capability implemented by every intrinsic function handler.
///
/// `input` is the whole intrinsic node (`{"<name>": argument}`). The returned
/// value replaces it in the document and may itself contain intrinsics.
pub trait IntrinsicAction {
    /// Function name this handler is keyed by, e.g. `Ref`.
    fn intrinsic_name(&self) -> &str;

    /// Inline template parameter values.
    fn resolve_parameter_refs(&self, input: Value, parameters: &Map<String, Value>) -> Value;

    /// Rewrite references to derived resources (`MyFunction.Alias`).
    fn resolve_resource_refs(&self, input: Value, refs: &SupportedResourceReferences) -> Value;

    /// Rewrite references to logical ids that were renamed.
    fn resolve_resource_id_refs(&self, input: Value, id_refs: &IdRefs) -> Value;
}

/// The built-in handlers, in registration order.
pub fn builtin_actions() -> Vec<Arc<dyn IntrinsicAction>> {
    vec![
        Arc::new(RefAction),
        Arc::new(SubAction),
        Arc::new(GetAttAction),
    ]
}

/// Split `LogicalId.Property` on the first separator.
///
/// Returns `None` when there is no separator or either half is empty.
pub fn parse_resource_reference(value: &str) -> Option<(&str, &str)> {
    let (logical_id, property) = value.split_once(RESOURCE_REF_SEPARATOR)?;
    if logical_id.is_empty() || property.is_empty() {
        return None;
    }
    Some((logical_id, property))
}
