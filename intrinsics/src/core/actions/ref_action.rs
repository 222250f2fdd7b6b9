//! `Ref` handler.

use serde_json::{Map, Value};

use super::{IdRefs, IntrinsicAction, parse_resource_reference};
use crate::core::document::{argument, intrinsic};
use crate::core::resource_refs::SupportedResourceReferences;

pub const REF: &str = "Ref";

/// `{"Ref": "Name"}`: a reference to a parameter or a resource logical id.
#[derive(Debug, Default, Clone, Copy)]
pub struct RefAction;

impl IntrinsicAction for RefAction {
    fn intrinsic_name(&self) -> &str {
        REF
    }

    /// `{"Ref": "Env"}` with `Env = "prod"` becomes `"prod"`.
    fn resolve_parameter_refs(&self, input: Value, parameters: &Map<String, Value>) -> Value {
        let Some(name) = argument(&input, REF).and_then(Value::as_str) else {
            return input;
        };
        match parameters.get(name) {
            Some(value) => value.clone(),
            None => input,
        }
    }

    /// `{"Ref": "MyFn.Alias"}` becomes `{"Ref": "MyFnAliasLive"}`.
    fn resolve_resource_refs(&self, input: Value, refs: &SupportedResourceReferences) -> Value {
        let Some((logical_id, property)) = argument(&input, REF)
            .and_then(Value::as_str)
            .and_then(parse_resource_reference)
        else {
            return input;
        };
        match refs.get(logical_id, property) {
            Some(resolved) => intrinsic(REF, Value::String(resolved.to_string())),
            None => input,
        }
    }

    /// `{"Ref": "MyLayer"}` becomes `{"Ref": "MyLayerABC123"}`.
    fn resolve_resource_id_refs(&self, input: Value, id_refs: &IdRefs) -> Value {
        let Some(logical_id) = argument(&input, REF).and_then(Value::as_str) else {
            return input;
        };
        match id_refs.get(logical_id) {
            Some(resolved) => intrinsic(REF, Value::String(resolved.clone())),
            None => input,
        }
    }
}
