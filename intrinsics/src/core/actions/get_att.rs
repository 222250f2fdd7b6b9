//! `Fn::GetAtt` handler.

use serde_json::{Map, Value};

use super::{IdRefs, IntrinsicAction, RESOURCE_REF_SEPARATOR};
use crate::core::document::{argument, intrinsic};
use crate::core::resource_refs::SupportedResourceReferences;

pub const GET_ATT: &str = "Fn::GetAtt";

/// `{"Fn::GetAtt": ["LogicalId", "Attribute"]}`.
///
/// Parameters never appear inside `GetAtt`, so only the two reference modes
/// rewrite anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct GetAttAction;

impl IntrinsicAction for GetAttAction {
    fn intrinsic_name(&self) -> &str {
        GET_ATT
    }

    fn resolve_parameter_refs(&self, input: Value, _parameters: &Map<String, Value>) -> Value {
        input
    }

    /// `["MyFn.Alias", "Arn"]` and `["MyFn", "Alias.Arn"]` are the same
    /// reference; both are normalized to `LogicalId.Property.Rest` before the
    /// lookup and become `["MyFnAliasLive", "Arn"]`.
    fn resolve_resource_refs(&self, input: Value, refs: &SupportedResourceReferences) -> Value {
        let Some(joined) = joined_reference(&input) else {
            return input;
        };
        let mut splits = joined.split(RESOURCE_REF_SEPARATOR);
        let (Some(logical_id), Some(property)) = (splits.next(), splits.next()) else {
            return input;
        };
        let Some(resolved) = refs.get(logical_id, property) else {
            return input;
        };

        let mut rewritten = vec![Value::String(resolved.to_string())];
        rewritten.extend(splits.map(|rest| Value::String(rest.to_string())));
        intrinsic(GET_ATT, Value::Array(rewritten))
    }

    /// `["MyLayer", "Arn"]` becomes `["MyLayerABC123", "Arn"]`.
    fn resolve_resource_id_refs(&self, input: Value, id_refs: &IdRefs) -> Value {
        let Some(Value::Array(items)) = argument(&input, GET_ATT) else {
            return input;
        };
        if items.len() < 2 {
            return input;
        }
        let Some(resolved) = items[0].as_str().and_then(|logical_id| id_refs.get(logical_id)) else {
            return input;
        };

        let mut rewritten = vec![Value::String(resolved.clone())];
        rewritten.extend(items[1..].iter().cloned());
        intrinsic(GET_ATT, Value::Array(rewritten))
    }
}

/// Join a `GetAtt` argument of two or more strings into `LogicalId.Attr.Path`.
fn joined_reference(input: &Value) -> Option<String> {
    let items = argument(input, GET_ATT)?.as_array()?;
    if items.len() < 2 {
        return None;
    }
    let parts = items
        .iter()
        .map(Value::as_str)
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join(&RESOURCE_REF_SEPARATOR.to_string()))
}
