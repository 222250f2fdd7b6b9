//! `Fn::Sub` handler.
//!
//! Only `${Name}` placeholders inside the template string are rewritten. The
//! node always stays a `Fn::Sub`; the variable map of the array form is left to
//! the structural walk.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use super::{IdRefs, IntrinsicAction, RESOURCE_REF_SEPARATOR};
use crate::core::document::argument_mut;
use crate::core::resource_refs::SupportedResourceReferences;

pub const SUB: &str = "Fn::Sub";

// `${!Literal}` escapes never match.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z0-9.]+|AWS::[A-Z][A-Za-z]*)\}")
        .expect("placeholder pattern should be valid")
});

/// `{"Fn::Sub": "arn:${AWS::Partition}:s3:::${Bucket}"}` or
/// `{"Fn::Sub": ["${Name}-x", {"Name": ...}]}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubAction;

impl SubAction {
    /// Run `replace(full_placeholder, name)` over every placeholder of the
    /// template string. `None` keeps the placeholder as written.
    fn substitute<F>(&self, mut input: Value, replace: F) -> Value
    where
        F: Fn(&str, &str) -> Option<String>,
    {
        let Some(template) = argument_mut(&mut input, SUB) else {
            return input;
        };
        let text = match template {
            Value::String(text) => text,
            Value::Array(items) => match items.first_mut() {
                Some(Value::String(text)) => text,
                _ => return input,
            },
            _ => return input,
        };
        *text = substitute_all(text, &replace);
        input
    }
}

impl IntrinsicAction for SubAction {
    fn intrinsic_name(&self) -> &str {
        SUB
    }

    fn resolve_parameter_refs(&self, input: Value, parameters: &Map<String, Value>) -> Value {
        self.substitute(input, |_, name| parameters.get(name).and_then(render_scalar))
    }

    /// `${MyFn.Alias}` becomes `${MyFnAliasLive}` and `${MyFn.Alias.Arn}`
    /// becomes `${MyFnAliasLive.Arn}`.
    fn resolve_resource_refs(&self, input: Value, refs: &SupportedResourceReferences) -> Value {
        self.substitute(input, |_, name| {
            let mut parts = name.splitn(3, RESOURCE_REF_SEPARATOR);
            let (Some(logical_id), Some(property)) = (parts.next(), parts.next()) else {
                return None;
            };
            let resolved = refs.get(logical_id, property)?;
            Some(match parts.next() {
                Some(rest) => format!("${{{}{}{}}}", resolved, RESOURCE_REF_SEPARATOR, rest),
                None => format!("${{{}}}", resolved),
            })
        })
    }

    /// `${MyLayer}` becomes `${MyLayerABC123}`; `${MyLayer.Arn}` keeps `.Arn`.
    fn resolve_resource_id_refs(&self, input: Value, id_refs: &IdRefs) -> Value {
        self.substitute(input, |_, name| {
            let logical_id = name
                .split(RESOURCE_REF_SEPARATOR)
                .next()
                .unwrap_or(name);
            let resolved = id_refs.get(logical_id)?;
            Some(format!("${{{}{}}}", resolved, &name[logical_id.len()..]))
        })
    }
}

fn substitute_all<F>(text: &str, replace: &F) -> String
where
    F: Fn(&str, &str) -> Option<String>,
{
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures| {
            let full = &caps[0];
            replace(full, &caps[1]).unwrap_or_else(|| full.to_string())
        })
        .into_owned()
}

/// Text form of a parameter value that can be spliced into a string.
fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
