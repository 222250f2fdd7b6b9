//! Document-wide intrinsic resolution.
//!
//! All three passes share one pre-order walk. At every node the walk first
//! offers the node itself to the matching handler, then descends into whatever
//! shape the handler returned. Pre-order matters: `{"Ref": "Env"}` has to be
//! replaced as a whole before the walk would otherwise visit `"Env"` as an
//! ordinary child.
//!
//! Handlers are trusted to make progress. Handlers that keep handing a node
//! back and forth between two functions will not terminate, and the
//! walk recurses once per nesting level, so callers feeding untrusted input
//! should bound its depth first (see [`crate::core::document::depth`]).

use std::mem;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::core::actions::{IdRefs, IntrinsicAction};
use crate::core::registry::IntrinsicRegistry;
use crate::core::resource_refs::SupportedResourceReferences;
use crate::error::{Error, Result};

/// Lookup data driving one resolution pass.
pub trait ResolutionData {
    /// An empty table cannot resolve anything, so the walk is skipped.
    fn is_empty(&self) -> bool;
}

impl ResolutionData for Map<String, Value> {
    fn is_empty(&self) -> bool {
        Map::is_empty(self)
    }
}

impl ResolutionData for SupportedResourceReferences {
    fn is_empty(&self) -> bool {
        SupportedResourceReferences::is_empty(self)
    }
}

impl ResolutionData for IdRefs {
    fn is_empty(&self) -> bool {
        IdRefs::is_empty(self)
    }
}

/// Resolves intrinsic functions in a document against parameters, derived
/// resource references or renamed logical ids.
///
/// Every pass takes the document by value, rewrites it in place and returns
/// it. References that cannot be resolved are left exactly as written.
#[derive(Debug, Clone)]
pub struct IntrinsicsResolver {
    parameters: Map<String, Value>,
    registry: IntrinsicRegistry,
}

impl IntrinsicsResolver {
    /// Build a resolver from a parameter table and an optional registry.
    ///
    /// Fails with [`Error::InvalidInput`] if `parameters` is missing or not an
    /// object, and with [`Error::InvalidRegistry`] if a registry binding does
    /// not match its handler. Without a registry the built-ins are used.
    pub fn new(parameters: Option<Value>, registry: Option<IntrinsicRegistry>) -> Result<Self> {
        let parameters = match parameters {
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(Error::InvalidInput(format!(
                    "parameters must be an object, got {}",
                    value_kind(&other)
                )));
            }
            None => {
                return Err(Error::InvalidInput(
                    "parameters are missing".to_string(),
                ));
            }
        };
        let registry = registry.unwrap_or_default();
        registry.validate()?;
        Ok(Self {
            parameters,
            registry,
        })
    }

    pub fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    pub fn registry(&self) -> &IntrinsicRegistry {
        &self.registry
    }

    /// Inline parameter values, e.g. `{"Ref": "Env"}` becomes `"prod"`.
    ///
    /// The result is an inlined view of the template; it should not be fed
    /// back into stages that expect un-inlined intrinsics.
    pub fn resolve_parameter_refs(&self, input: Value) -> Value {
        debug!(parameters = self.parameters.len(), "resolving parameter refs");
        self.traverse(input, &self.parameters, |action, node, parameters| {
            action.resolve_parameter_refs(node, parameters)
        })
    }

    /// Rewrite derived references, e.g. `{"Ref": "MyFn.Alias"}` becomes
    /// `{"Ref": "MyFnAliasLive"}`.
    ///
    /// Pass the whole template on the first call so that references in
    /// sections such as `Outputs` are reached too.
    pub fn resolve_resource_refs(
        &self,
        input: Value,
        refs: &SupportedResourceReferences,
    ) -> Value {
        debug!(logical_ids = refs.len(), "resolving resource refs");
        self.traverse(input, refs, |action, node, refs| {
            action.resolve_resource_refs(node, refs)
        })
    }

    /// Rewrite renamed logical ids, e.g. `{"Ref": "MyLayer"}` becomes
    /// `{"Ref": "MyLayerABC123"}`.
    pub fn resolve_resource_id_refs(&self, input: Value, id_refs: &IdRefs) -> Value {
        debug!(logical_ids = id_refs.len(), "resolving resource id refs");
        self.traverse(input, id_refs, |action, node, id_refs| {
            action.resolve_resource_id_refs(node, id_refs)
        })
    }

    fn traverse<D, F>(&self, input: Value, data: &D, resolve: F) -> Value
    where
        D: ResolutionData + ?Sized,
        F: Fn(&dyn IntrinsicAction, Value, &D) -> Value,
    {
        if data.is_empty() {
            debug!("resolution data is empty, skipping traversal");
            return input;
        }
        self.walk(input, data, &resolve)
    }

    fn walk<D, F>(&self, input: Value, data: &D, resolve: &F) -> Value
    where
        D: ResolutionData + ?Sized,
        F: Fn(&dyn IntrinsicAction, Value, &D) -> Value,
    {
        match self.try_resolve(input, data, resolve) {
            Value::Object(mut map) => {
                for value in map.values_mut() {
                    *value = self.walk(mem::take(value), data, resolve);
                }
                Value::Object(map)
            }
            Value::Array(mut items) => {
                for item in &mut items {
                    *item = self.walk(mem::take(item), data, resolve);
                }
                Value::Array(items)
            }
            leaf => leaf,
        }
    }

    /// Hand `node` to its handler. If the handler returns an intrinsic of a
    /// different function (a `Sub` producing a `Ref`), that one is resolved
    /// here too before the walk descends. The same function is never applied
    /// twice in a row, so remaps do not chain.
    fn try_resolve<D, F>(&self, mut node: Value, data: &D, resolve: &F) -> Value
    where
        D: ResolutionData + ?Sized,
        F: Fn(&dyn IntrinsicAction, Value, &D) -> Value,
    {
        let mut applied: Option<&str> = None;
        while let Some(action) = self.registry.action_for(&node) {
            let name = action.intrinsic_name();
            if applied == Some(name) {
                break;
            }
            trace!(intrinsic = name, "resolving intrinsic");
            node = resolve(action, node, data);
            applied = Some(name);
        }
        node
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::REF;
    use crate::test_support::{
        FixedAction, PanickingAction, RecordingAction, id_refs, resource_refs,
    };
    use std::sync::Arc;
    use serde_json::json;

    fn resolver(parameters: Value) -> IntrinsicsResolver {
        IntrinsicsResolver::new(Some(parameters), None).expect("resolver")
    }

    #[test]
    fn new_rejects_missing_parameters() {
        let err = IntrinsicsResolver::new(None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn new_rejects_non_object_parameters() {
        for parameters in [json!(null), json!([]), json!("Env"), json!(1)] {
            let err = IntrinsicsResolver::new(Some(parameters), None).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
    }

    #[test]
    fn new_rejects_malformed_registry() {
        let mut registry = IntrinsicRegistry::empty();
        registry.insert(REF.to_string(), Arc::new(PanickingAction::new("Other")));
        let err = IntrinsicsResolver::new(Some(json!({})), Some(registry)).unwrap_err();
        assert!(matches!(err, Error::InvalidRegistry(_)));
    }

    #[test]
    fn new_defaults_to_builtin_registry() {
        let resolver = resolver(json!({}));
        assert_eq!(resolver.registry().len(), 3);
    }

    #[test]
    fn resolves_nested_parameter_ref() {
        let out = resolver(json!({"Env": "prod"})).resolve_parameter_refs(json!({"Key": {"Ref": "Env"}}));
        assert_eq!(out, json!({"Key": "prod"}));
    }

    #[test]
    fn root_intrinsic_is_replaced_before_descending() {
        let out = resolver(json!({"Env": "prod"})).resolve_parameter_refs(json!({"Ref": "Env"}));
        assert_eq!(out, json!("prod"));
    }

    #[test]
    fn unresolvable_ref_is_left_unchanged() {
        let out = resolver(json!({"A": "1"})).resolve_parameter_refs(json!({"Ref": "B"}));
        assert_eq!(out, json!({"Ref": "B"}));
    }

    #[test]
    fn multi_key_mapping_is_walked_structurally() {
        let input = json!({"Ref": "A", "Other": 1});
        let out = resolver(json!({"A": "1"})).resolve_parameter_refs(input.clone());
        assert_eq!(out, input);

        let out = resolver(json!({"A": "1"}))
            .resolve_parameter_refs(json!({"Ref": {"Ref": "A"}, "Other": [{"Ref": "A"}]}));
        assert_eq!(out, json!({"Ref": "1", "Other": ["1"]}));
    }

    #[test]
    fn unregistered_single_key_mapping_is_walked_structurally() {
        let out = resolver(json!({"A": "x"}))
            .resolve_parameter_refs(json!({"Fn::Join": ["-", [{"Ref": "A"}, "b"]]}));
        assert_eq!(out, json!({"Fn::Join": ["-", ["x", "b"]]}));
    }

    #[test]
    fn restricted_registry_ignores_other_functions() {
        let registry = IntrinsicRegistry::with_names(&["Fn::Sub"]).expect("registry");
        let resolver = IntrinsicsResolver::new(Some(json!({"A": "x"})), Some(registry)).expect("resolver");
        let out = resolver.resolve_parameter_refs(json!([{"Ref": "A"}, {"Fn::Sub": "${A}"}]));
        assert_eq!(out, json!([{"Ref": "A"}, {"Fn::Sub": "x"}]));
    }

    #[test]
    fn handler_output_intrinsic_is_resolved_in_same_pass() {
        let mut registry = IntrinsicRegistry::default();
        registry.register(FixedAction::new("Fn::Sub", json!({"Ref": "foo"})));
        let resolver =
            IntrinsicsResolver::new(Some(json!({"foo": "bar"})), Some(registry)).expect("resolver");
        let out = resolver.resolve_parameter_refs(json!({"Key": {"Fn::Sub": "anything"}}));
        assert_eq!(out, json!({"Key": "bar"}));
    }

    #[test]
    fn same_function_is_not_reapplied_at_one_node() {
        let out = resolver(json!({"A": {"Ref": "B"}, "B": "b"}))
            .resolve_parameter_refs(json!({"Key": {"Ref": "A"}, "Other": {"Ref": "B"}}));
        assert_eq!(out, json!({"Key": {"Ref": "B"}, "Other": "b"}));
    }

    #[test]
    fn id_remaps_do_not_chain_or_cycle() {
        let remap = id_refs(&[("A", "B"), ("B", "A")]);
        let out = resolver(json!({}))
            .resolve_resource_id_refs(json!([{"Ref": "A"}, {"Ref": "B"}]), &remap);
        assert_eq!(out, json!([{"Ref": "B"}, {"Ref": "A"}]));
    }

    #[test]
    fn nodes_are_dispatched_before_their_children() {
        let recorder = Arc::new(RecordingAction::new(REF));
        let mut registry = IntrinsicRegistry::empty();
        registry.insert(REF.to_string(), recorder.clone());
        let resolver =
            IntrinsicsResolver::new(Some(json!({"X": "x"})), Some(registry)).expect("resolver");

        // Object keys iterate in sorted order, so "Other" is walked first.
        let input = json!({"Ref": {"Ref": "inner"}, "Other": [{"Ref": "last"}]});
        let out = resolver.resolve_parameter_refs(json!({"Ref": input.clone()}));

        assert_eq!(out, json!({"Ref": input}));
        assert_eq!(
            recorder.seen(),
            vec![
                json!({"Ref": {"Ref": {"Ref": "inner"}, "Other": [{"Ref": "last"}]}}),
                json!({"Ref": "last"}),
                json!({"Ref": "inner"}),
            ]
        );
    }

    #[test]
    fn empty_resolution_data_skips_traversal() {
        let mut registry = IntrinsicRegistry::empty();
        registry.register(PanickingAction::new(REF));
        let resolver = IntrinsicsResolver::new(Some(json!({})), Some(registry)).expect("resolver");
        let input = json!({"Key": {"Ref": "A"}});

        assert_eq!(resolver.resolve_parameter_refs(input.clone()), input);
        assert_eq!(
            resolver.resolve_resource_refs(input.clone(), &SupportedResourceReferences::new()),
            input
        );
        assert_eq!(
            resolver.resolve_resource_id_refs(input.clone(), &IdRefs::new()),
            input
        );
    }

    #[test]
    fn resource_refs_resolve_everywhere_in_template() {
        let refs = resource_refs(&[("MyFn", "Alias", "MyFnAliasLive")]);
        let template = json!({
            "Resources": {
                "Perm": {
                    "Type": "AWS::Lambda::Permission",
                    "Properties": {"FunctionName": {"Ref": "MyFn.Alias"}}
                }
            },
            "Outputs": {
                "AliasArn": {"Value": {"Fn::GetAtt": ["MyFn.Alias", "Arn"]}},
                "Url": {"Value": {"Fn::Sub": "${MyFn.Alias}/invoke"}}
            }
        });
        let out = resolver(json!({})).resolve_resource_refs(template, &refs);
        assert_eq!(
            out,
            json!({
                "Resources": {
                    "Perm": {
                        "Type": "AWS::Lambda::Permission",
                        "Properties": {"FunctionName": {"Ref": "MyFnAliasLive"}}
                    }
                },
                "Outputs": {
                    "AliasArn": {"Value": {"Fn::GetAtt": ["MyFnAliasLive", "Arn"]}},
                    "Url": {"Value": {"Fn::Sub": "${MyFnAliasLive}/invoke"}}
                }
            })
        );
    }

    #[test]
    fn id_refs_resolve_inside_sequences() {
        let remap = id_refs(&[("MyLayer", "MyLayerABC123")]);
        let out = resolver(json!({}))
            .resolve_resource_id_refs(json!([{"Ref": "MyLayer"}, "literal"]), &remap);
        assert_eq!(out, json!([{"Ref": "MyLayerABC123"}, "literal"]));
    }
}
