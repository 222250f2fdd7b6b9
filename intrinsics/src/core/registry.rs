//! Function name to handler bindings.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::core::actions::{IntrinsicAction, builtin_actions};
use crate::core::document::sole_key;
use crate::error::{Error, Result};

/// Set of intrinsic functions a resolver understands.
///
/// `Default` registers `Ref`, `Fn::Sub` and `Fn::GetAtt`.
#[derive(Clone)]
pub struct IntrinsicRegistry {
    actions: BTreeMap<String, Arc<dyn IntrinsicAction>>,
}

impl Default for IntrinsicRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for action in builtin_actions() {
            registry.insert(action.intrinsic_name().to_string(), action);
        }
        registry
    }
}

impl IntrinsicRegistry {
    pub fn empty() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    /// Registry restricted to the named built-in handlers.
    pub fn with_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let builtins = Self::default();
        let mut registry = Self::empty();
        for name in names {
            let name = name.as_ref();
            let action = builtins
                .actions
                .get(name)
                .ok_or_else(|| Error::UnknownIntrinsic(name.to_string()))?;
            registry.insert(name.to_string(), Arc::clone(action));
        }
        Ok(registry)
    }

    /// Register `action` under its own function name, replacing any previous
    /// binding.
    pub fn register<A: IntrinsicAction + 'static>(&mut self, action: A) -> &mut Self {
        let name = action.intrinsic_name().to_string();
        self.actions.insert(name, Arc::new(action));
        self
    }

    /// Bind `name` to `action` as given. Bindings are checked by
    /// [`IntrinsicRegistry::validate`] when a resolver is built.
    pub fn insert(
        &mut self,
        name: String,
        action: Arc<dyn IntrinsicAction>,
    ) -> Option<Arc<dyn IntrinsicAction>> {
        self.actions.insert(name, action)
    }

    pub fn get(&self, name: &str) -> Option<&dyn IntrinsicAction> {
        self.actions.get(name).map(|action| &**action)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Handler for `node` when it is an intrinsic: a single-key object whose
    /// key is registered.
    pub fn action_for(&self, node: &Value) -> Option<&dyn IntrinsicAction> {
        self.get(sole_key(node)?)
    }

    pub fn is_intrinsic(&self, node: &Value) -> bool {
        self.action_for(node).is_some()
    }

    /// Every binding must use a non-empty name matching the handler's own.
    pub fn validate(&self) -> Result<()> {
        for (name, action) in &self.actions {
            if name.is_empty() {
                return Err(Error::InvalidRegistry(
                    "intrinsic names must be non-empty".to_string(),
                ));
            }
            if action.intrinsic_name() != name {
                return Err(Error::InvalidRegistry(format!(
                    "'{}' is bound to the handler for '{}'",
                    name,
                    action.intrinsic_name()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for IntrinsicRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
