//! Intrinsic function resolution for JSON templates.
//!
//! A template embeds deferred computations as single-key objects such as
//! `{"Ref": "Env"}` or `{"Fn::Sub": "${Env}-bucket"}`. This crate walks a
//! template and rewrites those nodes in one of three independent passes:
//!
//! - parameter references, inlining template parameter values;
//! - derived resource references (`MyFunction.Alias`), using a
//!   [`SupportedResourceReferences`] table;
//! - logical id remaps, renaming ids that were regenerated.
//!
//! The crate is split in two:
//!
//! - **[`core`]**: pure resolution logic (handlers, registry, traversal).
//! - **[`io`]**: configuration and document files for the CLI.
//!
//! ```
//! use intrinsics::IntrinsicsResolver;
//! use serde_json::json;
//!
//! let resolver = IntrinsicsResolver::new(Some(json!({"Env": "prod"})), None).unwrap();
//! let out = resolver.resolve_parameter_refs(json!({"Key": {"Ref": "Env"}}));
//! assert_eq!(out, json!({"Key": "prod"}));
//! ```

pub mod core;
pub mod error;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::actions::{IdRefs, IntrinsicAction};
pub use crate::core::registry::IntrinsicRegistry;
pub use crate::core::resolver::{IntrinsicsResolver, ResolutionData};
pub use crate::core::resource_refs::SupportedResourceReferences;
pub use crate::error::{Error, Result};
