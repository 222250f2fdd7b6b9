//! Pure resolution logic.
//!
//! Nothing in here touches the filesystem or the environment. Every pass
//! takes an owned document, rewrites it and hands it back.

pub mod actions;
pub mod document;
pub mod registry;
pub mod resolver;
pub mod resource_refs;
