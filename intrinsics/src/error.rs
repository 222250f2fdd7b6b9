//! Library errors.
//!
//! Only construction-time validation fails. Resolution passes themselves are
//! infallible: an unresolvable reference is left in place, never reported.

use thiserror::Error;

/// Result alias for fallible library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Parameter table is missing or is not a JSON object.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A registry entry does not bind a well-formed intrinsic action.
    #[error("invalid intrinsic registry: {0}")]
    InvalidRegistry(String),

    #[error("unknown intrinsic function '{0}'")]
    UnknownIntrinsic(String),

    #[error("invalid resource reference: {0}")]
    InvalidResourceReference(String),
}
