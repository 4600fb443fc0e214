//! Error types for fn-protection-engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised while building guard records
///
/// Every variant is fatal for the invocation: the protection pass stops and
/// no partial result is returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The target cannot be referenced by a guard
    #[error("cannot protect {target}: missing {field}")]
    IncompleteTarget { target: String, field: &'static str },

    /// The guard's response key is already used by a desired resource or
    /// by another guard
    #[error("cannot add usage {key}: a desired resource with that key already exists")]
    KeyCollision { key: String },

    /// The guard could not be turned into a resource document
    #[error("cannot convert usage for {target} to unstructured: {message}")]
    Conversion { target: String, message: String },
}
