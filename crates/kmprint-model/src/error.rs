//! Model errors

use thiserror::Error;

/// Errors raised while reading decoded metadata values
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Version string is not `MAJOR.MINOR.PATCH`
    #[error("Invalid metadata version: {0}")]
    InvalidVersion(String),

    /// JVM field or method descriptor could not be parsed
    #[error("invalid {kind} descriptor: {signature}")]
    InvalidDescriptor {
        /// `field` or `method`
        kind: &'static str,
        /// Member signature, `name:descriptor` for fields and
        /// the name followed by the descriptor for methods
        signature: String,
    },
}

/// Result alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;
