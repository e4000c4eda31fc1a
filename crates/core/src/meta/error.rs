//! Error types for metadata identifiers

use mirage_sdk::{ObjectType, PathError, UndefinedValue};

/// Error type for identifier construction, parsing and path derivation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetaError {
    /// Identifier violates the invariants of its schema
    #[error("Identifier failed validation: {0}")]
    Validation(String),

    /// No metadata table is defined for this object type
    #[error("No metadata table for object type {0:?}")]
    NotApplicable(ObjectType),

    /// A raw field value does not name a defined enum value
    #[error(transparent)]
    Undefined(#[from] UndefinedValue),

    /// Persisted data could not be turned into an identifier
    #[error("Malformed persisted identifier: {0}")]
    Malformed(String),

    /// Derived path was rejected
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Result type for identifier operations
pub type MetaResult<T> = Result<T, MetaError>;
