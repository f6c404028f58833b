//! Error types for document store operations
//!
//! This module defines the errors a [`DocumentStore`](crate::traits::DocumentStore)
//! can report. We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.

use thiserror::Error;

use crate::types::ObjectId;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors reported by a document store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Handle was closed
    #[error("store handle is closed")]
    Closed,

    /// Store could not be reached
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Cause reported by the transport
        reason: String,
    },

    /// Insert collided with an existing document
    #[error("duplicate key in collection '{collection}': {id}")]
    DuplicateKey {
        /// Target collection
        collection: String,
        /// Colliding identifier
        id: ObjectId,
    },

    /// Replacement tried to change the identifier of the matched document
    #[error("the _id field cannot be changed in collection '{collection}'")]
    ImmutableId {
        /// Target collection
        collection: String,
    },

    /// Document is not acceptable to the store
    #[error("invalid document: {reason}")]
    InvalidDocument {
        /// Why it was rejected
        reason: String,
    },

    /// Any other failure of a single operation
    #[error("{operation} failed: {reason}")]
    Operation {
        /// Operation name, e.g. `insertOne`
        operation: String,
        /// Cause reported by the store
        reason: String,
    },
}

impl StoreError {
    /// Create an operation failure
    pub fn operation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Operation {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable {
            reason: reason.into(),
        }
    }
}
