//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON
//! - **Lossless**: No error information is lost in conversion from internal errors

use serde::{Deserialize, Serialize};

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Connection | `NotConnected`, `ConnectionFailed` | No session, or opening one failed |
/// | Validation | `MissingDocument`, `InvalidIdentifier`, `InvalidCollection`, `InvalidInput` | Bad request; nothing was written |
/// | Store | `HistoryWriteFailed`, `SaveFailed`, `Store` | A store call failed |
/// | System | `Serialization`, `Internal` | Infrastructure errors |
///
/// # Example
///
/// ```ignore
/// use recordkeeper_executor::{Command, Error};
///
/// match session.execute(cmd) {
///     Ok(output) => { /* handle success */ }
///     Err(Error::NotConnected) => println!("connect first"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Connection ====================
    /// No session is open
    #[error("No database connection")]
    NotConnected,

    /// Opening a session failed; `reason` is operator-facing
    #[error("{reason}")]
    ConnectionFailed { reason: String },

    // ==================== Validation ====================
    /// Save request carried no document
    #[error("Document is missing from the save request")]
    MissingDocument,

    /// Record id is missing or malformed
    #[error("invalid document identifier: {reason}")]
    InvalidIdentifier { reason: String },

    /// Collection name rejected
    #[error("invalid collection name: {reason}")]
    InvalidCollection { reason: String },

    /// Request could not be understood
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    // ==================== Store ====================
    /// History insert failed; the record was not changed
    #[error("failed to archive previous version in '{collection}': {reason}")]
    HistoryWriteFailed { collection: String, reason: String },

    /// Primary replace failed; a history entry may already exist
    #[error("failed to save document {id} in '{collection}': {reason}")]
    SaveFailed {
        collection: String,
        id: String,
        reason: String,
    },

    /// Any other store failure
    #[error("{reason}")]
    Store { reason: String },

    // ==================== System ====================
    /// Serialization error
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal { reason: String },
}

impl Error {
    /// Machine-readable variant name
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotConnected => "NotConnected",
            Error::ConnectionFailed { .. } => "ConnectionFailed",
            Error::MissingDocument => "MissingDocument",
            Error::InvalidIdentifier { .. } => "InvalidIdentifier",
            Error::InvalidCollection { .. } => "InvalidCollection",
            Error::InvalidInput { .. } => "InvalidInput",
            Error::HistoryWriteFailed { .. } => "HistoryWrite",
            Error::SaveFailed { .. } => "Replace",
            Error::Store { .. } => "Store",
            Error::Serialization { .. } => "Serialization",
            Error::Internal { .. } => "Internal",
        }
    }
}
