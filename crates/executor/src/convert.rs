//! Error conversion from internal error types.
//!
//! This module provides conversions from engine, core, and config errors to
//! the executor's [`Error`] type.

use recordkeeper_core::{ConnectError, IdentifierFormatError, StoreError};
use recordkeeper_engine::{CollectionNameError, ConfigError, LoadError, SaveError};

use crate::Error;

impl From<ConnectError> for Error {
    fn from(err: ConnectError) -> Self {
        Error::ConnectionFailed {
            reason: err.to_string(),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Store {
            reason: err.to_string(),
        }
    }
}

impl From<IdentifierFormatError> for Error {
    fn from(err: IdentifierFormatError) -> Self {
        Error::InvalidIdentifier {
            reason: err.to_string(),
        }
    }
}

impl From<CollectionNameError> for Error {
    fn from(err: CollectionNameError) -> Self {
        Error::InvalidCollection {
            reason: err.to_string(),
        }
    }
}

impl From<SaveError> for Error {
    fn from(err: SaveError) -> Self {
        match err {
            SaveError::NotConnected => Error::NotConnected,
            SaveError::InvalidCollection(e) => e.into(),
            SaveError::MissingDocument => Error::MissingDocument,
            SaveError::InvalidIdentifier(e) => e.into(),
            SaveError::HistoryWrite {
                collection, source, ..
            } => Error::HistoryWriteFailed {
                collection,
                reason: source.to_string(),
            },
            SaveError::Replace {
                collection,
                id,
                source,
            } => Error::SaveFailed {
                collection,
                id: id.to_hex(),
                reason: source.to_string(),
            },
        }
    }
}

impl From<LoadError> for Error {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::NotConnected => Error::NotConnected,
            LoadError::InvalidCollection(e) => e.into(),
            LoadError::InvalidIdentifier(e) => e.into(),
            LoadError::Store { collection, source } => Error::Store {
                reason: format!("failed to load '{}': {}", collection, source),
            },
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::InvalidInput {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization {
            reason: err.to_string(),
        }
    }
}
