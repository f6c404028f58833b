//! Collection and history loading

use recordkeeper_core::{resolve, Filter, IdentifierFormatError, Record, StoreError, Value};
use thiserror::Error;
use tracing::{debug, error};

use crate::collection::{validate_collection_name, CollectionNameError};
use crate::history::ORIGINAL_ID_FIELD;
use crate::session::StoreSession;

/// Load failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// No open session
    #[error("not connected to database")]
    NotConnected,

    /// Collection name rejected
    #[error("invalid collection name: {0}")]
    InvalidCollection(#[from] CollectionNameError),

    /// History lookup id is missing or malformed
    #[error("invalid document identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierFormatError),

    /// Store call failed
    #[error("failed to load '{collection}': {source}")]
    Store {
        /// Collection being read
        collection: String,
        /// Store failure
        #[source]
        source: StoreError,
    },
}

/// Every record in `collection`, in store order
///
/// # Errors
///
/// Returns `LoadError::NotConnected` without a session,
/// `InvalidCollection` for a rejected name, or `Store` if the read fails.
pub fn load_collection(
    session: Option<&StoreSession>,
    collection: &str,
) -> Result<Vec<Record>, LoadError> {
    let session = session.ok_or(LoadError::NotConnected)?;
    validate_collection_name(collection)?;
    find(session, collection, &Filter::All)
}

/// History entries archived for the record identified by `raw_id`
///
/// `raw_id` accepts the same shapes as a record's `_id`.
///
/// # Errors
///
/// As [`load_collection`], plus `InvalidIdentifier` if `raw_id` does not
/// resolve.
pub fn load_history(
    session: Option<&StoreSession>,
    history_collection: &str,
    raw_id: Option<&Value>,
) -> Result<Vec<Record>, LoadError> {
    let session = session.ok_or(LoadError::NotConnected)?;
    validate_collection_name(history_collection)?;
    let id = resolve(raw_id)?;
    find(session, history_collection, &Filter::eq(ORIGINAL_ID_FIELD, id))
}

fn find(
    session: &StoreSession,
    collection: &str,
    filter: &Filter,
) -> Result<Vec<Record>, LoadError> {
    match session.store().find(collection, filter) {
        Ok(records) => {
            debug!(target: "recordkeeper::load", collection, count = records.len(), "loaded");
            Ok(records)
        }
        Err(source) => {
            error!(target: "recordkeeper::load", collection, error = %source, "load failed");
            Err(LoadError::Store {
                collection: collection.to_string(),
                source,
            })
        }
    }
}
