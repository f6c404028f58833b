//! Core traits for document store abstraction
//!
//! This module defines the DocumentStore and Connector traits that let the
//! save protocol run against any backend: a networked document database,
//! or the in-process store used for embedding and tests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::connect::{ConnectError, ConnectOptions, Credentials};
use crate::error::StoreResult;
use crate::record::Record;
use crate::types::ObjectId;
use crate::value::Value;

/// Document selector
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document in the collection
    All,
    /// The document whose `_id` is this id
    ById(ObjectId),
    /// Documents whose `field` equals `value`
    Eq {
        /// Field name
        field: String,
        /// Value to compare against
        value: Value,
    },
}

impl Filter {
    /// Match on a field value
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Check whether a stored record is selected by this filter
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::All => true,
            Filter::ById(id) => record.id() == Some(&Value::ObjectId(*id)),
            Filter::Eq { field, value } => record.get(field) == Some(value),
        }
    }
}

/// Options for [`DocumentStore::replace_one`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOptions {
    /// Insert the document when nothing matches
    pub upsert: bool,
}

impl ReplaceOptions {
    /// Options with upsert enabled
    pub fn upsert() -> Self {
        Self { upsert: true }
    }
}

/// Result of a single insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOutcome {
    /// Identifier of the inserted document
    pub inserted_id: ObjectId,
}

/// Result of a single replace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceOutcome {
    /// Documents matched by the filter (0 or 1)
    pub matched_count: u64,
    /// Documents whose content actually changed
    pub modified_count: u64,
    /// Documents inserted because nothing matched (0 or 1)
    pub upserted_count: u64,
    /// Identifier of the upserted document, if any
    pub upserted_id: Option<ObjectId>,
}

/// Document store abstraction
///
/// Each method is one request to the store and is atomic on its own.
/// Nothing here coordinates atomicity across calls.
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait DocumentStore: Send + Sync {
    /// Name of the database this handle is bound to
    fn database(&self) -> &str;

    /// Names of the collections in the database, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn list_collections(&self) -> StoreResult<Vec<String>>;

    /// Fetch the documents selected by a filter
    ///
    /// A collection that does not exist yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Record>>;

    /// Insert one new document
    ///
    /// If the document has no `_id`, the store assigns one.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is rejected (for example a duplicate
    /// id) or the store operation fails.
    fn insert_one(&self, collection: &str, doc: Record) -> StoreResult<InsertOutcome>;

    /// Replace the first document selected by `filter` with `doc`
    ///
    /// With `options.upsert`, a missing document is inserted instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the replacement is rejected or the store
    /// operation fails.
    fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        doc: Record,
        options: ReplaceOptions,
    ) -> StoreResult<ReplaceOutcome>;

    /// Close this handle
    ///
    /// Later calls on the same handle fail with `StoreError::Closed`.
    /// Closing twice is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store reports a failure while closing.
    fn close(&self) -> StoreResult<()>;
}

/// Opens authenticated store handles
pub trait Connector: Send + Sync {
    /// Authenticate and open a handle on `options.database`
    ///
    /// # Errors
    ///
    /// Returns `ConnectError` if authentication fails or the server cannot
    /// be reached.
    fn connect(
        &self,
        options: &ConnectOptions,
        credentials: &Credentials,
    ) -> Result<Arc<dyn DocumentStore>, ConnectError>;
}
