//! Versioned save
//!
//! A save writes the edited document back to its collection, after first
//! archiving the prior version into the history collection when asked.
//!
//! ## Protocol
//!
//! 1. Resolve the authoritative id from the *original* document. The
//!    edited document's own `_id` is discarded; callers are not trusted to
//!    address documents.
//! 2. If history is requested, insert a history entry built from the
//!    original. A failure here aborts the save before the primary
//!    collection is touched.
//! 3. Upsert-replace the edited document under the authoritative id.
//!
//! Steps 2 and 3 are independent store calls. When step 3 fails after step
//! 2 succeeded, the history entry stays; the history collection is
//! append-only and an extra entry is harmless.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use recordkeeper_core::{
    resolve_record_id, ArchiveZone, Filter, IdentifierFormatError, ObjectId, Record,
    ReplaceOptions, ReplaceOutcome, StoreError, ID_FIELD,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::collection::{validate_collection_name, CollectionNameError};
use crate::config::{ConfigError, EditorConfig};
use crate::history::{build_history_entry, DEFAULT_UNKNOWN_ACTOR};
use crate::session::StoreSession;

/// Source of the current time
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// One save call's input
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    /// Primary collection
    pub collection: String,
    /// Collection receiving history entries
    pub history_collection: String,
    /// Edited document to persist
    pub document: Option<Record>,
    /// Document as it was before editing
    pub original: Option<Record>,
    /// Archive the original before replacing
    pub needs_history: bool,
    /// Operator performing the save
    pub actor: Option<String>,
}

impl SaveRequest {
    /// Request with history enabled and no documents yet
    pub fn new(collection: impl Into<String>, history_collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            history_collection: history_collection.into(),
            document: None,
            original: None,
            needs_history: true,
            actor: None,
        }
    }

    /// Set the edited document
    pub fn with_document(mut self, document: Record) -> Self {
        self.document = Some(document);
        self
    }

    /// Set the original document
    pub fn with_original(mut self, original: Record) -> Self {
        self.original = Some(original);
        self
    }

    /// Enable or disable archiving
    pub fn with_history(mut self, needs_history: bool) -> Self {
        self.needs_history = needs_history;
        self
    }

    /// Set the acting operator
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// Result of a successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    /// Authoritative id the document was saved under
    pub id: ObjectId,
    /// History entries written (0 or 1)
    pub history_records_created: u32,
    /// What the primary replace did
    pub replace: ReplaceOutcome,
}

/// Machine-readable save failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaveErrorKind {
    /// No open session
    NotConnected,
    /// No edited document in the request
    MissingDocument,
    /// Original's `_id` could not be resolved
    InvalidIdentifier,
    /// Collection name rejected
    InvalidCollection,
    /// History insert failed; primary untouched
    HistoryWrite,
    /// Primary replace failed
    Replace,
}

impl fmt::Display for SaveErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SaveErrorKind::NotConnected => "NotConnected",
            SaveErrorKind::MissingDocument => "MissingDocument",
            SaveErrorKind::InvalidIdentifier => "InvalidIdentifier",
            SaveErrorKind::InvalidCollection => "InvalidCollection",
            SaveErrorKind::HistoryWrite => "HistoryWrite",
            SaveErrorKind::Replace => "Replace",
        };
        f.write_str(name)
    }
}

/// Save failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaveError {
    /// No open session
    #[error("not connected to database")]
    NotConnected,

    /// A collection name was rejected
    #[error("invalid collection name: {0}")]
    InvalidCollection(#[from] CollectionNameError),

    /// Request has no edited document
    #[error("no document provided")]
    MissingDocument,

    /// Original's id is missing or malformed
    #[error("invalid document identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierFormatError),

    /// History insert failed; the primary document was not changed
    #[error("failed to archive document {id} to '{collection}': {source}")]
    HistoryWrite {
        /// History collection
        collection: String,
        /// Authoritative id
        id: ObjectId,
        /// Store failure
        #[source]
        source: StoreError,
    },

    /// Primary replace failed
    #[error("failed to save document {id} to '{collection}': {source}")]
    Replace {
        /// Primary collection
        collection: String,
        /// Authoritative id
        id: ObjectId,
        /// Store failure
        #[source]
        source: StoreError,
    },
}

impl SaveError {
    /// Category of this failure
    pub fn kind(&self) -> SaveErrorKind {
        match self {
            SaveError::NotConnected => SaveErrorKind::NotConnected,
            SaveError::InvalidCollection(_) => SaveErrorKind::InvalidCollection,
            SaveError::MissingDocument => SaveErrorKind::MissingDocument,
            SaveError::InvalidIdentifier(_) => SaveErrorKind::InvalidIdentifier,
            SaveError::HistoryWrite { .. } => SaveErrorKind::HistoryWrite,
            SaveError::Replace { .. } => SaveErrorKind::Replace,
        }
    }
}

/// Runs versioned saves
pub struct SaveCoordinator {
    zone: ArchiveZone,
    unknown_actor: String,
    clock: Clock,
}

impl SaveCoordinator {
    /// Coordinator with the system clock
    pub fn new(zone: ArchiveZone, unknown_actor: impl Into<String>) -> Self {
        Self {
            zone,
            unknown_actor: unknown_actor.into(),
            clock: Arc::new(Utc::now),
        }
    }

    /// Coordinator configured from `[archive]` and `[history]`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ArchiveZone` if the zone settings are invalid.
    pub fn from_config(config: &EditorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.archive_zone()?,
            config.history.unknown_actor.clone(),
        ))
    }

    /// Replace the clock
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Zone used for `archived_date`
    pub fn zone(&self) -> &ArchiveZone {
        &self.zone
    }

    /// Value written to `archived_by` when no actor is given
    pub fn unknown_actor(&self) -> &str {
        &self.unknown_actor
    }

    /// Save `request.document`, archiving the original first if asked
    ///
    /// # Errors
    ///
    /// Returns `SaveError`. Precondition failures (`NotConnected`,
    /// `InvalidCollection`, `MissingDocument`, `InvalidIdentifier`) happen
    /// before any write. `HistoryWrite` means nothing was written.
    /// `Replace` means a history entry may already have been written.
    pub fn save(
        &self,
        session: Option<&StoreSession>,
        request: SaveRequest,
    ) -> Result<SaveOutcome, SaveError> {
        let session = session.ok_or(SaveError::NotConnected)?;

        let SaveRequest {
            collection,
            history_collection,
            document,
            original,
            needs_history,
            actor,
        } = request;

        validate_collection_name(&collection)?;
        if needs_history {
            validate_collection_name(&history_collection)?;
        }

        let mut document = document.ok_or(SaveError::MissingDocument)?;
        let original = match original {
            Some(original) => original,
            None => {
                warn!(
                    target: "recordkeeper::save",
                    collection = %collection,
                    "no original document supplied, archiving the edited document instead"
                );
                document.clone()
            }
        };

        let id = resolve_record_id(&original)?;
        debug!(target: "recordkeeper::save", collection = %collection, %id, needs_history, "saving document");

        let store = session.store();
        let mut history_records_created: u32 = 0;

        if needs_history {
            let archived_date = self.zone.render((self.clock)());
            let entry = build_history_entry(
                &original,
                id,
                archived_date,
                actor.as_deref(),
                &self.unknown_actor,
            );
            match store.insert_one(&history_collection, entry) {
                Ok(inserted) => {
                    history_records_created += 1;
                    debug!(
                        target: "recordkeeper::save",
                        collection = %history_collection,
                        %id,
                        history_id = %inserted.inserted_id,
                        "archived prior version"
                    );
                }
                Err(source) => {
                    error!(
                        target: "recordkeeper::save",
                        collection = %history_collection,
                        %id,
                        error = %source,
                        "history write failed, document left unchanged"
                    );
                    return Err(SaveError::HistoryWrite {
                        collection: history_collection,
                        id,
                        source,
                    });
                }
            }
        }

        document.take_id();
        document.insert(ID_FIELD, id);

        let replace = match store.replace_one(
            &collection,
            &Filter::ById(id),
            document,
            ReplaceOptions::upsert(),
        ) {
            Ok(replace) => replace,
            Err(source) => {
                error!(
                    target: "recordkeeper::save",
                    collection = %collection,
                    %id,
                    history_records_created,
                    error = %source,
                    "replace failed"
                );
                return Err(SaveError::Replace {
                    collection,
                    id,
                    source,
                });
            }
        };

        info!(
            target: "recordkeeper::save",
            collection = %collection,
            %id,
            history_records_created,
            matched = replace.matched_count,
            modified = replace.modified_count,
            upserted = replace.upserted_count,
            "saved document"
        );

        Ok(SaveOutcome {
            id,
            history_records_created,
            replace,
        })
    }
}

impl Default for SaveCoordinator {
    fn default() -> Self {
        Self::new(ArchiveZone::aest(), DEFAULT_UNKNOWN_ACTOR)
    }
}

impl fmt::Debug for SaveCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveCoordinator")
            .field("zone", &self.zone)
            .field("unknown_actor", &self.unknown_actor)
            .finish_non_exhaustive()
    }
}
