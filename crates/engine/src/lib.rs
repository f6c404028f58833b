//! Record engine for recordkeeper
//!
//! This crate orchestrates the layers below it:
//! - Config: `recordkeeper.toml` loading and defaults
//! - Session: open/probe/close lifecycle of one store connection
//! - Save: history-before-replace versioned saves
//! - Load: collection reads and history lookup by original id
//!
//! The engine is the only component that knows about:
//! - The history entry layout (`original_id`, `archived_date`, `archived_by`)
//! - Ordering between the history insert and the primary replace
//! - Which identifier on a save request is authoritative

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod config;
pub mod history;
pub mod load;
pub mod save;
pub mod session;

pub use collection::{validate_collection_name, CollectionNameError, MAX_COLLECTION_NAME_LENGTH};
pub use config::{
    ArchiveConfig, ConfigError, ConnectionConfig, EditorConfig, HistoryConfig, MemoryConfig,
    CONFIG_FILE_NAME, DEFAULT_HISTORY_SUFFIX, MEMORY_SCHEME,
};
pub use history::{
    build_history_entry, ARCHIVED_BY_FIELD, ARCHIVED_DATE_FIELD, DEFAULT_UNKNOWN_ACTOR,
    ORIGINAL_ID_FIELD,
};
pub use load::{load_collection, load_history, LoadError};
pub use save::{Clock, SaveCoordinator, SaveError, SaveErrorKind, SaveOutcome, SaveRequest};
pub use session::StoreSession;
pub use recordkeeper_core::{connection_uri, encode_uri_component, redacted_uri};
