//! Command enum defining all backend operations.
//!
//! Commands are the requests the front-end can make. Every operation the
//! backend performs on its behalf is represented as a variant of this enum.
//!
//! Commands are:
//! - **Self-contained**: All parameters needed for execution are in the variant
//! - **Serializable**: Can be converted to/from JSON for the bridge
//! - **Pure data**: No closures or executable code

use serde::{Deserialize, Serialize};

use recordkeeper_core::{Record, Value};

/// A command is a self-contained, serializable operation.
///
/// # Command Categories
///
/// | Category | Commands | Description |
/// |----------|----------|-------------|
/// | Connection | `Connect`, `Status`, `Disconnect` | Session lifecycle |
/// | Documents | `Load`, `Save`, `History` | Record reads and versioned writes |
/// | Database | `Ping` | Backend information |
///
/// # JSON form
///
/// Struct variants are objects keyed by the variant name; unit variants are
/// bare strings. Records and ids use canonical JSON (`{"$oid": ...}`).
///
/// ```text
/// {"Load": {"collection": "products"}}
/// {"Save": {"collection": "products",
///           "document": {"name": "Widget"},
///           "original_document": {"_id": {"$oid": "507f1f77bcf86cd799439011"}, "name": "Gadget"},
///           "username": "editor"}}
/// "Status"
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Connection ====================
    /// Authenticate and open a session, closing any current one first.
    /// Returns: `Output::Connected`
    Connect {
        /// Account name
        username: String,
        /// Account secret
        password: String,
    },

    /// Report whether a session is open.
    /// Returns: `Output::Status`
    Status,

    /// Close the current session, if any.
    /// Returns: `Output::Disconnected`
    Disconnect,

    // ==================== Documents ====================
    /// Load every record in a collection.
    /// Returns: `Output::Records`
    Load {
        /// Collection to read
        collection: String,
    },

    /// Save an edited record, archiving its prior version first.
    /// Returns: `Output::Saved`
    Save {
        /// Primary collection
        collection: String,
        /// History collection; defaults to the collection name plus the
        /// configured suffix
        #[serde(default, skip_serializing_if = "Option::is_none")]
        history_collection: Option<String>,
        /// Edited record
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "crate::json::canonical_record_opt"
        )]
        document: Option<Record>,
        /// Record as loaded, before editing
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "crate::json::canonical_record_opt"
        )]
        original_document: Option<Record>,
        /// Archive the original before replacing (default: true)
        #[serde(default = "default_needs_history")]
        needs_history: bool,
        /// Operator performing the save
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },

    /// List the history entries archived for one record.
    /// Returns: `Output::Records`
    History {
        /// History collection to search
        history_collection: String,
        /// Record id in any accepted shape
        #[serde(default, with = "crate::json::canonical_value")]
        id: Value,
    },

    // ==================== Database ====================
    /// Health check.
    /// Returns: `Output::Pong`
    Ping,
}

fn default_needs_history() -> bool {
    true
}

impl Command {
    /// Variant name, safe to log
    pub fn name(&self) -> &'static str {
        match self {
            Command::Connect { .. } => "Connect",
            Command::Status => "Status",
            Command::Disconnect => "Disconnect",
            Command::Load { .. } => "Load",
            Command::Save { .. } => "Save",
            Command::History { .. } => "History",
            Command::Ping => "Ping",
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Connect { username, .. } => f
                .debug_struct("Connect")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Command::Status => f.write_str("Status"),
            Command::Disconnect => f.write_str("Disconnect"),
            Command::Load { collection } => {
                f.debug_struct("Load").field("collection", collection).finish()
            }
            Command::Save {
                collection,
                history_collection,
                document,
                original_document,
                needs_history,
                username,
            } => f
                .debug_struct("Save")
                .field("collection", collection)
                .field("history_collection", history_collection)
                .field("document", document)
                .field("original_document", original_document)
                .field("needs_history", needs_history)
                .field("username", username)
                .finish(),
            Command::History {
                history_collection,
                id,
            } => f
                .debug_struct("History")
                .field("history_collection", history_collection)
                .field("id", id)
                .finish(),
            Command::Ping => f.write_str("Ping"),
        }
    }
}
