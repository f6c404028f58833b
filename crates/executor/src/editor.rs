//! High-level typed wrapper for the [`Session`].
//!
//! The [`Editor`] struct wraps [`Command`]/[`Output`] with typed method
//! calls, for Rust callers that don't go through the bridge.
//!
//! # Example
//!
//! ```ignore
//! use recordkeeper_executor::{Editor, EditorConfig, MemoryConnector};
//!
//! let connector = Arc::new(MemoryConnector::new().with_account("operator", "secret"));
//! let mut editor = Editor::new(connector, EditorConfig::default())?;
//!
//! editor.connect("operator", "secret")?;
//! let products = editor.load("products")?;
//! ```

use std::sync::Arc;

use recordkeeper_core::{Connector, ObjectId, Record, Value};
use recordkeeper_engine::EditorConfig;

use crate::{Command, Error, Output, Result, Session};

/// Summary of a completed save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveSummary {
    /// Authoritative id the record was saved under
    pub id: ObjectId,
    /// History entries written (0 or 1)
    pub history_records_created: u32,
    /// Whether the stored record changed
    pub modified: bool,
    /// Whether the record was inserted because none existed
    pub upserted: bool,
}

/// High-level typed wrapper for record editing.
#[derive(Debug)]
pub struct Editor {
    session: Session,
}

impl Editor {
    /// Create a disconnected editor.
    pub fn new(connector: Arc<dyn Connector>, config: EditorConfig) -> Result<Self> {
        Ok(Self {
            session: Session::new(connector, config)?,
        })
    }

    /// Wrap an existing session.
    pub fn from_session(session: Session) -> Self {
        Self { session }
    }

    /// Get the underlying session.
    pub fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Open a session, closing any current one. Returns the confirmation
    /// message.
    pub fn connect(&mut self, username: &str, password: &str) -> Result<String> {
        match self.session.execute(Command::Connect {
            username: username.to_string(),
            password: password.to_string(),
        })? {
            Output::Connected { message } => Ok(message),
            other => Err(unexpected("Connect", &other)),
        }
    }

    /// Whether a session is open.
    pub fn status(&mut self) -> Result<bool> {
        match self.session.execute(Command::Status)? {
            Output::Status { connected } => Ok(connected),
            other => Err(unexpected("Status", &other)),
        }
    }

    /// Close the current session, if any.
    pub fn disconnect(&mut self) -> Result<()> {
        match self.session.execute(Command::Disconnect)? {
            Output::Disconnected => Ok(()),
            other => Err(unexpected("Disconnect", &other)),
        }
    }

    /// Every record in `collection`.
    pub fn load(&mut self, collection: &str) -> Result<Vec<Record>> {
        match self.session.execute(Command::Load {
            collection: collection.to_string(),
        })? {
            Output::Records(records) => Ok(records),
            other => Err(unexpected("Load", &other)),
        }
    }

    /// Save `document`, archiving `original` to the default history
    /// collection first.
    pub fn save(
        &mut self,
        collection: &str,
        document: Record,
        original: Option<Record>,
        username: Option<&str>,
    ) -> Result<SaveSummary> {
        match self.session.execute(Command::Save {
            collection: collection.to_string(),
            history_collection: None,
            document: Some(document),
            original_document: original,
            needs_history: true,
            username: username.map(str::to_string),
        })? {
            Output::Saved {
                id,
                history_records_created,
                modified_count,
                upserted_count,
                ..
            } => Ok(SaveSummary {
                id,
                history_records_created,
                modified: modified_count > 0,
                upserted: upserted_count > 0,
            }),
            other => Err(unexpected("Save", &other)),
        }
    }

    /// History entries for the record identified by `id`, read from the
    /// default history collection of `collection`.
    pub fn history(&mut self, collection: &str, id: impl Into<Value>) -> Result<Vec<Record>> {
        let history_collection = self.session.config().history_collection_for(collection);
        match self.session.execute(Command::History {
            history_collection,
            id: id.into(),
        })? {
            Output::Records(records) => Ok(records),
            other => Err(unexpected("History", &other)),
        }
    }

    /// Backend version.
    pub fn ping(&mut self) -> Result<String> {
        match self.session.execute(Command::Ping)? {
            Output::Pong { version } => Ok(version),
            other => Err(unexpected("Ping", &other)),
        }
    }
}

fn unexpected(command: &str, output: &Output) -> Error {
    Error::Internal {
        reason: format!("Unexpected output for {}: {:?}", command, output),
    }
}
