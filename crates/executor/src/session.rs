//! Stateful session owning the active store connection.
//!
//! The [`Session`] holds at most one open [`StoreSession`]. It changes only
//! through `Connect` and `Disconnect`, and every other command reads it.
//!
//! # Usage
//!
//! ```ignore
//! use recordkeeper_executor::{Command, EditorConfig, MemoryConnector, Session};
//!
//! let connector = Arc::new(MemoryConnector::new().with_account("operator", "secret"));
//! let mut session = Session::new(connector, EditorConfig::default())?;
//!
//! session.execute(Command::Connect {
//!     username: "operator".into(),
//!     password: "secret".into(),
//! })?;
//! let out = session.execute(Command::Load { collection: "products".into() })?;
//! ```

use std::sync::Arc;

use recordkeeper_core::{Connector, Credentials};
use recordkeeper_engine::{EditorConfig, SaveCoordinator, StoreSession};
use tracing::debug;

use crate::handlers::{connection, documents};
use crate::{Command, Output, Result};

/// A stateful session that dispatches commands against the active store.
///
/// Without a connection, `Load`, `Save` and `History` fail with
/// [`Error::NotConnected`](crate::Error::NotConnected) and nothing else
/// changes.
pub struct Session {
    connector: Arc<dyn Connector>,
    config: EditorConfig,
    coordinator: SaveCoordinator,
    store: Option<StoreSession>,
}

impl Session {
    /// Create a disconnected session.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the archive settings in `config` are
    /// invalid.
    pub fn new(connector: Arc<dyn Connector>, config: EditorConfig) -> Result<Self> {
        let coordinator = SaveCoordinator::from_config(&config)?;
        Ok(Self {
            connector,
            config,
            coordinator,
            store: None,
        })
    }

    /// Replace the save coordinator, e.g. to install a fixed clock.
    pub fn with_coordinator(mut self, coordinator: SaveCoordinator) -> Self {
        self.coordinator = coordinator;
        self
    }

    /// Returns whether a store session is open.
    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    /// Configuration this session was built with.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Close the active store session, if any.
    pub fn close(&mut self) -> Result<()> {
        connection::disconnect(&mut self.store).map(|_| ())
    }

    /// Execute a command.
    pub fn execute(&mut self, cmd: Command) -> Result<Output> {
        debug!(target: "recordkeeper::executor", command = cmd.name(), "execute");

        match cmd {
            Command::Connect { username, password } => connection::connect(
                &mut self.store,
                self.connector.as_ref(),
                &self.config,
                Credentials::new(username, password),
            ),
            Command::Status => connection::status(&self.store),
            Command::Disconnect => connection::disconnect(&mut self.store),
            Command::Load { collection } => documents::load(self.store.as_ref(), &collection),
            Command::Save {
                collection,
                history_collection,
                document,
                original_document,
                needs_history,
                username,
            } => documents::save(
                self.store.as_ref(),
                &self.coordinator,
                &self.config,
                documents::SaveArgs {
                    collection,
                    history_collection,
                    document,
                    original_document,
                    needs_history,
                    username,
                },
            ),
            Command::History {
                history_collection,
                id,
            } => documents::history(self.store.as_ref(), &history_collection, &id),
            Command::Ping => Ok(Output::Pong {
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}
