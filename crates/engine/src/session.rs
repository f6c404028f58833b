//! Store session lifecycle
//!
//! A `StoreSession` is one open, probed connection to one database. It is
//! created by [`StoreSession::open`] and ends with [`StoreSession::close`]
//! or when dropped. Load and save operations borrow it; nothing holds a
//! process-wide connection.

use std::fmt;
use std::sync::Arc;

use recordkeeper_core::{
    redacted_uri, ConnectError, ConnectOptions, Connector, Credentials, DocumentStore,
    StoreResult,
};
use tracing::{debug, info, warn};

/// An open connection to one database
pub struct StoreSession {
    store: Arc<dyn DocumentStore>,
    collection_count: usize,
    closed: bool,
}

impl StoreSession {
    /// Connect, then probe the connection by listing collections
    ///
    /// # Errors
    ///
    /// Returns the connector's `ConnectError`, or `ConnectError::Probe` if
    /// the probe fails. A handle whose probe failed is closed before
    /// returning.
    pub fn open(
        connector: &dyn Connector,
        options: &ConnectOptions,
        credentials: &Credentials,
    ) -> Result<Self, ConnectError> {
        debug!(
            target: "recordkeeper::session",
            uri = %redacted_uri(options, &credentials.username),
            database = %options.database,
            max_pool_size = options.max_pool_size,
            "connecting"
        );
        let store = connector.connect(options, credentials)?;

        let collections = match store.list_collections() {
            Ok(collections) => collections,
            Err(e) => {
                if let Err(close_err) = store.close() {
                    warn!(target: "recordkeeper::session", error = %close_err, "close after failed probe");
                }
                return Err(ConnectError::Probe(e));
            }
        };

        info!(
            target: "recordkeeper::session",
            database = %store.database(),
            collections = collections.len(),
            "connected"
        );
        Ok(Self {
            store,
            collection_count: collections.len(),
            closed: false,
        })
    }

    /// Name of the connected database
    pub fn database(&self) -> &str {
        self.store.database()
    }

    /// Number of collections seen by the connection probe
    pub fn collection_count(&self) -> usize {
        self.collection_count
    }

    /// The underlying store handle
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Close the store handle
    ///
    /// # Errors
    ///
    /// Returns the store's error if closing fails. The session is consumed
    /// either way.
    pub fn close(mut self) -> StoreResult<()> {
        self.closed = true;
        info!(target: "recordkeeper::session", database = %self.store.database(), "disconnected");
        self.store.close()
    }
}

impl Drop for StoreSession {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.store.close() {
                warn!(target: "recordkeeper::session", error = %e, "close on drop failed");
            }
        }
    }
}

impl fmt::Debug for StoreSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSession")
            .field("database", &self.store.database())
            .field("collection_count", &self.collection_count)
            .field("closed", &self.closed)
            .finish()
    }
}
