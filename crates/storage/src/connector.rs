//! In-process connector
//!
//! Authenticates against a fixed account list and hands out
//! [`MemoryStore`] handles. Each database name maps to one shared store,
//! so data outlives the sessions that wrote it.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use recordkeeper_core::{ConnectError, ConnectOptions, Connector, Credentials, DocumentStore};

use crate::memory::MemoryStore;

/// [`Connector`] backed by in-memory databases
pub struct MemoryConnector {
    accounts: RwLock<HashMap<String, String>>,
    databases: DashMap<String, MemoryStore>,
    reachable: AtomicBool,
}

impl MemoryConnector {
    /// Create a connector with no accounts
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            databases: DashMap::new(),
            reachable: AtomicBool::new(true),
        }
    }

    /// Builder form of [`add_account`](Self::add_account)
    pub fn with_account(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.add_account(username, password);
        self
    }

    /// Register (or overwrite) an account
    pub fn add_account(&self, username: impl Into<String>, password: impl Into<String>) {
        self.accounts.write().insert(username.into(), password.into());
    }

    /// Simulate losing the network
    ///
    /// While unreachable, every `connect` fails with `HostNotFound`.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::Release);
    }

    /// Handle on a database, for seeding and inspection
    pub fn database(&self, name: &str) -> MemoryStore {
        self.databases
            .entry(name.to_string())
            .or_insert_with(|| MemoryStore::new(name))
            .handle()
    }

    fn authenticate(&self, credentials: &Credentials) -> bool {
        self.accounts
            .read()
            .get(&credentials.username)
            .is_some_and(|password| *password == credentials.password)
    }
}

impl fmt::Debug for MemoryConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryConnector")
            .field("accounts", &self.accounts.read().len())
            .field("databases", &self.databases.len())
            .field("reachable", &self.reachable.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MemoryConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for MemoryConnector {
    fn connect(
        &self,
        options: &ConnectOptions,
        credentials: &Credentials,
    ) -> Result<Arc<dyn DocumentStore>, ConnectError> {
        if !self.reachable.load(Ordering::Acquire) {
            return Err(ConnectError::HostNotFound {
                host: options.host.clone(),
            });
        }
        if !self.authenticate(credentials) {
            tracing::debug!(
                target: "recordkeeper::storage",
                username = %credentials.username,
                "rejected credentials"
            );
            return Err(ConnectError::AuthenticationFailed);
        }
        Ok(Arc::new(self.database(&options.database)))
    }
}
