//! Fault injection around a [`DocumentStore`]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use recordkeeper_core::{
    ConnectError, ConnectOptions, Connector, Credentials, DocumentStore, Filter, InsertOutcome,
    Record, ReplaceOptions, ReplaceOutcome, StoreError, StoreResult,
};

/// Store wrapper that fails the next call of a chosen kind
///
/// Every insert and replace attempt is counted, including failed ones.
pub struct FaultyStore {
    inner: Arc<dyn DocumentStore>,
    next_insert_error: Mutex<Option<StoreError>>,
    next_replace_error: Mutex<Option<StoreError>>,
    next_list_error: Mutex<Option<StoreError>>,
    insert_calls: AtomicUsize,
    replace_calls: AtomicUsize,
}

impl FaultyStore {
    /// Wrap a store
    pub fn new(inner: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner,
            next_insert_error: Mutex::new(None),
            next_replace_error: Mutex::new(None),
            next_list_error: Mutex::new(None),
            insert_calls: AtomicUsize::new(0),
            replace_calls: AtomicUsize::new(0),
        }
    }

    /// Make the next `insert_one` fail with `err`
    pub fn fail_next_insert(&self, err: StoreError) {
        *self.next_insert_error.lock() = Some(err);
    }

    /// Make the next `replace_one` fail with `err`
    pub fn fail_next_replace(&self, err: StoreError) {
        *self.next_replace_error.lock() = Some(err);
    }

    /// Make the next `list_collections` fail with `err`
    pub fn fail_next_list(&self, err: StoreError) {
        *self.next_list_error.lock() = Some(err);
    }

    /// Number of `insert_one` calls so far
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// Number of `replace_one` calls so far
    pub fn replace_calls(&self) -> usize {
        self.replace_calls.load(Ordering::SeqCst)
    }
}

impl DocumentStore for FaultyStore {
    fn database(&self) -> &str {
        self.inner.database()
    }

    fn list_collections(&self) -> StoreResult<Vec<String>> {
        if let Some(err) = self.next_list_error.lock().take() {
            return Err(err);
        }
        self.inner.list_collections()
    }

    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Record>> {
        self.inner.find(collection, filter)
    }

    fn insert_one(&self, collection: &str, doc: Record) -> StoreResult<InsertOutcome> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_insert_error.lock().take() {
            return Err(err);
        }
        self.inner.insert_one(collection, doc)
    }

    fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        doc: Record,
        options: ReplaceOptions,
    ) -> StoreResult<ReplaceOutcome> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_replace_error.lock().take() {
            return Err(err);
        }
        self.inner.replace_one(collection, filter, doc, options)
    }

    fn close(&self) -> StoreResult<()> {
        self.inner.close()
    }
}

/// Connector that hands out the same store to anyone
///
/// Credentials are ignored. Useful to drive a session against a
/// [`FaultyStore`].
pub struct StaticConnector {
    store: Arc<dyn DocumentStore>,
}

impl StaticConnector {
    /// Always connect to `store`
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

impl Connector for StaticConnector {
    fn connect(
        &self,
        _options: &ConnectOptions,
        _credentials: &Credentials,
    ) -> Result<Arc<dyn DocumentStore>, ConnectError> {
        Ok(Arc::clone(&self.store))
    }
}
