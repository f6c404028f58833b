//! In-process document store
//!
//! Replaces a networked document database for embedding and tests.
//!
//! # Design
//!
//! - DashMap keyed by collection name: writes to different collections
//!   never contend
//! - BTreeMap per collection keyed by ObjectId: `find` returns documents
//!   in id order, which is insertion order at one-second granularity
//! - One closed flag per handle: `handle()` gives out independent handles
//!   over the same data, so closing one session does not affect the next
//!
//! Every method holds at most one collection lock, so each call is atomic
//! on its own.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use recordkeeper_core::{
    DocumentStore, Filter, InsertOutcome, ObjectId, Record, ReplaceOptions, ReplaceOutcome,
    StoreError, StoreResult, Value, ID_FIELD,
};

type Collection = BTreeMap<ObjectId, Record>;

/// In-memory implementation of [`DocumentStore`]
#[derive(Debug)]
pub struct MemoryStore {
    database: String,
    collections: Arc<DashMap<String, Collection>>,
    closed: AtomicBool,
}

impl MemoryStore {
    /// Create an empty database
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collections: Arc::new(DashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Open another handle over the same data
    ///
    /// The new handle starts open regardless of this handle's state.
    pub fn handle(&self) -> MemoryStore {
        Self {
            database: self.database.clone(),
            collections: Arc::clone(&self.collections),
            closed: AtomicBool::new(false),
        }
    }

    /// Whether this handle has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of documents in a collection (0 if it does not exist)
    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    fn check_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

/// Replace within one locked collection
fn replace_in(
    coll: &mut BTreeMap<ObjectId, Record>,
    collection: &str,
    filter: &Filter,
    doc: Record,
    options: ReplaceOptions,
) -> StoreResult<ReplaceOutcome> {
    let matched = match filter {
        Filter::ById(id) => coll.contains_key(id).then_some(*id),
        _ => coll
            .iter()
            .find(|(_, r)| filter.matches(r))
            .map(|(id, _)| *id),
    };

    if let Some(id) = matched {
        let doc = bind_id(doc, id, collection)?;
        let modified = coll.get(&id) != Some(&doc);
        coll.insert(id, doc);
        return Ok(ReplaceOutcome {
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_count: 0,
            upserted_id: None,
        });
    }

    if !options.upsert {
        return Ok(ReplaceOutcome::default());
    }

    let id = match (filter, doc.id()) {
        (Filter::ById(id), _) => *id,
        (_, Some(Value::ObjectId(id))) => *id,
        _ => ObjectId::new(),
    };
    let doc = bind_id(doc, id, collection)?;
    coll.insert(id, doc);
    tracing::trace!(target: "recordkeeper::storage", collection, %id, "upserted document");
    Ok(ReplaceOutcome {
        matched_count: 0,
        modified_count: 0,
        upserted_count: 1,
        upserted_id: Some(id),
    })
}

/// Give `doc` the identifier `id`, refusing to change an existing one
fn bind_id(mut doc: Record, id: ObjectId, collection: &str) -> StoreResult<Record> {
    match doc.id().cloned() {
        None => {
            doc.insert(ID_FIELD, id);
            Ok(doc)
        }
        Some(Value::ObjectId(existing)) if existing == id => Ok(doc),
        Some(_) => Err(StoreError::ImmutableId {
            collection: collection.to_string(),
        }),
    }
}

impl DocumentStore for MemoryStore {
    fn database(&self) -> &str {
        &self.database
    }

    fn list_collections(&self) -> StoreResult<Vec<String>> {
        self.check_open()?;
        let mut names: Vec<String> = self.collections.iter().map(|e| e.key().clone()).collect();
        names.sort();
        Ok(names)
    }

    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Record>> {
        self.check_open()?;
        let Some(coll) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        let found = match filter {
            Filter::ById(id) => coll.get(id).cloned().into_iter().collect(),
            _ => coll.values().filter(|r| filter.matches(r)).cloned().collect(),
        };
        Ok(found)
    }

    fn insert_one(&self, collection: &str, mut doc: Record) -> StoreResult<InsertOutcome> {
        self.check_open()?;
        let id = match doc.id().cloned() {
            None => {
                let id = ObjectId::new();
                doc.insert(ID_FIELD, id);
                id
            }
            Some(Value::ObjectId(id)) => id,
            Some(other) => {
                return Err(StoreError::InvalidDocument {
                    reason: format!("_id must be an ObjectId, got {}", other.type_name()),
                })
            }
        };

        let mut coll = self.collections.entry(collection.to_string()).or_default();
        if coll.contains_key(&id) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                id,
            });
        }
        coll.insert(id, doc);
        tracing::trace!(target: "recordkeeper::storage", collection, %id, "inserted document");
        Ok(InsertOutcome { inserted_id: id })
    }

    fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        doc: Record,
        options: ReplaceOptions,
    ) -> StoreResult<ReplaceOutcome> {
        self.check_open()?;
        let mut coll = self.collections.entry(collection.to_string()).or_default();
        let result = replace_in(&mut *coll, collection, filter, doc, options);

        // A failed or non-matching replace must not leave an empty collection.
        let now_empty = coll.is_empty();
        drop(coll);
        if now_empty {
            self.collections.remove_if(collection, |_, c| c.is_empty());
        }
        result
    }

    fn close(&self) -> StoreResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
