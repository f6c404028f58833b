//! Integration tests for the storage layer
//!
//! These tests verify that MemoryStore works correctly as a complete system:
//! - Operations under concurrent access
//! - Handles sharing one database
//! - Connector authentication and database routing

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use recordkeeper_core::{
    ConnectOptions, Connector, Credentials, DocumentStore, Filter, ObjectId, Record,
    ReplaceOptions, StoreError, Value,
};
use recordkeeper_storage::{MemoryConnector, MemoryStore};

// ============================================================================
// Helper Functions
// ============================================================================

fn options(database: &str) -> ConnectOptions {
    ConnectOptions {
        scheme: "memory".into(),
        host: "localhost".into(),
        database: database.into(),
        max_pool_size: 10,
        server_selection_timeout: std::time::Duration::from_millis(5000),
        socket_timeout: std::time::Duration::from_millis(45000),
    }
}

fn record(n: i64) -> Record {
    [("n", Value::Int(n))].into_iter().collect()
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_inserts_mint_unique_ids() {
    let store = Arc::new(MemoryStore::new("records"));
    let mut handles = Vec::new();

    for t in 0..8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            (0..100)
                .map(|i| store.insert_one("items", record(t * 100 + i)).unwrap().inserted_id)
                .collect::<Vec<_>>()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "duplicate id {}", id);
        }
    }
    assert_eq!(store.document_count("items"), 800);
}

#[test]
fn test_concurrent_upserts_same_id_keep_one_document() {
    let store = Arc::new(MemoryStore::new("records"));
    let id = ObjectId::new();
    let mut handles = Vec::new();

    for t in 0..8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                store
                    .replace_one(
                        "items",
                        &Filter::ById(id),
                        record(t * 50 + i),
                        ReplaceOptions::upsert(),
                    )
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let docs = store.find("items", &Filter::All).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id(), Some(&Value::ObjectId(id)));
}

#[test]
fn test_concurrent_history_appends() {
    let store = Arc::new(MemoryStore::new("records"));
    let original = ObjectId::new();
    let mut handles = Vec::new();

    for _ in 0..4 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for _ in 0..25 {
                let entry: Record = [("original_id", Value::ObjectId(original))]
                    .into_iter()
                    .collect();
                store.insert_one("items_history", entry).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let entries = store
        .find("items_history", &Filter::eq("original_id", original))
        .unwrap();
    assert_eq!(entries.len(), 100);
}

// ============================================================================
// Handles
// ============================================================================

#[test]
fn test_closing_one_handle_leaves_others_open() {
    let store = MemoryStore::new("records");
    let other = store.handle();
    other.insert_one("items", record(1)).unwrap();

    other.close().unwrap();
    assert_eq!(other.find("items", &Filter::All), Err(StoreError::Closed));
    assert_eq!(store.find("items", &Filter::All).unwrap().len(), 1);
}

// ============================================================================
// Connector
// ============================================================================

#[test]
fn test_connector_routes_databases() {
    let connector = MemoryConnector::new().with_account("operator", "secret");
    let credentials = Credentials::new("operator", "secret");

    let a = connector.connect(&options("a"), &credentials).unwrap();
    let b = connector.connect(&options("b"), &credentials).unwrap();
    a.insert_one("items", record(1)).unwrap();

    assert_eq!(a.database(), "a");
    assert_eq!(b.list_collections().unwrap(), Vec::<String>::new());
    assert_eq!(connector.database("a").document_count("items"), 1);
}

#[test]
fn test_connector_data_survives_reconnect() {
    let connector = MemoryConnector::new().with_account("operator", "secret");
    let credentials = Credentials::new("operator", "secret");

    let first = connector.connect(&options("records"), &credentials).unwrap();
    first.insert_one("items", record(7)).unwrap();
    first.close().unwrap();

    let second = connector.connect(&options("records"), &credentials).unwrap();
    let docs = second.find("items", &Filter::All).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].get("n"), Some(&Value::Int(7)));
}
