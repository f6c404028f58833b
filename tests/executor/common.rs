//! Common test utilities for executor tests

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use recordkeeper::{bridge, EditorConfig, MemoryConnector, MemoryStore, SaveCoordinator, Session};
use recordkeeper_core::{ArchiveZone, Connector, DocumentStore};
use recordkeeper_storage::testing::{FaultyStore, StaticConnector};
use serde_json::{json, Value as JsonValue};

pub const USERNAME: &str = "operator";
pub const PASSWORD: &str = "secret";
pub const DATABASE: &str = "records";
pub const ARCHIVED_AT: &str = "18/10/2026, 15:03:05 AEST";

/// Coordinator pinned to 2026-10-18T04:03:05Z
pub fn fixed_coordinator() -> SaveCoordinator {
    SaveCoordinator::new(ArchiveZone::aest(), "unknown")
        .with_clock(|| Utc.with_ymd_and_hms(2026, 10, 18, 4, 3, 5).unwrap())
}

/// Session over any connector, with the fixed clock
pub fn session_with(connector: Arc<dyn Connector>) -> Session {
    Session::new(connector, EditorConfig::default())
        .unwrap()
        .with_coordinator(fixed_coordinator())
}

/// Disconnected session over an in-memory connector with one account
pub fn create_session() -> (Arc<MemoryConnector>, Session) {
    let connector = Arc::new(MemoryConnector::new().with_account(USERNAME, PASSWORD));
    let session = session_with(connector.clone());
    (connector, session)
}

/// Connected session over an in-memory connector
pub fn create_connected_session() -> (MemoryStore, Session) {
    let (connector, mut session) = create_session();
    let response = send(&mut session, connect_line());
    assert_eq!(response["success"], json!(true), "connect failed: {}", response);
    (connector.database(DATABASE), session)
}

/// Connected session whose store fails on demand
pub fn create_faulty_session() -> (MemoryStore, Arc<FaultyStore>, Session) {
    let inner = MemoryStore::new(DATABASE);
    let faulty = Arc::new(FaultyStore::new(Arc::new(inner.handle())));
    let store: Arc<dyn DocumentStore> = faulty.clone();
    let mut session = session_with(Arc::new(StaticConnector::new(store)));
    let response = send(&mut session, connect_line());
    assert_eq!(response["success"], json!(true), "connect failed: {}", response);
    (inner, faulty, session)
}

pub fn connect_line() -> JsonValue {
    json!({"Connect": {"username": USERNAME, "password": PASSWORD}})
}

/// Send one command through the bridge and parse the response line
pub fn send(session: &mut Session, command: JsonValue) -> JsonValue {
    let line = bridge::handle_line(session, &command.to_string());
    serde_json::from_str(&line).unwrap()
}

/// Every document in `collection`, as canonical JSON
pub fn load(session: &mut Session, collection: &str) -> Vec<JsonValue> {
    let response = send(session, json!({"Load": {"collection": collection}}));
    assert_eq!(response["success"], json!(true), "load failed: {}", response);
    response["data"].as_array().cloned().unwrap_or_default()
}
