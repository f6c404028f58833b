//! Failure Ordering Tests
//!
//! The history insert and the primary replace are separate store calls.
//! These tests pin what each failure leaves behind.

use crate::common::*;
use recordkeeper_core::StoreError;
use serde_json::json;

const HEX: &str = "507f1f77bcf86cd799439011";

fn save_line() -> serde_json::Value {
    json!({"Save": {
        "collection": "items",
        "document": {"v": 2},
        "original_document": {"_id": {"$oid": HEX}, "v": 1}
    }})
}

#[test]
fn history_failure_skips_replace() {
    let (store, faulty, mut session) = create_faulty_session();
    faulty.fail_next_insert(StoreError::unavailable("connection reset"));

    let response = send(&mut session, save_line());
    assert_eq!(response["success"], json!(false));
    assert_eq!(response["kind"], json!("HistoryWrite"));
    assert_eq!(faulty.replace_calls(), 0);
    assert_eq!(store.document_count("items"), 0);
    assert_eq!(store.document_count("items_history"), 0);
}

#[test]
fn replace_failure_keeps_history_entry() {
    let (store, faulty, mut session) = create_faulty_session();
    faulty.fail_next_replace(StoreError::unavailable("connection reset"));

    let response = send(&mut session, save_line());
    assert_eq!(response["success"], json!(false));
    assert_eq!(response["kind"], json!("Replace"));
    assert!(response["message"].as_str().unwrap_or_default().contains(HEX));
    assert_eq!(store.document_count("items_history"), 1);
    assert_eq!(store.document_count("items"), 0);
}

#[test]
fn retry_after_replace_failure_adds_second_entry() {
    let (store, faulty, mut session) = create_faulty_session();
    faulty.fail_next_replace(StoreError::unavailable("connection reset"));

    send(&mut session, save_line());
    let response = send(&mut session, save_line());
    assert_eq!(response["success"], json!(true));
    assert_eq!(store.document_count("items_history"), 2);
    assert_eq!(store.document_count("items"), 1);
}

#[test]
fn probe_failure_leaves_session_disconnected() {
    let (_store, faulty, mut session) = create_faulty_session();
    faulty.fail_next_list(StoreError::unavailable("no primary"));

    let response = send(&mut session, connect_line());
    assert_eq!(response["success"], json!(false));
    assert_eq!(response["kind"], json!("ConnectionFailed"));
    assert_eq!(send(&mut session, json!("Status")), json!({"connected": false}));
}

#[test]
fn validation_failures_never_reach_the_store() {
    let (_store, faulty, mut session) = create_faulty_session();

    let missing = send(&mut session, json!({"Save": {"collection": "items"}}));
    assert_eq!(missing["kind"], json!("MissingDocument"));

    let bad_name = send(
        &mut session,
        json!({"Save": {"collection": "", "document": {"_id": HEX}}}),
    );
    assert_eq!(bad_name["kind"], json!("InvalidCollection"));

    let no_id = send(
        &mut session,
        json!({"Save": {"collection": "items", "document": {"v": 1}}}),
    );
    assert_eq!(no_id["kind"], json!("InvalidIdentifier"));

    assert_eq!(faulty.insert_calls(), 0);
    assert_eq!(faulty.replace_calls(), 0);
}
