//! Save Scenarios
//!
//! Versioned saves driven through bridge lines, checking both the primary
//! collection and the history collection afterwards.

use crate::common::*;
use proptest::prelude::*;
use recordkeeper_core::DocumentStore;
use serde_json::json;

const HEX: &str = "507f1f77bcf86cd799439011";

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn wrapped_original_id_archives_then_replaces() {
    let (store, mut session) = create_connected_session();

    let response = send(
        &mut session,
        json!({"Save": {
            "collection": "items",
            "document": {"v": 2},
            "original_document": {"_id": {"$oid": HEX}, "v": 1},
            "needs_history": true,
            "username": "editor"
        }}),
    );
    assert_eq!(
        response,
        json!({"success": true, "message": "Data saved successfully", "history_records_created": 1})
    );

    let history = load(&mut session, "items_history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["original_id"], json!({"$oid": HEX}));
    assert_eq!(history[0]["v"], json!(1));
    assert_eq!(history[0]["archived_by"], json!("editor"));
    assert_eq!(history[0]["archived_date"], json!(ARCHIVED_AT));
    assert_ne!(history[0]["_id"], json!({"$oid": HEX}));

    assert_eq!(load(&mut session, "items"), vec![json!({"_id": {"$oid": HEX}, "v": 2})]);
    assert_eq!(store.document_count("items"), 1);
}

#[test]
fn missing_original_falls_back_to_document() {
    let (store, mut session) = create_connected_session();

    let response = send(
        &mut session,
        json!({"Save": {
            "collection": "items",
            "document": {"_id": HEX, "v": 5}
        }}),
    );
    assert_eq!(response["history_records_created"], json!(1));

    let history = load(&mut session, "items_history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["original_id"], json!({"$oid": HEX}));
    assert_eq!(history[0]["v"], json!(5));
    assert_eq!(history[0]["archived_by"], json!("unknown"));

    assert_eq!(load(&mut session, "items"), vec![json!({"_id": {"$oid": HEX}, "v": 5})]);
    assert_eq!(store.document_count("items_history"), 1);
}

#[test]
fn malformed_original_id_writes_nothing() {
    let (store, mut session) = create_connected_session();

    let response = send(
        &mut session,
        json!({"Save": {
            "collection": "items",
            "document": {"v": 2},
            "original_document": {"_id": {"foo": "bar"}, "v": 1}
        }}),
    );
    assert_eq!(response["success"], json!(false));
    assert_eq!(response["kind"], json!("InvalidIdentifier"));
    assert!(store.list_collections().unwrap().is_empty());
}

#[test]
fn document_id_never_overrides_original_id() {
    let (store, mut session) = create_connected_session();
    let other = "0123456789abcdef01234567";

    send(
        &mut session,
        json!({"Save": {
            "collection": "items",
            "document": {"_id": {"$oid": other}, "v": 2},
            "original_document": {"_id": HEX, "v": 1}
        }}),
    );

    assert_eq!(load(&mut session, "items"), vec![json!({"_id": {"$oid": HEX}, "v": 2})]);
    assert_eq!(store.document_count("items"), 1);
}

#[test]
fn history_disabled_skips_archive() {
    let (store, mut session) = create_connected_session();

    let response = send(
        &mut session,
        json!({"Save": {
            "collection": "items",
            "document": {"v": 2},
            "original_document": {"_id": HEX, "v": 1},
            "needs_history": false
        }}),
    );
    assert_eq!(response["history_records_created"], json!(0));
    assert_eq!(store.document_count("items_history"), 0);
    assert_eq!(store.document_count("items"), 1);
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn repeated_save_without_history_converges() {
    let (_store, mut session) = create_connected_session();
    let save = json!({"Save": {
        "collection": "items",
        "document": {"v": 2},
        "original_document": {"_id": HEX, "v": 1},
        "needs_history": false
    }});

    send(&mut session, save.clone());
    let first = load(&mut session, "items");
    send(&mut session, save);
    let second = load(&mut session, "items");

    assert_eq!(first, second);
    assert_eq!(second, vec![json!({"_id": {"$oid": HEX}, "v": 2})]);
}

#[test]
fn repeated_save_with_history_keeps_every_entry() {
    let (_store, mut session) = create_connected_session();
    let save = json!({"Save": {
        "collection": "items",
        "document": {"v": 2},
        "original_document": {"_id": HEX, "v": 1}
    }});

    send(&mut session, save.clone());
    send(&mut session, save);

    let history = load(&mut session, "items_history");
    assert_eq!(history.len(), 2);
    assert_ne!(history[0]["_id"], history[1]["_id"]);
    for entry in &history {
        assert_eq!(entry["original_id"], json!({"$oid": HEX}));
    }
}

#[test]
fn history_lookup_filters_by_original_id() {
    let (_store, mut session) = create_connected_session();
    let other = "0123456789abcdef01234567";
    for id in [HEX, other, HEX] {
        send(
            &mut session,
            json!({"Save": {
                "collection": "items",
                "document": {"v": 2},
                "original_document": {"_id": id, "v": 1}
            }}),
        );
    }

    let response = send(
        &mut session,
        json!({"History": {"history_collection": "items_history", "id": {"$oid": HEX}}}),
    );
    assert_eq!(response["data"].as_array().map(Vec::len), Some(2));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn persisted_id_matches_original(
        bytes in proptest::array::uniform12(any::<u8>()),
        wrapped in any::<bool>(),
        v in 0i64..1000,
    ) {
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        let original_id = if wrapped { json!({"$oid": hex}) } else { json!(hex) };
        let (_store, mut session) = create_connected_session();

        let response = send(
            &mut session,
            json!({"Save": {
                "collection": "items",
                "document": {"_id": {"$oid": HEX}, "v": v},
                "original_document": {"_id": original_id, "v": -1}
            }}),
        );
        prop_assert_eq!(&response["success"], &json!(true));

        let items = load(&mut session, "items");
        prop_assert_eq!(items, vec![json!({"_id": {"$oid": hex}, "v": v})]);
    }
}
