//! Editor API Tests
//!
//! The typed wrapper over the same session.

use std::sync::Arc;

use crate::common::*;
use recordkeeper::{Editor, Error, ObjectId, Record, Value};

fn connected_editor() -> (Arc<recordkeeper::MemoryConnector>, Editor) {
    let (connector, session) = create_session();
    let mut editor = Editor::from_session(session);
    editor.connect(USERNAME, PASSWORD).unwrap();
    (connector, editor)
}

#[test]
fn status_follows_connect_and_disconnect() {
    let (_connector, mut editor) = connected_editor();
    assert!(editor.status().unwrap());
    editor.disconnect().unwrap();
    assert!(!editor.status().unwrap());
    assert_eq!(editor.load("items"), Err(Error::NotConnected));
}

#[test]
fn save_then_load_and_history() {
    let (_connector, mut editor) = connected_editor();
    let id = ObjectId::new();
    let original: Record = [("_id", Value::ObjectId(id)), ("v", Value::Int(1))]
        .into_iter()
        .collect();
    let mut edited = original.clone();
    edited.insert("v", 2i64);

    let summary = editor
        .save("items", edited.clone(), Some(original), Some("editor"))
        .unwrap();
    assert_eq!(summary.id, id);
    assert_eq!(summary.history_records_created, 1);
    assert!(summary.upserted);

    assert_eq!(editor.load("items").unwrap(), vec![edited]);

    let history = editor.history("items", id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].get("v"), Some(&Value::Int(1)));
    assert_eq!(
        history[0].get("archived_date"),
        Some(&Value::String(ARCHIVED_AT.into()))
    );
}

#[test]
fn unchanged_resave_is_not_modified() {
    let (_connector, mut editor) = connected_editor();
    let original: Record = [("_id", Value::ObjectId(ObjectId::new())), ("v", Value::Int(1))]
        .into_iter()
        .collect();
    editor
        .save("items", original.clone(), Some(original.clone()), None)
        .unwrap();
    let summary = editor
        .save("items", original.clone(), Some(original), None)
        .unwrap();
    assert!(!summary.modified);
    assert!(!summary.upserted);
}

#[test]
fn bad_credentials_are_typed() {
    let (_connector, session) = create_session();
    let mut editor = Editor::from_session(session);
    match editor.connect(USERNAME, "wrong") {
        Err(Error::ConnectionFailed { .. }) => {}
        other => panic!("Expected ConnectionFailed, got {:?}", other),
    }
}
