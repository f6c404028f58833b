//! Bridge Line Tests
//!
//! Connection lifecycle and envelope shapes as the front-end sees them.

use std::io::Cursor;

use crate::common::*;
use recordkeeper::bridge;
use serde_json::{json, Value as JsonValue};

#[test]
fn connect_reports_database() {
    let (_connector, mut session) = create_session();
    assert_eq!(
        send(&mut session, connect_line()),
        json!({"success": true, "message": "Connected to records database successfully"})
    );
    assert_eq!(send(&mut session, json!("Status")), json!({"connected": true}));
}

#[test]
fn bad_credentials_report_operator_message() {
    let (_connector, mut session) = create_session();
    let response = send(
        &mut session,
        json!({"Connect": {"username": USERNAME, "password": "wrong"}}),
    );
    assert_eq!(response["success"], json!(false));
    assert_eq!(
        response["message"],
        json!("Invalid username or password. Please check your credentials.")
    );
    assert_eq!(send(&mut session, json!("Status")), json!({"connected": false}));
}

#[test]
fn unreachable_host_reports_network_message() {
    let (connector, mut session) = create_session();
    connector.set_reachable(false);
    let response = send(&mut session, connect_line());
    assert_eq!(
        response["message"],
        json!("Cannot connect to the database server. Please check your internet connection.")
    );
}

#[test]
fn commands_without_session_fail() {
    let (_connector, mut session) = create_session();
    for command in [
        json!({"Load": {"collection": "items"}}),
        json!({"Save": {"collection": "items", "document": {"v": 1}}}),
        json!({"History": {"history_collection": "items_history", "id": "507f1f77bcf86cd799439011"}}),
    ] {
        assert_eq!(
            send(&mut session, command),
            json!({"success": false, "message": "No database connection", "kind": "NotConnected"})
        );
    }
}

#[test]
fn disconnect_is_idempotent() {
    let (_store, mut session) = create_connected_session();
    assert_eq!(send(&mut session, json!("Disconnect")), json!({"success": true}));
    assert_eq!(send(&mut session, json!("Disconnect")), json!({"success": true}));
    assert_eq!(send(&mut session, json!("Status")), json!({"connected": false}));
}

#[test]
fn reconnect_replaces_session() {
    let (_store, mut session) = create_connected_session();
    assert_eq!(send(&mut session, connect_line())["success"], json!(true));
    assert!(session.is_connected());
}

#[test]
fn load_keeps_object_ids_and_bytes() {
    let (_store, mut session) = create_connected_session();
    let document = json!({
        "_id": {"$oid": "507f1f77bcf86cd799439011"},
        "blob": {"$bytes": "AQID"},
        "owner": {"$oid": "0123456789abcdef01234567"},
        "tags": ["a", "b"]
    });
    send(
        &mut session,
        json!({"Save": {"collection": "items", "document": document, "needs_history": false}}),
    );
    assert_eq!(load(&mut session, "items"), vec![document]);
}

#[test]
fn ping_reports_version() {
    let (_connector, mut session) = create_session();
    let response = send(&mut session, json!("Ping"));
    assert_eq!(response["success"], json!(true));
    assert_eq!(response["version"], json!(env!("CARGO_PKG_VERSION")));
}

#[test]
fn serve_skips_blank_lines_and_survives_garbage() {
    let (_connector, mut session) = create_session();
    let input = format!("\n{}\nnot json\n\"Status\"\n", connect_line());
    let mut output = Vec::new();

    let handled = bridge::serve(&mut session, Cursor::new(input), &mut output).unwrap();
    assert_eq!(handled, 3);

    let lines: Vec<JsonValue> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines[0]["success"], json!(true));
    assert_eq!(lines[1]["success"], json!(false));
    assert_eq!(lines[2], json!({"connected": true}));
}
