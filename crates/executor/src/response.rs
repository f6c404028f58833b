//! Response envelope for the line bridge.
//!
//! The front-end expects loosely-shaped JSON objects rather than the tagged
//! [`Output`] enum, so each result is flattened into a [`Response`] with
//! only the fields that apply.
//!
//! | Result | JSON |
//! |--------|------|
//! | `Connected` | `{"success": true, "message": ...}` |
//! | `Records` | `{"success": true, "data": [...]}` |
//! | `Saved` | `{"success": true, "message": "Data saved successfully", "history_records_created": n}` |
//! | `Status` | `{"connected": bool}` |
//! | `Disconnected` | `{"success": true}` |
//! | `Pong` | `{"success": true, "version": ...}` |
//! | any error | `{"success": false, "message": ..., "kind": ...}` |

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::json::records_to_json;
use crate::{Error, Output, Result};

/// Message returned for a successful save.
pub const SAVED_MESSAGE: &str = "Data saved successfully";

const FALLBACK_LINE: &str =
    r#"{"success":false,"message":"internal error: response could not be encoded","kind":"Internal"}"#;

/// One bridge response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the command succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Operator-facing text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Records, in canonical JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    /// History entries written by a save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_records_created: Option<u32>,
    /// Session state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,
    /// Backend version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Error category, see [`Error::kind`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Response {
    /// Render a command result.
    pub fn from_result(result: &Result<Output>) -> Self {
        match result {
            Ok(output) => Self::from_output(output),
            Err(err) => Self::failure(err),
        }
    }

    /// Render a successful output.
    pub fn from_output(output: &Output) -> Self {
        match output {
            Output::Connected { message } => Self {
                success: Some(true),
                message: Some(message.clone()),
                ..Self::default()
            },
            Output::Records(records) => Self {
                success: Some(true),
                data: Some(records_to_json(records)),
                ..Self::default()
            },
            Output::Saved {
                history_records_created,
                ..
            } => Self {
                success: Some(true),
                message: Some(SAVED_MESSAGE.to_string()),
                history_records_created: Some(*history_records_created),
                ..Self::default()
            },
            Output::Status { connected } => Self {
                connected: Some(*connected),
                ..Self::default()
            },
            Output::Disconnected => Self {
                success: Some(true),
                ..Self::default()
            },
            Output::Pong { version } => Self {
                success: Some(true),
                version: Some(version.clone()),
                ..Self::default()
            },
        }
    }

    /// Render an error.
    pub fn failure(err: &Error) -> Self {
        Self {
            success: Some(false),
            message: Some(err.to_string()),
            kind: Some(err.kind().to_string()),
            ..Self::default()
        }
    }

    /// Whether this response reports a failure.
    pub fn is_failure(&self) -> bool {
        self.success == Some(false)
    }

    /// Encode as a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| FALLBACK_LINE.to_string())
    }
}
