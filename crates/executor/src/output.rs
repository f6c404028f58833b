//! Output enum for command execution results.
//!
//! Every command produces exactly one output type. This mapping is deterministic:
//! the same command always produces the same output variant (though the values
//! may differ based on database state).

use serde::{Deserialize, Serialize};

use recordkeeper_core::{ObjectId, Record};

/// Successful command execution results.
///
/// Each [`Command`](crate::Command) variant maps to exactly one `Output` variant.
///
/// # Example
///
/// ```text
/// use recordkeeper_executor::{Command, Output};
///
/// match session.execute(Command::Load { collection: "products".into() })? {
///     Output::Records(records) => println!("{} records", records.len()),
///     _ => unreachable!("Load always returns Records"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Session opened
    Connected {
        /// Operator-facing confirmation
        message: String,
    },

    /// Records read from a collection
    Records(#[serde(with = "crate::json::canonical_records")] Vec<Record>),

    /// Save completed
    Saved {
        /// Authoritative id the record was saved under
        id: ObjectId,
        /// History entries written (0 or 1)
        history_records_created: u32,
        /// Documents matched by the replace
        matched_count: u64,
        /// Documents whose content changed
        modified_count: u64,
        /// Documents inserted because none matched
        upserted_count: u64,
        /// Id of the inserted document, if any
        upserted_id: Option<ObjectId>,
    },

    /// Session state
    Status {
        /// A session is open
        connected: bool,
    },

    /// Session closed (or none was open)
    Disconnected,

    /// Ping response
    Pong {
        /// Backend version
        version: String,
    },
}
