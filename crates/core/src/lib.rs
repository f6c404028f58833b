//! Core types and traits for recordkeeper
//!
//! This crate defines the foundational types used throughout the system:
//! - ObjectId: Canonical document identifier
//! - Value: Unified value enum for document fields
//! - Record: Schema-free document with a distinguished `_id` field
//! - Identity: Resolution of loosely-typed wire identifiers into ObjectIds
//! - ArchiveZone: Zone-qualified rendering of archival timestamps
//! - Error: Store error hierarchy
//! - Traits: DocumentStore and Connector abstractions
//! - Uri: connection strings for drivers that take one

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod connect;
pub mod error;
pub mod identity;
pub mod record;
pub mod timestamp;
pub mod traits;
pub mod types;
pub mod uri;
pub mod value;

// Re-export commonly used types and traits
pub use connect::{ConnectError, ConnectOptions, Credentials};
pub use error::{StoreError, StoreResult};
pub use identity::{resolve, resolve_record_id, IdentifierFormatError, RawIdentifier, OID_MARKER};
pub use record::{Record, ID_FIELD};
pub use timestamp::{ArchiveZone, ArchiveZoneError, DEFAULT_TIME_ZONE, DEFAULT_ZONE_LABEL};
pub use traits::{Connector, DocumentStore, Filter, InsertOutcome, ReplaceOptions, ReplaceOutcome};
pub use types::{ObjectId, ObjectIdError, OBJECT_ID_HEX_LEN};
pub use uri::{connection_uri, encode_uri_component, redacted_uri};
pub use value::Value;
