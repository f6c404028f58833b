//! Identity resolution
//!
//! Record identifiers arrive from the front-end in several loose shapes.
//! This module is the single point where those shapes are told apart:
//! [`RawIdentifier::classify`] sorts a raw value into a closed set of
//! variants and [`resolve`] turns the accepted ones into an [`ObjectId`].
//! Nothing downstream branches on identifier shape.
//!
//! Accepted shapes, in priority order:
//!
//! | Shape | Example |
//! |-------|---------|
//! | typed id | `Value::ObjectId(..)` |
//! | wrapped | `{"$oid": "507f1f77bcf86cd799439011"}` |
//! | bare string | `"507f1f77bcf86cd799439011"` |

use thiserror::Error;

use crate::record::Record;
use crate::types::{ObjectId, ObjectIdError};
use crate::value::Value;

/// Marker field of the wrapped identifier form
pub const OID_MARKER: &str = "$oid";

/// Identifier failed to resolve
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierFormatError {
    /// No identifier, or an explicit null
    #[error("identifier is missing")]
    Missing,

    /// Value is neither a typed id, a wrapped id, nor a string
    #[error("invalid identifier format: {found}")]
    UnrecognizedShape {
        /// Description of the value that was found
        found: String,
    },

    /// String is not a valid identifier lexeme
    #[error("invalid identifier '{lexeme}': {source}")]
    InvalidLexeme {
        /// The rejected string
        lexeme: String,
        /// Why it was rejected
        #[source]
        source: ObjectIdError,
    },
}

/// A raw identifier, classified by shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawIdentifier<'a> {
    /// Already a typed id
    Canonical(ObjectId),
    /// Object carrying the `$oid` marker with a string payload
    Wrapped(&'a str),
    /// Plain string
    Bare(&'a str),
    /// Any other value
    Unrecognized(&'a Value),
    /// Absent or null
    Absent,
}

impl<'a> RawIdentifier<'a> {
    /// Classify a raw identifier value
    pub fn classify(raw: Option<&'a Value>) -> Self {
        let value = match raw {
            None | Some(Value::Null) => return RawIdentifier::Absent,
            Some(value) => value,
        };
        match value {
            Value::ObjectId(id) => RawIdentifier::Canonical(*id),
            Value::Object(map) => match map.get(OID_MARKER) {
                Some(Value::String(inner)) => RawIdentifier::Wrapped(inner),
                _ => RawIdentifier::Unrecognized(value),
            },
            Value::String(s) => RawIdentifier::Bare(s),
            other => RawIdentifier::Unrecognized(other),
        }
    }

    /// Resolve into a canonical id
    ///
    /// # Errors
    ///
    /// Returns `IdentifierFormatError` for absent or unrecognized shapes and
    /// for strings that are not valid lexemes.
    pub fn resolve(self) -> Result<ObjectId, IdentifierFormatError> {
        match self {
            RawIdentifier::Canonical(id) => Ok(id),
            RawIdentifier::Wrapped(s) | RawIdentifier::Bare(s) => {
                ObjectId::parse_str(s).map_err(|source| IdentifierFormatError::InvalidLexeme {
                    lexeme: s.to_string(),
                    source,
                })
            }
            RawIdentifier::Unrecognized(value) => Err(IdentifierFormatError::UnrecognizedShape {
                found: describe(value),
            }),
            RawIdentifier::Absent => Err(IdentifierFormatError::Missing),
        }
    }
}

/// Resolve a raw identifier value into a canonical [`ObjectId`]
///
/// # Errors
///
/// See [`RawIdentifier::resolve`].
pub fn resolve(raw: Option<&Value>) -> Result<ObjectId, IdentifierFormatError> {
    RawIdentifier::classify(raw).resolve()
}

/// Resolve the identifier field of a record
///
/// # Errors
///
/// See [`RawIdentifier::resolve`].
pub fn resolve_record_id(record: &Record) -> Result<ObjectId, IdentifierFormatError> {
    resolve(record.id())
}

fn describe(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("Object with keys [{}]", keys.join(", "))
        }
        other => other.type_name().to_string(),
    }
}
