//! Document identifier type
//!
//! `ObjectId` is the canonical address of one document in one collection.
//! It is a 12-byte value whose text form is 24 hexadecimal characters.
//!
//! ## Layout
//!
//! | Bytes | Content |
//! |-------|---------|
//! | 0..4  | Seconds since Unix epoch, big-endian |
//! | 4..9  | Random value, fixed for the lifetime of the process |
//! | 9..12 | Counter, big-endian, starting at a random value |
//!
//! The only way to build an `ObjectId` from untrusted input is
//! [`ObjectId::parse_str`]; the identity resolver in [`crate::identity`]
//! is built on top of it.

use once_cell::sync::Lazy;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Number of raw bytes in an ObjectId
pub const OBJECT_ID_LEN: usize = 12;

/// Number of hex characters in the text form of an ObjectId
pub const OBJECT_ID_HEX_LEN: usize = OBJECT_ID_LEN * 2;

const COUNTER_MASK: u32 = 0x00FF_FFFF;

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(rand::random);

static COUNTER: Lazy<AtomicU32> =
    Lazy::new(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK));

/// Canonical document identifier
///
/// Ordering follows the byte layout, so ids minted later in time sort
/// after ids minted earlier (at one-second granularity).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

/// Error when parsing the text form of an ObjectId
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectIdError {
    /// Lexeme is not exactly 24 characters long
    InvalidLength {
        /// Actual length in characters
        length: usize,
    },
    /// Lexeme contains a non-hexadecimal character
    InvalidChar {
        /// The offending character
        char: char,
        /// Character position of the offending character
        position: usize,
    },
}

impl fmt::Display for ObjectIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectIdError::InvalidLength { length } => write!(
                f,
                "object id must be {} hex characters, got {}",
                OBJECT_ID_HEX_LEN, length
            ),
            ObjectIdError::InvalidChar { char, position } => write!(
                f,
                "invalid character '{}' at position {} (only hex digits allowed)",
                char, position
            ),
        }
    }
}

impl std::error::Error for ObjectIdError {}

impl ObjectId {
    /// Mint a fresh, process-unique ObjectId
    pub fn new() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as u32;
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        Self::from_parts(secs, *PROCESS_UNIQUE, counter)
    }

    /// Assemble an ObjectId from its three components
    ///
    /// Only the low 24 bits of `counter` are used.
    pub fn from_parts(secs: u32, process_unique: [u8; 5], counter: u32) -> Self {
        let mut bytes = [0u8; OBJECT_ID_LEN];
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&process_unique);
        bytes[9..12].copy_from_slice(&(counter & COUNTER_MASK).to_be_bytes()[1..4]);
        ObjectId(bytes)
    }

    /// Create an ObjectId from raw bytes
    #[inline]
    pub const fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        ObjectId(bytes)
    }

    /// Parse the 24-character hexadecimal text form
    ///
    /// Upper- and lower-case digits are both accepted.
    ///
    /// # Errors
    ///
    /// Returns `ObjectIdError` if the lexeme has the wrong length or
    /// contains a non-hex character.
    pub fn parse_str(s: &str) -> Result<Self, ObjectIdError> {
        let length = s.chars().count();
        if length != OBJECT_ID_HEX_LEN {
            return Err(ObjectIdError::InvalidLength { length });
        }

        let mut nibbles = [0u8; OBJECT_ID_HEX_LEN];
        for (position, c) in s.chars().enumerate() {
            nibbles[position] = c
                .to_digit(16)
                .ok_or(ObjectIdError::InvalidChar { char: c, position })?
                as u8;
        }

        let mut bytes = [0u8; OBJECT_ID_LEN];
        for (i, pair) in nibbles.chunks(2).enumerate() {
            bytes[i] = (pair[0] << 4) | pair[1];
        }
        Ok(ObjectId(bytes))
    }

    /// Get the raw bytes
    #[inline]
    pub const fn bytes(&self) -> [u8; OBJECT_ID_LEN] {
        self.0
    }

    /// Render as 24 lowercase hex characters
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(OBJECT_ID_HEX_LEN);
        for b in self.0 {
            out.push_str(&format!("{:02x}", b));
        }
        out
    }

    /// Seconds since Unix epoch embedded in the id
    pub fn timestamp_secs(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ObjectId::parse_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const SAMPLE: &str = "507f1f77bcf86cd799439011";

    #[test]
    fn test_parse_and_render_round_trip() {
        let id = ObjectId::parse_str(SAMPLE).unwrap();
        assert_eq!(id.to_hex(), SAMPLE);
        assert_eq!(id.to_string(), SAMPLE);
    }

    #[test]
    fn test_parse_uppercase_renders_lowercase() {
        let id = ObjectId::parse_str(&SAMPLE.to_uppercase()).unwrap();
        assert_eq!(id.to_hex(), SAMPLE);
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            ObjectId::parse_str("abc123"),
            Err(ObjectIdError::InvalidLength { length: 6 })
        );
        assert_eq!(
            ObjectId::parse_str(""),
            Err(ObjectIdError::InvalidLength { length: 0 })
        );
    }

    #[test]
    fn test_parse_non_hex() {
        let err = ObjectId::parse_str("507f1f77bcf86cd79943901g").unwrap_err();
        assert_eq!(
            err,
            ObjectIdError::InvalidChar {
                char: 'g',
                position: 23
            }
        );
    }

    #[test]
    fn test_parse_multibyte_counts_chars() {
        // 24 chars but one of them is multi-byte
        let s = "507f1f77bcf86cd79943901é";
        assert!(matches!(
            ObjectId::parse_str(s),
            Err(ObjectIdError::InvalidChar { char: 'é', .. })
        ));
    }

    #[test]
    fn test_from_parts_layout() {
        let id = ObjectId::from_parts(0x01020304, [5, 6, 7, 8, 9], 0xAB0A0B0C);
        assert_eq!(id.bytes(), [1, 2, 3, 4, 5, 6, 7, 8, 9, 0x0A, 0x0B, 0x0C]);
        assert_eq!(id.timestamp_secs(), 0x01020304);
    }

    #[test]
    fn test_new_ids_are_unique() {
        let ids: HashSet<ObjectId> = (0..10_000).map(|_| ObjectId::new()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_new_id_embeds_current_time() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as u32;
        let id = ObjectId::new();
        assert!(id.timestamp_secs() >= before);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let id = ObjectId::parse_str(SAMPLE).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", SAMPLE));
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_serde_rejects_bad_lexeme() {
        let result: Result<ObjectId, _> = serde_json::from_str("\"nothex\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_error_display() {
        let msg = ObjectIdError::InvalidLength { length: 3 }.to_string();
        assert!(msg.contains("24"));
        assert!(msg.contains("3"));
    }
}
