//! Collection name validation
//!
//! Collection names come from the front-end and are checked before any
//! store call is made.
//!
//! ## Validation
//!
//! Collection names must:
//! - Be 1-255 bytes
//! - Not contain `$` or NUL
//! - Not start with `system.`

use std::fmt;

/// Maximum length of a collection name, in bytes
pub const MAX_COLLECTION_NAME_LENGTH: usize = 255;

const RESERVED_PREFIX: &str = "system.";

/// Error when validating a collection name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionNameError {
    /// Name is empty
    Empty,
    /// Name exceeds maximum length
    TooLong {
        /// Actual length of the name, in bytes
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
    /// Name contains a character the store reserves
    InvalidChar {
        /// The invalid character
        char: char,
        /// Position of the invalid character
        position: usize,
    },
    /// Name is in the store's reserved namespace
    Reserved {
        /// The rejected name
        name: String,
    },
}

impl fmt::Display for CollectionNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionNameError::Empty => write!(f, "collection name cannot be empty"),
            CollectionNameError::TooLong { length, max } => {
                write!(f, "collection name too long: {} bytes (max {})", length, max)
            }
            CollectionNameError::InvalidChar { char, position } => {
                write!(
                    f,
                    "invalid character {:?} at position {} in collection name",
                    char, position
                )
            }
            CollectionNameError::Reserved { name } => {
                write!(f, "collection name '{}' is reserved", name)
            }
        }
    }
}

impl std::error::Error for CollectionNameError {}

/// Validate a collection name
pub fn validate_collection_name(name: &str) -> Result<(), CollectionNameError> {
    if name.is_empty() {
        return Err(CollectionNameError::Empty);
    }

    if name.len() > MAX_COLLECTION_NAME_LENGTH {
        return Err(CollectionNameError::TooLong {
            length: name.len(),
            max: MAX_COLLECTION_NAME_LENGTH,
        });
    }

    if let Some((position, char)) = name
        .chars()
        .enumerate()
        .find(|(_, c)| *c == '$' || *c == '\0')
    {
        return Err(CollectionNameError::InvalidChar { char, position });
    }

    if name.starts_with(RESERVED_PREFIX) {
        return Err(CollectionNameError::Reserved {
            name: name.to_string(),
        });
    }

    Ok(())
}
