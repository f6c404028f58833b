//! Recordkeeper - versioned record saves over a document store
//!
//! Every save archives the record's prior version into an append-only
//! history collection, then replaces the record in place under the identity
//! taken from the original document.
//!
//! # Quick Start
//!
//! ```ignore
//! use recordkeeper::{Editor, EditorConfig, MemoryConnector};
//!
//! let connector = Arc::new(MemoryConnector::new().with_account("operator", "secret"));
//! let mut editor = Editor::new(connector, EditorConfig::default())?;
//! editor.connect("operator", "secret")?;
//!
//! let records = editor.load("products")?;
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Session`] which provides a command-based
//! API. The [`Editor`] struct provides a typed interface, and [`bridge`]
//! serves commands as JSON lines.
//!
//! Internal implementation details (store, coordinator, configuration) are
//! not exposed - only the executor API is public.

// Re-export the public API from recordkeeper-executor
pub use recordkeeper_executor::*;
