//! # Recordkeeper Executor
//!
//! The public API for recordkeeper - versioned saves over a document store.
//!
//! This is the only crate callers need to import. It provides:
//! - [`Editor`] - Typed record editing API
//! - [`Session`] - Stateful command dispatcher owning the active connection
//! - [`Command`]/[`Output`] - Low-level command interface (for the bridge)
//! - [`bridge`] - Line-oriented JSON request/response loop
//!
//! ## Quick Start
//!
//! ```text
//! use recordkeeper_executor::{Editor, EditorConfig, MemoryConnector};
//!
//! let connector = Arc::new(MemoryConnector::new().with_account("operator", "secret"));
//! let mut editor = Editor::new(connector, EditorConfig::default())?;
//! editor.connect("operator", "secret")?;
//!
//! let mut products = editor.load("products")?;
//! let original = products.remove(0);
//! let mut edited = original.clone();
//! edited.insert("price", 12);
//! editor.save("products", edited, Some(original), Some("operator"))?;
//! ```
//!
//! ## Saves
//!
//! Every save archives the record's prior version into a history
//! collection, then replaces the record in place. The record's identity
//! comes from the original document, never from the edited one.

#![warn(missing_docs)]

pub mod bridge;
mod command;
mod convert;
mod editor;
mod error;
mod handlers;
pub mod json;
mod output;
mod response;
mod session;

#[cfg(test)]
mod tests;

pub use command::Command;
pub use editor::{Editor, SaveSummary};
pub use error::Error;
pub use output::Output;
pub use response::{Response, SAVED_MESSAGE};
pub use session::Session;

pub use recordkeeper_core::{ObjectId, Record, Value};
pub use recordkeeper_engine::{EditorConfig, SaveCoordinator};
pub use recordkeeper_storage::{MemoryConnector, MemoryStore, MongoConnector};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
