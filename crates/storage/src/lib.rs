//! Storage layer for recordkeeper
//!
//! This crate implements the document store backends:
//! - MemoryStore: DashMap of collections, BTreeMap per collection keyed by ObjectId
//! - MemoryConnector: account check plus one shared store per database name
//! - MongoStore / MongoConnector: the same traits over the MongoDB driver
//! - testing: fault injection for exercising partial-failure paths
//!
//! The engine only sees `DocumentStore` and `Connector` from
//! `recordkeeper-core`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod connector;
pub mod memory;
pub mod mongo;
pub mod testing;

pub use connector::MemoryConnector;
pub use memory::MemoryStore;
pub use mongo::{MongoConnector, MongoStore};
