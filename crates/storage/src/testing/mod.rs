//! Testing utilities for failure handling
//!
//! - **FaultyStore**: wraps a store and fails chosen calls on demand
//! - **StaticConnector**: connects every credential pair to one fixed store
//!
//! # Example
//!
//! ```ignore
//! use recordkeeper_storage::testing::FaultyStore;
//!
//! let store = FaultyStore::new(Arc::new(MemoryStore::new("db")));
//! store.fail_next_insert(StoreError::operation("insertOne", "disk full"));
//! assert!(store.insert_one("c", Record::new()).is_err());
//! assert_eq!(store.insert_calls(), 1);
//! ```

mod faulty;

pub use faulty::{FaultyStore, StaticConnector};
