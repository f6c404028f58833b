//! Schema-free document type
//!
//! A `Record` maps field names to [`Value`]s. One field is distinguished:
//! [`ID_FIELD`] holds the document's identifier. Its wire representation is
//! loose (see [`crate::identity`]); nothing here interprets it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value::Value;

/// Name of the identifier field
pub const ID_FIELD: &str = "_id";

/// One document, as a mapping from field name to value
///
/// Cloning a `Record` is a deep copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Record(BTreeMap::new())
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field, returning the previous value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Remove a field, returning its value
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Check whether a field is present
    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Raw identifier field, whatever its shape
    pub fn id(&self) -> Option<&Value> {
        self.0.get(ID_FIELD)
    }

    /// Remove and return the raw identifier field
    pub fn take_id(&mut self) -> Option<Value> {
        self.0.remove(ID_FIELD)
    }

    /// Number of fields, including the identifier
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Field names in key order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Record(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
