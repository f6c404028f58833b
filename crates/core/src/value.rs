//! Value types for recordkeeper
//!
//! This module defines:
//! - Value: Unified enum for every field value a document can hold
//!
//! ## Value Model
//!
//! The Value enum has exactly 9 variants:
//! - Null, Bool, Int, Float, String, Bytes, ObjectId, Array, Object
//!
//! ### Type Rules
//!
//! - No implicit type coercions
//! - `Int(1) != Float(1.0)` - different types are NEVER equal
//! - `Bytes` are not `String`
//! - `ObjectId(x)` is not `String(x.to_hex())`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::ObjectId;

/// Canonical document value type
///
/// ## Type Equality
///
/// Different types are NEVER equal, even if they contain the same "value":
/// - `Int(1) != Float(1.0)`
/// - `Bytes(b"hello") != String("hello")`
///
/// Float equality follows IEEE-754 semantics:
/// - `NaN != NaN`
/// - `-0.0 == 0.0`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Typed document identifier
    ObjectId(ObjectId),
    /// Array of values
    Array(Vec<Value>),
    /// Object with string keys, ordered by key
    Object(BTreeMap<String, Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

// Custom PartialEq implementation for IEEE-754 float semantics
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::ObjectId(a), Value::ObjectId(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            // Different types are never equal
            _ => false,
        }
    }
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::ObjectId(_) => "ObjectId",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is a string value
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if this is an object id value
    pub fn is_object_id(&self) -> bool {
        matches!(self, Value::ObjectId(_))
    }

    /// Check if this is an object value
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[u8] if this is a Bytes value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get the id if this is an ObjectId value
    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Value::ObjectId(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as &[Value] if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as &BTreeMap if this is an Object value
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::ObjectId(id)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(o: BTreeMap<String, Value>) -> Self {
        Value::Object(o)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

// ============================================================================
// serde_json interop for ergonomic JSON construction
// ============================================================================

/// Plain structural conversion: no marker objects are interpreted, so
/// `{"$oid": "..."}` stays an `Object`. Marker-aware decoding lives in the
/// executor's canonical JSON codec.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 beyond i64::MAX, or a real float
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_null() {
        let value = Value::Null;
        assert!(matches!(value, Value::Null));
        assert!(value.is_null());
    }

    #[test]
    fn test_value_int() {
        let value = Value::Int(42);
        assert_eq!(value.as_int(), Some(42));
        assert_eq!(value.as_float(), None);
    }

    #[test]
    fn test_value_string() {
        let value = Value::String("hello world".to_string());
        assert!(value.is_string());
        assert_eq!(value.as_str(), Some("hello world"));
    }

    #[test]
    fn test_value_object_id() {
        let id = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let value = Value::from(id);
        assert!(value.is_object_id());
        assert_eq!(value.as_object_id(), Some(id));
    }

    #[test]
    fn test_object_id_not_equal_to_its_hex_string() {
        let id = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        assert_ne!(Value::ObjectId(id), Value::String(id.to_hex()));
    }

    #[test]
    fn test_int_not_equal_float() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn test_nan_not_equal_nan() {
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn test_negative_zero_equals_zero() {
        assert_eq!(Value::Float(-0.0), Value::Float(0.0));
    }

    #[test]
    fn test_bytes_not_equal_string() {
        assert_ne!(
            Value::Bytes(b"hello".to_vec()),
            Value::String("hello".to_string())
        );
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Null.type_name(), "Null");
        assert_eq!(Value::Bool(true).type_name(), "Bool");
        assert_eq!(Value::Array(vec![]).type_name(), "Array");
        assert_eq!(Value::Object(BTreeMap::new()).type_name(), "Object");
        assert_eq!(Value::ObjectId(ObjectId::new()).type_name(), "ObjectId");
    }

    #[test]
    fn test_as_wrong_type_returns_none() {
        let value = Value::Bool(true);
        assert_eq!(value.as_int(), None);
        assert_eq!(value.as_str(), None);
        assert_eq!(value.as_bytes(), None);
        assert_eq!(value.as_object_id(), None);
        assert!(value.as_array().is_none());
        assert!(value.as_object().is_none());
    }

    #[test]
    fn test_object_equality_key_order_independent() {
        let a: BTreeMap<String, Value> = [("x".to_string(), Value::Int(1)), ("y".to_string(), Value::Int(2))]
            .into_iter()
            .collect();
        let b: BTreeMap<String, Value> = [("y".to_string(), Value::Int(2)), ("x".to_string(), Value::Int(1))]
            .into_iter()
            .collect();
        assert_eq!(Value::Object(a), Value::Object(b));
    }

    #[test]
    fn test_from_serde_json_keeps_oid_marker_as_object() {
        let json = serde_json::json!({"$oid": "507f1f77bcf86cd799439011"});
        let value = Value::from(json);
        let obj = value.as_object().unwrap();
        assert_eq!(
            obj.get("$oid"),
            Some(&Value::String("507f1f77bcf86cd799439011".into()))
        );
    }

    #[test]
    fn test_from_serde_json_nested() {
        let json = serde_json::json!({"a": [1, 2.5, "s", null, true]});
        let value = Value::from(json);
        let arr = value.as_object().unwrap()["a"].as_array().unwrap().to_vec();
        assert_eq!(
            arr,
            vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::String("s".into()),
                Value::Null,
                Value::Bool(true)
            ]
        );
    }

    #[test]
    fn test_from_serde_json_u64_max_becomes_float() {
        let json = serde_json::json!(u64::MAX);
        assert!(matches!(Value::from(json), Value::Float(_)));
    }

    #[test]
    fn test_value_serialization_round_trip() {
        let value = Value::Array(vec![
            Value::Int(7),
            Value::ObjectId(ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap()),
            Value::Bytes(vec![1, 2, 3]),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
