//! Canonical JSON serialization for record values.
//!
//! This module provides special JSON handling for types that don't have
//! a standard JSON representation:
//!
//! | Type | JSON Representation |
//! |------|---------------------|
//! | ObjectId | `{"$oid": "<24 hex>"}` |
//! | Bytes | `{"$bytes": "<base64>"}` |
//! | NaN | `{"$f64": "NaN"}` |
//! | +Infinity | `{"$f64": "+Inf"}` |
//! | -Infinity | `{"$f64": "-Inf"}` |
//! | -0.0 | `{"$f64": "-0.0"}` |
//!
//! `{"$oid": s}` decodes to an ObjectId only when `s` is a valid lexeme.
//! Anything else stays a plain object so the identity resolver can report
//! what it got.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use recordkeeper_core::{ObjectId, Record, Value, OID_MARKER};

/// Convert a Value to a JSON value with special encoding.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::Number((*i).into()),
        Value::Float(f) => float_to_json(*f),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Bytes(b) => serde_json::json!({"$bytes": BASE64.encode(b)}),
        Value::ObjectId(id) => serde_json::json!({"$oid": id.to_hex()}),
        Value::Array(arr) => JsonValue::Array(arr.iter().map(value_to_json).collect()),
        Value::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert a JSON value to a Value, recognizing special encodings.
pub fn json_to_value(json: &JsonValue) -> Result<Value, String> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err("Invalid number".to_string())
            }
        }
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Array(arr) => {
            let items: Result<Vec<Value>, String> = arr.iter().map(json_to_value).collect();
            Ok(Value::Array(items?))
        }
        JsonValue::Object(obj) => {
            if obj.len() == 1 {
                if let Some(JsonValue::String(encoded)) = obj.get("$bytes") {
                    let decoded = BASE64
                        .decode(encoded)
                        .map_err(|e| format!("Invalid base64: {}", e))?;
                    return Ok(Value::Bytes(decoded));
                }
                if let Some(JsonValue::String(s)) = obj.get("$f64") {
                    return Ok(Value::Float(json_special_float_from_str(s)?));
                }
                if let Some(JsonValue::String(hex)) = obj.get(OID_MARKER) {
                    if let Ok(id) = ObjectId::parse_str(hex) {
                        return Ok(Value::ObjectId(id));
                    }
                }
            }

            let map: Result<BTreeMap<String, Value>, String> = obj
                .iter()
                .map(|(k, v)| json_to_value(v).map(|val| (k.clone(), val)))
                .collect();
            Ok(Value::Object(map?))
        }
    }
}

/// Convert a record to a JSON object.
pub fn record_to_json(record: &Record) -> JsonValue {
    JsonValue::Object(
        record
            .iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect(),
    )
}

/// Convert a JSON object to a record.
pub fn json_to_record(json: &JsonValue) -> Result<Record, String> {
    match json_to_value(json)? {
        Value::Object(map) => Ok(Record::from(map)),
        other => Err(format!("expected an object, got {}", other.type_name())),
    }
}

/// Convert a list of records to a JSON array.
pub fn records_to_json(records: &[Record]) -> JsonValue {
    JsonValue::Array(records.iter().map(record_to_json).collect())
}

/// Convert a float to JSON, handling special values.
fn float_to_json(f: f64) -> JsonValue {
    if f.is_nan() {
        serde_json::json!({"$f64": "NaN"})
    } else if f.is_infinite() {
        if f.is_sign_positive() {
            serde_json::json!({"$f64": "+Inf"})
        } else {
            serde_json::json!({"$f64": "-Inf"})
        }
    } else if f == 0.0 && f.is_sign_negative() {
        serde_json::json!({"$f64": "-0.0"})
    } else {
        serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or_else(|| serde_json::json!({"$f64": format!("{}", f)}))
    }
}

/// Parse a special float string.
fn json_special_float_from_str(s: &str) -> Result<f64, String> {
    match s {
        "NaN" => Ok(f64::NAN),
        "+Inf" => Ok(f64::INFINITY),
        "-Inf" => Ok(f64::NEG_INFINITY),
        "-0.0" => Ok(-0.0_f64),
        other => other
            .parse::<f64>()
            .map_err(|e| format!("Invalid float: {}", e)),
    }
}

/// `#[serde(with)]` support for a `Value` field.
pub mod canonical_value {
    use super::*;

    /// Serialize as canonical JSON.
    pub fn serialize<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
        value_to_json(value).serialize(serializer)
    }

    /// Deserialize from canonical JSON.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        json_to_value(&json).map_err(de::Error::custom)
    }
}

/// `#[serde(with)]` support for an `Option<Record>` field.
pub mod canonical_record_opt {
    use super::*;

    /// Serialize as a canonical JSON object or null.
    pub fn serialize<S: Serializer>(
        record: &Option<Record>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match record {
            Some(record) => record_to_json(record).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from a canonical JSON object; null becomes `None`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Record>, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        if json.is_null() {
            return Ok(None);
        }
        json_to_record(&json).map(Some).map_err(de::Error::custom)
    }
}

/// `#[serde(with)]` support for a `Vec<Record>` field.
pub mod canonical_records {
    use super::*;

    /// Serialize as an array of canonical JSON objects.
    pub fn serialize<S: Serializer>(records: &[Record], serializer: S) -> Result<S::Ok, S::Error> {
        records_to_json(records).serialize(serializer)
    }

    /// Deserialize from an array of canonical JSON objects.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Record>, D::Error> {
        let items = Vec::<JsonValue>::deserialize(deserializer)?;
        items
            .iter()
            .map(json_to_record)
            .collect::<Result<_, _>>()
            .map_err(de::Error::custom)
    }
}

/// A wrapper for Value that uses canonical JSON serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalValue(pub Value);

impl Serialize for CanonicalValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        canonical_value::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for CanonicalValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        canonical_value::deserialize(deserializer).map(CanonicalValue)
    }
}

impl From<Value> for CanonicalValue {
    fn from(v: Value) -> Self {
        CanonicalValue(v)
    }
}

impl From<CanonicalValue> for Value {
    fn from(v: CanonicalValue) -> Self {
        v.0
    }
}
