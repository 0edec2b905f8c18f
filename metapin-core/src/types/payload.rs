//! Upload payloads and canonical JSON.

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::error::Result;

/// Content to upload, fully materialized.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Opaque bytes, uploaded as-is.
    Binary(Bytes),
    /// Structured document, canonically serialized before upload.
    Document(Value),
}

impl Payload {
    /// Wraps a JSON document.
    pub fn document(value: Value) -> Self {
        Payload::Document(value)
    }

    /// Returns the exact bytes that will be written.
    pub fn to_bytes(&self) -> Result<Bytes> {
        match self {
            Payload::Binary(bytes) => Ok(bytes.clone()),
            Payload::Document(value) => Ok(Bytes::from(canonical_json(value)?)),
        }
    }

    /// Consumes the payload, returning the exact bytes that will be written.
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            Payload::Binary(bytes) => Ok(bytes),
            Payload::Document(value) => Ok(Bytes::from(canonical_json(&value)?)),
        }
    }
}

impl From<Vec<u8>> for Payload {
    fn from(data: Vec<u8>) -> Self {
        Payload::Binary(Bytes::from(data))
    }
}

impl From<Bytes> for Payload {
    fn from(data: Bytes) -> Self {
        Payload::Binary(data)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Document(value)
    }
}

/// Serializes JSON with sorted keys and two-space indentation.
///
/// Identical logical documents always produce identical bytes, whatever
/// order their keys were inserted in.
pub fn canonical_json(value: &Value) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(&sorted(value))?)
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::with_capacity(map.len());
            for key in keys {
                out.insert(key.clone(), sorted(&map[key]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
