//! Codec types and traits
//!
//! Defines the codec abstraction and the custom payload field wire form.

use crate::error::{Error, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed JSON codec for one entity type.
///
/// Implementations work on parsed documents; the byte-level entry points
/// are provided on top of them.
pub trait JsonCodec<T>: Send + Sync {
    /// Decode one entity from a parsed document
    fn decode_value(&self, value: Value) -> Result<T>;

    /// Encode one entity into a document
    fn encode_value(&self, object: &T) -> Result<Value>;

    /// Decode a single object
    fn unmarshal(&self, data: &[u8]) -> Result<T> {
        self.decode_value(parse(data)?)
    }

    /// Decode a bare array or an `{"items": [...]}` envelope
    fn unmarshal_array(&self, data: &[u8]) -> Result<Vec<T>> {
        let items = match parse(data)? {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(Error::malformed(
                        "expected a JSON array or an object with an items array",
                    ))
                }
            },
            Value::Null => Vec::new(),
            other => {
                return Err(Error::malformed(format!(
                    "expected a JSON array, got {}",
                    type_name(&other)
                )))
            }
        };
        items.into_iter().map(|item| self.decode_value(item)).collect()
    }

    /// Encode a single object into request bytes
    fn marshal(&self, object: &T) -> Result<Bytes> {
        let value = self.encode_value(object)?;
        Ok(Bytes::from(serde_json::to_vec(&value)?))
    }
}

fn parse(data: &[u8]) -> Result<Value> {
    serde_json::from_slice(data).map_err(|e| Error::malformed(format!("failed to parse json: {e}")))
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Custom Payload Fields
// ============================================================================

/// Custom payload field attached to an alert, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CustomPayloadField {
    /// Fixed string value
    #[serde(rename = "staticString")]
    Static { key: String, value: String },
    /// Value resolved from a tag when the alert fires
    #[serde(rename = "dynamic")]
    Dynamic {
        key: String,
        value: DynamicCustomPayloadValue,
    },
}

impl CustomPayloadField {
    /// Create a static field
    pub fn static_string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Static {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a dynamic field
    pub fn dynamic(key: impl Into<String>, tag_name: impl Into<String>, tag_key: Option<String>) -> Self {
        Self::Dynamic {
            key: key.into(),
            value: DynamicCustomPayloadValue {
                key: tag_key,
                tag_name: tag_name.into(),
            },
        }
    }

    /// Field key
    pub fn key(&self) -> &str {
        match self {
            Self::Static { key, .. } | Self::Dynamic { key, .. } => key,
        }
    }
}

/// Tag reference of a dynamic custom payload field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicCustomPayloadValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub tag_name: String,
}
