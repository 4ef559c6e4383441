//! Codec implementations

use super::types::{type_name, CustomPayloadField, JsonCodec};
use crate::error::{Error, Result};
use crate::restapi::CustomPayloadFieldsAware;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

/// Key emitted on the wire
const CUSTOM_PAYLOAD_FIELDS_KEY: &str = "customPayloadFields";
/// Legacy spelling accepted on input
const CUSTOMER_PAYLOAD_FIELDS_KEY: &str = "customerPayloadFields";

// ============================================================================
// Default Codec
// ============================================================================

/// Serde-backed codec for any entity type
pub struct DefaultJsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> DefaultJsonCodec<T> {
    /// Create a new codec
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for DefaultJsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for DefaultJsonCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultJsonCodec").finish()
    }
}

impl<T> JsonCodec<T> for DefaultJsonCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    fn decode_value(&self, value: Value) -> Result<T> {
        if !value.is_object() {
            return Err(Error::malformed(format!(
                "expected a JSON object, got {}",
                type_name(&value)
            )));
        }
        serde_json::from_value(value)
            .map_err(|e| Error::malformed(format!("unexpected document shape: {e}")))
    }

    fn encode_value(&self, object: &T) -> Result<Value> {
        Ok(serde_json::to_value(object)?)
    }
}

// ============================================================================
// Custom Payload Fields Adapter
// ============================================================================

/// Wraps a codec and routes the custom payload field collection through the
/// entity's sidecar accessors
pub struct CustomPayloadFieldsCodec<C> {
    inner: C,
}

impl<C> CustomPayloadFieldsCodec<C> {
    /// Wrap a codec
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<T> CustomPayloadFieldsCodec<DefaultJsonCodec<T>> {
    /// Wrap the default codec
    pub fn wrap_default() -> Self {
        Self::new(DefaultJsonCodec::new())
    }
}

impl<C> std::fmt::Debug for CustomPayloadFieldsCodec<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomPayloadFieldsCodec").finish_non_exhaustive()
    }
}

impl<T, C> JsonCodec<T> for CustomPayloadFieldsCodec<C>
where
    T: CustomPayloadFieldsAware,
    C: JsonCodec<T>,
{
    fn decode_value(&self, mut value: Value) -> Result<T> {
        let raw = match value.as_object_mut() {
            Some(map) => {
                let primary = map.remove(CUSTOM_PAYLOAD_FIELDS_KEY);
                let legacy = map.remove(CUSTOMER_PAYLOAD_FIELDS_KEY);
                primary.or(legacy)
            }
            None => None,
        };

        let fields = match raw {
            None | Some(Value::Null) => Vec::new(),
            Some(raw) => serde_json::from_value::<Vec<CustomPayloadField>>(raw).map_err(|e| {
                Error::malformed(format!("invalid {CUSTOM_PAYLOAD_FIELDS_KEY}: {e}"))
            })?,
        };

        let mut object = self.inner.decode_value(value)?;
        object.set_custom_payload_fields(fields);
        Ok(object)
    }

    fn encode_value(&self, object: &T) -> Result<Value> {
        let mut value = self.inner.encode_value(object)?;
        if let Some(map) = value.as_object_mut() {
            map.remove(CUSTOMER_PAYLOAD_FIELDS_KEY);
            map.insert(
                CUSTOM_PAYLOAD_FIELDS_KEY.to_string(),
                serde_json::to_value(object.custom_payload_fields())?,
            );
        }
        Ok(value)
    }
}
