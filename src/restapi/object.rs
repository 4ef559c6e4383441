//! Entity contracts
//!
//! Every entity exchanged with the API exposes the identifier used to build
//! its REST path. Alert configs additionally expose their custom payload
//! field sidecar to the codec adapter.

use crate::codec::CustomPayloadField;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Value object exchanged with the Instana API
pub trait InstanaDataObject: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Identifier used in `{base}/{id}` paths
    fn id_for_path(&self) -> &str;
}

/// Entity carrying a custom payload field collection outside its serde shape
pub trait CustomPayloadFieldsAware {
    /// Current sidecar collection
    fn custom_payload_fields(&self) -> &[CustomPayloadField];

    /// Replace the sidecar collection
    fn set_custom_payload_fields(&mut self, fields: Vec<CustomPayloadField>);
}

/// Implements [`InstanaDataObject`] keyed by the `id` field
macro_rules! data_object_with_id {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::restapi::InstanaDataObject for $ty {
                fn id_for_path(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

/// Implements [`CustomPayloadFieldsAware`] over a `custom_payload_fields` field
macro_rules! custom_payload_fields_aware {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::restapi::CustomPayloadFieldsAware for $ty {
                fn custom_payload_fields(&self) -> &[$crate::codec::CustomPayloadField] {
                    &self.custom_payload_fields
                }

                fn set_custom_payload_fields(
                    &mut self,
                    fields: Vec<$crate::codec::CustomPayloadField>,
                ) {
                    self.custom_payload_fields = fields;
                }
            }
        )+
    };
}

pub(crate) use custom_payload_fields_aware;
pub(crate) use data_object_with_id;
