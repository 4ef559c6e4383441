//! JSON codec module
//!
//! Typed encoding and decoding of API entities.
//!
//! # Overview
//!
//! - [`DefaultJsonCodec`] decodes single objects, bare arrays and
//!   `{"items": [...]}` envelopes.
//! - [`CustomPayloadFieldsCodec`] wraps another codec and moves the tagged
//!   `customPayloadFields` collection between the wire document and the
//!   entity's sidecar.

mod decoders;
mod types;

pub use decoders::{CustomPayloadFieldsCodec, DefaultJsonCodec};
pub use types::{CustomPayloadField, DynamicCustomPayloadValue, JsonCodec};
