//! Custom payload field blocks

use super::one_of::OneOf;
use crate::codec::CustomPayloadField;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One `custom_payload_field` entry: a `key` with either a static `value` or
/// a `dynamic_value`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomPayloadFieldState {
    pub key: String,
    pub value: Option<String>,
    pub dynamic_value: Option<DynamicValueState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicValueState {
    pub key: Option<String>,
    pub tag_name: String,
}

/// Map state entries into the sidecar collection
pub fn custom_payload_fields_to_api(
    fields: Option<&Vec<CustomPayloadFieldState>>,
) -> Result<Vec<CustomPayloadField>> {
    let Some(fields) = fields else {
        return Ok(Vec::new());
    };
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let path = format!("custom_payload_field[{i}]");
            if field.key.is_empty() {
                return Err(Error::invalid_configuration(
                    format!("{path}.key"),
                    "key is required",
                ));
            }
            OneOf::new(path)
                .variant("value", field.value.as_ref(), |v| {
                    Ok(CustomPayloadField::static_string(&field.key, v))
                })
                .variant("dynamic_value", field.dynamic_value.as_ref(), |d| {
                    Ok(CustomPayloadField::dynamic(
                        &field.key,
                        &d.tag_name,
                        d.key.clone(),
                    ))
                })
                .required()
        })
        .collect()
}

/// Map the sidecar collection into state entries; empty maps to `None`
pub fn custom_payload_fields_from_api(
    fields: &[CustomPayloadField],
) -> Option<Vec<CustomPayloadFieldState>> {
    if fields.is_empty() {
        return None;
    }
    Some(
        fields
            .iter()
            .map(|field| match field {
                CustomPayloadField::Static { key, value } => CustomPayloadFieldState {
                    key: key.clone(),
                    value: Some(value.clone()),
                    dynamic_value: None,
                },
                CustomPayloadField::Dynamic { key, value } => CustomPayloadFieldState {
                    key: key.clone(),
                    value: None,
                    dynamic_value: Some(DynamicValueState {
                        key: value.key.clone(),
                        tag_name: value.tag_name.clone(),
                    }),
                },
            })
            .collect(),
    )
}
