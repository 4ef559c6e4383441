//! Tag filter attributes
//!
//! State carries a tag filter as a DSL string; the API carries the wire tree.
//! Reads write back the normalized string so equivalent inputs do not drift.

use crate::error::{Result, ResultExt};
use crate::restapi::TagFilter;
use crate::tagfilter;

/// Parse a state string into the wire tree; blank strings map to `None`.
/// Syntax errors keep their `Malformed` kind and name `field` in the message.
pub fn tag_filter_to_api(field: &str, expression: Option<&str>) -> Result<Option<TagFilter>> {
    let Some(expression) = expression.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(None);
    };
    let parsed = tagfilter::parse(expression).context(format!("invalid tag filter in '{field}'"))?;
    Ok(Some(tagfilter::to_wire(&parsed)))
}

/// Render a wire tree as its normalized state string
pub fn tag_filter_from_api(filter: Option<&TagFilter>) -> Result<Option<String>> {
    match filter {
        Some(filter) => tagfilter::normalize_wire(filter),
        None => Ok(None),
    }
}

/// Normalize a state string, leaving unparseable input untouched
pub fn normalize_tag_filter(expression: Option<&str>) -> Option<String> {
    let expression = expression?;
    Some(tagfilter::normalize_str(expression).unwrap_or_else(|_| expression.to_string()))
}
