//! Feed transformation
//!
//! Maps the raw feed payload into an ordered list of [`PhotoResult`].
//! A payload without an `items` array is rejected rather than read as an
//! empty feed, so a broken response is reported where it happened.

use serde_json::Value;

use crate::error::ParseError;
use crate::types::PhotoResult;

/// Parse a raw feed payload into normalized results
///
/// Output order matches the order of `items` exactly. Sub-fields that are
/// missing or not strings become empty strings.
pub fn parse(raw: &Value) -> Result<Vec<PhotoResult>, ParseError> {
    let items = raw
        .get("items")
        .ok_or(ParseError::MissingItems)?
        .as_array()
        .ok_or(ParseError::ItemsNotArray)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_item(index, item))
        .collect()
}

fn parse_item(index: usize, item: &Value) -> Result<PhotoResult, ParseError> {
    if !item.is_object() {
        return Err(ParseError::ItemNotObject { index });
    }

    Ok(PhotoResult {
        image: string_at(item, "/media/m"),
        link: string_at(item, "/link"),
        title: string_at(item, "/title"),
        description: string_at(item, "/description"),
    })
}

fn string_at(item: &Value, pointer: &str) -> String {
    item.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
