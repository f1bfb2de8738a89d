//! Parsing of the `{ "items": [...] }` feed document.

use crate::error::{Error, Result};
use crate::identifier::resolve_all;
use crate::item::{PressItem, RawPressItem};
use serde_json::Value;

/// A press item paired with the identifier it is routed by.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    pub id: String,
    pub item: PressItem,
}

/// Parse a feed document. Malformed JSON is [`Error::ContentUnavailable`];
/// a missing or non-array `items` value is an empty feed.
pub fn parse_feed(content: &str) -> Result<Vec<PressItem>> {
    let doc: Value = serde_json::from_str(content)
        .map_err(|e| Error::ContentUnavailable(format!("malformed feed JSON: {}", e)))?;
    Ok(extract_items(doc))
}

pub fn extract_items(doc: Value) -> Vec<PressItem> {
    let items = match doc {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                tracing::warn!(kind = value_kind(&other), "feed `items` is not an array");
                return Vec::new();
            }
            None => return Vec::new(),
        },
        other => {
            tracing::warn!(kind = value_kind(&other), "feed document is not an object");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<RawPressItem>(value) {
            Ok(raw) => Some(PressItem::from(raw)),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed feed item");
                None
            }
        })
        .collect()
}

/// Resolve identifiers in feed order, then sort newest first.
///
/// Resolution happens before sorting so collision suffixes follow authoring
/// order, matching what the editorial hook persists.
pub fn prepare(items: Vec<PressItem>) -> Vec<ResolvedItem> {
    let ids = resolve_all(&items);
    let mut resolved: Vec<ResolvedItem> = ids
        .into_iter()
        .zip(items)
        .map(|(id, item)| ResolvedItem { id, item })
        .collect();
    sort_newest_first(&mut resolved);
    resolved
}

/// Stable sort by publication date, newest first, undated last.
pub fn sort_newest_first(items: &mut [ResolvedItem]) {
    items.sort_by(|a, b| a.item.published.cmp_newest_first(&b.item.published));
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
