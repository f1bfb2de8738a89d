//! Persisting identifiers into the feed before it is saved.
//!
//! Items keep every field they were authored with; only `id` is added.

use press_kit_core::identifier::IdentifierResolver;
use press_kit_core::{Error, PressItem, RawPressItem, Result};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignMode {
    /// Only items with both a date and a title get an id, like the CMS
    /// pre-save hook. Incomplete drafts are left for a later save.
    Editorial,
    /// Every item gets an id, falling back to sentinel date/title tokens.
    All,
}

/// An id written into the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub index: usize,
    pub id: String,
}

/// Add missing ids to the `items` of a feed document in place.
///
/// Explicit ids are reserved before anything is assigned, so the batch ends
/// up with unique ids whatever order items appear in.
pub fn assign_identifiers(doc: &mut Value, mode: AssignMode) -> Vec<Assignment> {
    let Some(items) = doc.get_mut("items").and_then(Value::as_array_mut) else {
        return Vec::new();
    };

    let parsed: Vec<Option<PressItem>> = items
        .iter()
        .map(|value| {
            serde_json::from_value::<RawPressItem>(value.clone())
                .ok()
                .map(PressItem::from)
        })
        .collect();

    let mut resolver =
        IdentifierResolver::with_seen(parsed.iter().flatten().filter_map(|item| item.id.clone()));

    let mut assignments = Vec::new();
    for (index, (value, item)) in items.iter_mut().zip(&parsed).enumerate() {
        let Some(item) = item else {
            tracing::warn!(index, "not assigning an id to a malformed item");
            continue;
        };
        if item.id.is_some() {
            continue;
        }
        if mode == AssignMode::Editorial
            && (item.title.is_none() || item.published.raw().is_none())
        {
            continue;
        }
        let Some(object) = value.as_object_mut() else {
            continue;
        };

        let id = resolver.resolve(item);
        object.insert("id".to_string(), Value::String(id.clone()));
        assignments.push(Assignment { index, id });
    }

    assignments
}

/// Parse, assign and re-serialize a feed file's contents.
pub fn assign_identifiers_str(content: &str, mode: AssignMode) -> Result<(String, Vec<Assignment>)> {
    let mut doc: Value = serde_json::from_str(content)
        .map_err(|e| Error::InvalidData(format!("feed is not valid JSON: {}", e)))?;
    let assignments = assign_identifiers(&mut doc, mode);
    let mut output = serde_json::to_string_pretty(&doc)
        .map_err(|e| Error::InvalidData(format!("could not serialize feed: {}", e)))?;
    output.push('\n');
    Ok((output, assignments))
}
