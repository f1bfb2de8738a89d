// Feed validation and the editorial id-assignment hook

pub mod assign;

use press_kit_core::identifier::resolve_all;
use press_kit_core::{PressItem, RawPressItem};
use serde_json::Value;
use std::collections::HashMap;

pub use assign::{AssignMode, Assignment, assign_identifiers, assign_identifiers_str};

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check a feed document for problems that would break routing or rendering.
///
/// Errors are things the site cannot serve correctly (bad JSON, duplicate
/// explicit ids). Warnings are authoring gaps the renderers paper over.
pub fn validate_feed(content: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    let doc: Value = match serde_json::from_str(content) {
        Ok(doc) => doc,
        Err(e) => {
            report.errors.push(format!("Feed is not valid JSON: {}", e));
            return report;
        }
    };

    let Some(items) = doc.get("items") else {
        report
            .errors
            .push("Feed has no `items` list; the site will show no publications".to_string());
        return report;
    };
    let Some(items) = items.as_array() else {
        report
            .errors
            .push("Feed `items` is not a list; the site will show no publications".to_string());
        return report;
    };

    let mut explicit_ids: HashMap<String, usize> = HashMap::new();
    // (1-based position in the feed, item) for every readable item
    let mut readable: Vec<(usize, PressItem)> = Vec::new();

    for (index, value) in items.iter().enumerate() {
        let n = index + 1;
        if !value.is_object() {
            report
                .errors
                .push(format!("Item {}: not an object, it will be skipped", n));
            continue;
        }
        let item = match serde_json::from_value::<RawPressItem>(value.clone()) {
            Ok(raw) => PressItem::from(raw),
            Err(e) => {
                report
                    .errors
                    .push(format!("Item {}: unreadable ({}), it will be skipped", n, e));
                continue;
            }
        };

        if let Some(id) = &item.id {
            if let Some(first) = explicit_ids.get(id) {
                report.errors.push(format!(
                    "Item {}: id '{}' already used by item {}",
                    n, id, first
                ));
            } else {
                explicit_ids.insert(id.clone(), n);
            }
        }

        if item.title.is_none() {
            report.warnings.push(format!("Item {}: missing title", n));
        }

        match (item.published.raw(), item.published.date()) {
            (None, _) => report
                .warnings
                .push(format!("Item {}: missing date, sorted last", n)),
            (Some(raw), None) => report.warnings.push(format!(
                "Item {}: unparseable date '{}', sorted last",
                n, raw
            )),
            _ => {}
        }

        if !item.category.is_known() {
            report.warnings.push(format!(
                "Item {}: unknown category '{}'",
                n,
                item.category.label()
            ));
        }

        readable.push((n, item));
    }

    // Same resolution the site runs, so collision suffixes match what is served.
    let (positions, parsed): (Vec<usize>, Vec<PressItem>) = readable.into_iter().unzip();
    let served = resolve_all(&parsed);
    for ((n, item), id) in positions.iter().zip(&parsed).zip(&served) {
        if item.id.is_none() {
            report.info.push(format!(
                "Item {}: no explicit id, served as '{}' (run assign-ids to persist)",
                n, id
            ));
        }
    }

    report
        .info
        .push(format!("{} of {} items readable", parsed.len(), items.len()));
    report
}
