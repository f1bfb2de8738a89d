//! Stable identifiers for press items.
//!
//! An item is addressed by its explicit `id` when it has one. Otherwise the
//! identifier is derived as `<date>-<title-slug>`, which is the same
//! algorithm the editorial pre-save hook uses, so URLs shared before an id was
//! persisted keep working afterwards.

use crate::item::PressItem;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Date token used when an item has no publication date.
pub const UNDATED: &str = "0000-00-00";

/// Title token used when an item has no usable title.
pub const UNTITLED: &str = "sin-titulo";

/// Lowercase, strip accents and symbols, and join words with single hyphens.
///
/// `"Presentación del Proyecto"` becomes `"presentacion-del-proyecto"`.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join("-")
}

/// The derived identifier for an item, ignoring any explicit `id`.
///
/// Never empty: a missing date or title is replaced by [`UNDATED`] or
/// [`UNTITLED`].
pub fn base_identifier(item: &PressItem) -> String {
    let date = item
        .published
        .date_part()
        .map(normalize)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNDATED.to_string());

    let title = item
        .title
        .as_deref()
        .map(normalize)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    format!("{}-{}", date, title)
}

/// Assigns identifiers within one rendering pass or editorial batch.
#[derive(Debug, Default)]
pub struct IdentifierResolver {
    seen: HashSet<String>,
}

impl IdentifierResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with identifiers that are already taken.
    pub fn with_seen<I, S>(taken: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seen: taken.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve one item, recording the result as taken.
    ///
    /// Explicit identifiers are returned unchanged, even if already taken.
    pub fn resolve(&mut self, item: &PressItem) -> String {
        if let Some(id) = &item.id {
            self.seen.insert(id.clone());
            return id.clone();
        }
        self.claim(base_identifier(item))
    }

    /// Reserve `base`, or `base-2`, `base-3`, ... if it is taken.
    pub fn claim(&mut self, base: String) -> String {
        let mut candidate = base.clone();
        let mut counter = 2;
        while self.seen.contains(&candidate) {
            candidate = format!("{}-{}", base, counter);
            counter += 1;
        }
        self.seen.insert(candidate.clone());
        candidate
    }
}

/// Resolve every item of a batch in order.
///
/// Explicit ids are reserved up front so a derived identifier can never
/// shadow an explicit one that appears later in the list.
pub fn resolve_all(items: &[PressItem]) -> Vec<String> {
    let mut resolver = IdentifierResolver::with_seen(items.iter().filter_map(|i| i.id.clone()));
    items.iter().map(|item| resolver.resolve(item)).collect()
}
