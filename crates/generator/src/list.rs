//! Press list: filtering, card view models and their markup.

use crate::html::{encode_uri_component, html_escape};
use press_kit_core::dates::{capitalize_first, format_long};
use press_kit_core::{Category, PressItem, ResolvedItem};

/// Search text and category chosen in the list toolbar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl Filters {
    pub fn new(search: Option<&str>, category: Option<&str>) -> Self {
        let clean = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            search: clean(search),
            category: clean(category)
                .map(|c| Category::normalize(Some(c.as_str())).label().to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.category.is_none()
    }

    /// Category must equal the item's normalized category label (the filter
    /// is normalized the same way, so "prensa" selects Noticia); search text
    /// must appear, ignoring case, in the title, subtitle or body.
    pub fn matches(&self, item: &PressItem) -> bool {
        if let Some(category) = &self.category
            && item.category.label() != category
        {
            return false;
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let found = [&item.title, &item.subtitle, &item.body]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub href: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub category: String,
    pub badge_class: &'static str,
    pub date: Option<String>,
    pub image_url: Option<String>,
}

impl CardView {
    pub fn from_resolved(resolved: &ResolvedItem) -> Self {
        let item = &resolved.item;
        CardView {
            id: resolved.id.clone(),
            href: detail_href(&resolved.id),
            title: item.title_or_default().to_string(),
            excerpt: item.subtitle.clone(),
            category: item.category.label().to_string(),
            badge_class: item.category.badge_class(),
            date: item
                .published
                .date()
                .map(|d| capitalize_first(&format_long(d))),
            image_url: item.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub cards: Vec<CardView>,
    pub shown: usize,
    pub total: usize,
    pub filters: Filters,
    pub categories: Vec<CategoryOption>,
}

pub fn detail_href(id: &str) -> String {
    format!("/prensa/?id={}", encode_uri_component(id))
}

/// Apply `filters` to items that are already resolved and sorted.
pub fn build_list_view(items: &[ResolvedItem], filters: &Filters) -> ListView {
    let cards: Vec<CardView> = items
        .iter()
        .filter(|r| filters.matches(&r.item))
        .map(CardView::from_resolved)
        .collect();

    let categories = Category::filterable()
        .iter()
        .map(|c| CategoryOption {
            label: c.label().to_string(),
            selected: filters.category.as_deref() == Some(c.label()),
        })
        .collect();

    ListView {
        shown: cards.len(),
        total: items.len(),
        cards,
        filters: filters.clone(),
        categories,
    }
}

/// The first `n` items, for the home page teaser.
pub fn latest(items: &[ResolvedItem], n: usize) -> Vec<CardView> {
    items.iter().take(n).map(CardView::from_resolved).collect()
}

pub fn render_card(card: &CardView) -> String {
    let title = html_escape(&card.title);

    let image_html = match &card.image_url {
        Some(url) => format!(
            r#"<img src="{}" alt="{}" class="prensa-card__img" loading="lazy">"#,
            html_escape(url),
            title
        ),
        None => r#"<div class="prensa-card__placeholder">
                <span class="prensa-card__placeholder-icon">📰</span>
            </div>"#
            .to_string(),
    };

    let excerpt_html = card
        .excerpt
        .as_deref()
        .map(|e| format!(r#"<p class="prensa-card__excerpt">{}</p>"#, html_escape(e)))
        .unwrap_or_default();

    format!(
        r#"<a href="{}" class="prensa-card group">
    <div class="prensa-card__image-container">
        {}
    </div>
    <div class="prensa-card__body">
        <span class="prensa-card__badge {}">{}</span>
        <h3 class="prensa-card__title">{}</h3>
        {}
        <span class="prensa-card__date">{}</span>
        <span class="prensa-card__cta">Leer más →</span>
    </div>
</a>"#,
        html_escape(&card.href),
        image_html,
        card.badge_class,
        html_escape(&card.category),
        title,
        excerpt_html,
        html_escape(card.date.as_deref().unwrap_or_default())
    )
}

pub fn render_cards(cards: &[CardView]) -> String {
    cards.iter().map(render_card).collect::<Vec<_>>().join("\n")
}

fn render_toolbar(view: &ListView) -> String {
    let options: String = view
        .categories
        .iter()
        .map(|c| {
            let label = html_escape(&c.label);
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                label,
                if c.selected { " selected" } else { "" },
                label
            )
        })
        .collect();

    let search = view.filters.search.as_deref().unwrap_or_default();

    format!(
        r#"<form class="prensa-toolbar" method="get" action="/prensa/">
    <input type="search" id="prensa-search" name="q" value="{}" placeholder="Buscar publicaciones">
    <select id="prensa-category-select" name="categoria">
        <option value="">Todas las categorías</option>
        {}
    </select>
    <button type="submit">Filtrar</button>
</form>"#,
        html_escape(search),
        options
    )
}

fn render_empty_state() -> &'static str {
    r#"<div class="prensa-empty col-span-full">
    <p>No encontramos publicaciones con ese criterio.</p>
    <a href="/prensa/" id="btn-clear-filters" class="prensa-empty__clear">Limpiar filtros</a>
</div>"#
}

/// Toolbar, result count and the grid (or the empty state).
pub fn render_list(view: &ListView) -> String {
    let count_html = if view.total > 0 {
        format!(
            r#"<p id="prensa-results-count" class="prensa-results-count">Mostrando <span id="count-shown">{}</span> de <span id="count-total">{}</span> publicaciones</p>"#,
            view.shown, view.total
        )
    } else {
        String::new()
    };

    let grid_html = if view.cards.is_empty() {
        render_empty_state().to_string()
    } else {
        render_cards(&view.cards)
    };

    format!(
        r#"<section id="prensa-section" class="prensa-section">
    {}
    {}
    <div class="prensa-grid" id="prensa-grid">
        {}
    </div>
</section>"#,
        render_toolbar(view),
        count_html,
        grid_html
    )
}

/// Shown instead of the list when the feed could not be loaded.
pub fn render_load_error() -> &'static str {
    r#"<section id="prensa-section" class="prensa-section">
    <div class="prensa-empty prensa-empty--error">
        <p>No pudimos cargar las publicaciones. Intentá nuevamente en unos minutos.</p>
    </div>
</section>"#
}
