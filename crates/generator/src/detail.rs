//! Single press item view.

use crate::body::{reading_time_label, render_body, social_post_id};
use crate::html::{encode_uri_component, html_escape};
use crate::list::{CardView, render_cards};
use crate::meta::{canonical_detail_url, describe};
use press_kit_core::dates::format_long_with_weekday;
use press_kit_core::{ResolvedItem, SiteConfig};

const RELATED_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedBlock {
    /// The post id could be extracted, so the post is embedded inline.
    Iframe { embed_url: String, post_url: String },
    /// Unrecognized link: offer a button to open it instead.
    External { post_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub network: &'static str,
    pub label: &'static str,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub category: String,
    pub badge_class: &'static str,
    pub date: Option<String>,
    pub reading_time: Option<String>,
    pub image_url: Option<String>,
    pub body_html: String,
    pub document_url: Option<String>,
    pub embed: Option<EmbedBlock>,
    pub share: Vec<ShareLink>,
    pub related: Vec<CardView>,
    pub page_title: String,
    pub page_description: String,
    pub canonical_url: String,
}

/// Find an item by its resolved identifier, or by its explicit slug for
/// links from the old `/prensa/detalle/?slug=` pages.
pub fn find_item<'a>(items: &'a [ResolvedItem], key: &str) -> Option<&'a ResolvedItem> {
    items
        .iter()
        .find(|r| r.id == key)
        .or_else(|| items.iter().find(|r| r.item.has_explicit_key(key)))
}

/// Up to three other items, newest first.
pub fn related<'a>(items: &'a [ResolvedItem], current_id: &str) -> Vec<&'a ResolvedItem> {
    let mut others: Vec<&ResolvedItem> = items.iter().filter(|r| r.id != current_id).collect();
    others.sort_by(|a, b| a.item.published.cmp_newest_first(&b.item.published));
    others.truncate(RELATED_COUNT);
    others
}

pub fn embed_block(url: &str) -> EmbedBlock {
    match social_post_id(url) {
        Some(post_id) => EmbedBlock::Iframe {
            embed_url: format!("https://www.instagram.com/p/{}/embed", post_id),
            post_url: url.to_string(),
        },
        None => EmbedBlock::External {
            post_url: url.to_string(),
        },
    }
}

pub fn share_links(canonical_url: &str, title: &str) -> Vec<ShareLink> {
    let url = encode_uri_component(canonical_url);
    vec![
        ShareLink {
            network: "whatsapp",
            label: "WhatsApp",
            href: format!(
                "https://wa.me/?text={}",
                encode_uri_component(&format!("{} {}", title, canonical_url))
            ),
        },
        ShareLink {
            network: "facebook",
            label: "Facebook",
            href: format!("https://www.facebook.com/sharer/sharer.php?u={}", url),
        },
        ShareLink {
            network: "x",
            label: "X",
            href: format!(
                "https://twitter.com/intent/tweet?url={}&text={}",
                url,
                encode_uri_component(title)
            ),
        },
    ]
}

pub fn build_detail_view(
    current: &ResolvedItem,
    all: &[ResolvedItem],
    config: &SiteConfig,
) -> DetailView {
    let item = &current.item;
    let title = item.title_or_default().to_string();
    let body = item.body.as_deref().unwrap_or_default();
    let canonical_url = canonical_detail_url(&config.site, &current.id);

    DetailView {
        id: current.id.clone(),
        subtitle: item.subtitle.clone(),
        category: item.category.label().to_string(),
        badge_class: item.category.badge_class(),
        date: item.published.date().map(format_long_with_weekday),
        reading_time: reading_time_label(body),
        image_url: item.image_url.clone(),
        body_html: render_body(body),
        document_url: item.document_url.clone(),
        embed: item.social_embed_url.as_deref().map(embed_block),
        share: share_links(&canonical_url, &title),
        related: related(all, &current.id)
            .into_iter()
            .map(CardView::from_resolved)
            .collect(),
        page_title: format!("{} | {}", title, config.site.name),
        page_description: describe(item, config.metadata.description_max_len)
            .unwrap_or_else(|| config.metadata.default_description.clone()),
        canonical_url,
        title,
    }
}

fn render_embed(embed: &EmbedBlock) -> String {
    match embed {
        EmbedBlock::Iframe {
            embed_url,
            post_url,
        } => format!(
            r#"<div class="press-embed">
    <iframe src="{}" width="400" height="480" frameborder="0" scrolling="no" allowtransparency="true" class="press-embed__frame"></iframe>
</div>
<div class="press-embed__link">
    <a href="{}" target="_blank" rel="noopener">Ver publicación en Instagram &rarr;</a>
</div>"#,
            html_escape(embed_url),
            html_escape(post_url)
        ),
        EmbedBlock::External { post_url } => format!(
            r#"<div class="press-embed press-embed--external">
    <h4>Ver contenido en Instagram</h4>
    <a href="{}" target="_blank" rel="noopener" class="press-embed__button">Abrir en Instagram</a>
</div>"#,
            html_escape(post_url)
        ),
    }
}

pub fn render_detail(view: &DetailView) -> String {
    let title = html_escape(&view.title);

    let subtitle_html = view
        .subtitle
        .as_deref()
        .map(|s| format!(r#"<p class="prensa-detail__subtitle">{}</p>"#, html_escape(s)))
        .unwrap_or_default();

    let meta_line: Vec<String> = [view.date.as_deref(), view.reading_time.as_deref()]
        .into_iter()
        .flatten()
        .map(html_escape)
        .collect();

    // Clicking the image opens the :target lightbox at the end of the article.
    let image_html = view
        .image_url
        .as_deref()
        .map(|url| {
            let url = html_escape(url);
            format!(
                r##"<a href="#lightbox" class="prensa-detail__image-link">
    <img src="{url}" alt="{title}" class="prensa-detail__image" loading="eager">
</a>
<div id="lightbox" class="lightbox">
    <a href="#" class="lightbox__close" aria-label="Cerrar">&times;</a>
    <img src="{url}" alt="{title}" class="lightbox__img">
</div>"##
            )
        })
        .unwrap_or_default();

    let embed_html = view.embed.as_ref().map(render_embed).unwrap_or_default();

    let document_html = view
        .document_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<div class="prensa-detail__document">
    <div>
        <h4>Documento adjunto</h4>
        <p>Formato PDF/Archivo</p>
    </div>
    <a href="{}" target="_blank" rel="noopener" class="prensa-detail__download">Descargar documento</a>
</div>"#,
                html_escape(url)
            )
        })
        .unwrap_or_default();

    let share_html: String = view
        .share
        .iter()
        .map(|link| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener" class="share-link share-link--{}">{}</a>"#,
                html_escape(&link.href),
                link.network,
                link.label
            )
        })
        .collect();

    let related_html = if view.related.is_empty() {
        String::new()
    } else {
        format!(
            r#"<section id="latest-news-container" class="latest-news-section">
    <h3 class="latest-news__title">Otras novedades</h3>
    <div class="prensa-grid" id="latest-news-grid">
        {}
    </div>
</section>"#,
            render_cards(&view.related)
        )
    };

    format!(
        r#"<div class="prensa-detail" id="prensa-detalle">
    <a href="/prensa/" class="press-detail__back">&larr; Volver al listado</a>
    <article class="press-article" id="prensa-detail-container">
        <header class="prensa-detail__header">
            <span class="prensa-detail__badge {}">{}</span>
            <h1 class="prensa-detail__title">{}</h1>
            {}
            <span class="prensa-detail__date">{}</span>
        </header>
        {}
        {}
        <div class="prensa-detail__content">
            {}
        </div>
        {}
        <div class="prensa-detail__share">
            <span>Compartir:</span>
            {}
        </div>
    </article>
    {}
</div>"#,
        view.badge_class,
        html_escape(&view.category),
        title,
        subtitle_html,
        meta_line.join(" · "),
        image_html,
        embed_html,
        view.body_html,
        document_html,
        share_html,
        related_html
    )
}

pub fn render_not_found(message: &str) -> String {
    format!(
        r#"<div class="prensa-detail prensa-detail--missing" id="prensa-detalle">
    <div class="prensa-missing">
        <div class="prensa-missing__icon">😕</div>
        <h2>Publicación no encontrada</h2>
        <p>{}</p>
        <a href="/prensa/" class="prensa-missing__back">Volver al listado</a>
    </div>
</div>"#,
        html_escape(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use press_kit_core::config::parse_site_toml_str;
    use press_kit_core::{parse_feed, prepare};

    fn config() -> SiteConfig {
        parse_site_toml_str(
            r#"
[site]
name = "Cecilia Gortari"
canonical_domain = "https://www.ceciliagortari.com.ar"
"#,
        )
        .unwrap()
    }

    fn feed() -> Vec<ResolvedItem> {
        prepare(
            parse_feed(
                r#"{"items":[
                    {"id":"uno","slug":"viejo-uno","titulo":"Uno","fecha":"2024-01-15","subtitulo":"Resumen uno","imagen":"/uploads/uno.jpg","documento":"/uploads/uno.pdf","instagram_url":"https://www.instagram.com/p/ABC123/"},
                    {"id":"dos","titulo":"Dos","fecha":"2024-02-01","cuerpo":"Texto **dos**","instagram_url":"https://www.instagram.com/ceciliagortari/"},
                    {"titulo":"Tres","fecha":"2024-03-01"},
                    {"id":"cuatro","titulo":"Cuatro","fecha":"2023-12-01"},
                    {"id":"cinco","titulo":"Cinco"}
                ]}"#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_find_by_resolved_id_and_slug() {
        let items = feed();
        assert_eq!(find_item(&items, "uno").unwrap().id, "uno");
        assert_eq!(find_item(&items, "2024-03-01-tres").unwrap().id, "2024-03-01-tres");
        assert_eq!(find_item(&items, "viejo-uno").unwrap().id, "uno");
        assert!(find_item(&items, "nada").is_none());
    }

    #[test]
    fn test_related_excludes_current_and_is_newest_first() {
        let items = feed();
        let ids: Vec<_> = related(&items, "dos").into_iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2024-03-01-tres", "uno", "cuatro"]);
    }

    #[test]
    fn test_detail_view_blocks() {
        let items = feed();
        let current = find_item(&items, "uno").unwrap();
        let view = build_detail_view(current, &items, &config());

        assert_eq!(view.page_title, "Uno | Cecilia Gortari");
        assert_eq!(view.page_description, "Resumen uno");
        assert_eq!(view.date.as_deref(), Some("Lunes, 15 de enero de 2024"));
        assert_eq!(
            view.canonical_url,
            "https://www.ceciliagortari.com.ar/prensa/detalle/?id=uno"
        );
        assert_eq!(
            view.embed,
            Some(EmbedBlock::Iframe {
                embed_url: "https://www.instagram.com/p/ABC123/embed".to_string(),
                post_url: "https://www.instagram.com/p/ABC123/".to_string(),
            })
        );
        assert_eq!(view.reading_time, None);
        assert_eq!(view.related.len(), 3);

        let html = render_detail(&view);
        assert!(html.contains(r##"href="#lightbox""##));
        assert!(html.contains("Descargar documento"));
        assert!(html.contains("instagram.com/p/ABC123/embed"));
        assert!(html.contains("Otras novedades"));
        assert!(html.contains("share-link--whatsapp"));
    }

    #[test]
    fn test_detail_view_optional_blocks_absent() {
        let items = feed();
        let current = find_item(&items, "dos").unwrap();
        let view = build_detail_view(current, &items, &config());

        assert_eq!(view.image_url, None);
        assert_eq!(view.reading_time.as_deref(), Some("1 min lectura"));
        assert_eq!(view.page_description, "Texto dos");
        assert!(matches!(view.embed, Some(EmbedBlock::External { .. })));

        let html = render_detail(&view);
        assert!(!html.contains("lightbox"));
        assert!(!html.contains("Descargar documento"));
        assert!(html.contains("Abrir en Instagram"));
        assert!(html.contains("<strong>dos</strong>"));
    }

    #[test]
    fn test_share_links_encode_url() {
        let links = share_links("https://x.org/prensa/detalle/?id=a b", "Título");
        assert_eq!(
            links[1].href,
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fx.org%2Fprensa%2Fdetalle%2F%3Fid%3Da%20b"
        );
    }

    #[test]
    fn test_not_found_escapes_message() {
        let html = render_not_found("<b>x</b>");
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(html.contains(r#"href="/prensa/""#));
    }
}
