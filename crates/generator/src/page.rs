use crate::html::html_escape;
use press_kit_core::SiteConfig;

/// Where the shared stylesheet is written and linked from.
pub const STYLESHEET_PATH: &str = "assets/css/prensa.css";

/// Head values for one page.
#[derive(Debug, Clone)]
pub struct PageMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub canonical_url: Option<&'a str>,
}

/// Wrap `main_html` in the site shell.
///
/// The same shell is used for the static build and the preview server so the
/// pages look identical. `is_preview` adds the SSE reload script.
pub fn render_page(config: &SiteConfig, meta: &PageMeta<'_>, main_html: &str, is_preview: bool) -> String {
    let reload_script = if is_preview {
        r#"<script>
        // Hot reload via Server-Sent Events
        const eventSource = new EventSource('/_reload');
        eventSource.onmessage = () => {
            console.log('Reloading...');
            location.reload();
        };
        eventSource.onerror = () => {
            console.log('Preview server disconnected');
            eventSource.close();
        };
    </script>"#
    } else {
        ""
    };

    let canonical_html = meta
        .canonical_url
        .map(|url| format!(r#"<link rel="canonical" href="{}">"#, html_escape(url)))
        .unwrap_or_default();

    let site_name = html_escape(&config.site.name);

    format!(
        r#"<!DOCTYPE html>
<html lang="{}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <meta name="description" content="{}">
    {}
    <link rel="stylesheet" href="/{}">
</head>
<body>
    <header class="site-header">
        <a href="/" class="site-header__brand">{}</a>
        <nav class="site-header__nav">
            <a href="/prensa/">Prensa</a>
        </nav>
    </header>
    <main class="press-detail">
        <div class="container">
            {}
        </div>
    </main>
    <footer class="site-footer">{}</footer>
    {}
</body>
</html>
"#,
        html_escape(&config.site.lang),
        html_escape(meta.title),
        html_escape(meta.description),
        canonical_html,
        STYLESHEET_PATH,
        site_name,
        main_html,
        site_name,
        reload_script
    )
}

/// Home page section with the newest publications.
pub fn render_home_teaser(cards_html: &str) -> String {
    format!(
        r#"<section class="home-prensa" id="home-prensa">
    <h2 class="home-prensa__title">Últimas novedades</h2>
    <div class="prensa-grid" id="home-prensa-grid">
        {}
    </div>
    <a href="/prensa/" class="home-prensa__more">Ver todas las publicaciones</a>
</section>"#,
        cards_html
    )
}

/// Stylesheet shared by every generated page.
pub fn generate_css() -> &'static str {
    r#"* { margin: 0; padding: 0; box-sizing: border-box; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    line-height: 1.6;
    color: #1f2937;
    background: #f8fafc;
}

a { color: inherit; }

.container { max-width: 1100px; margin: 0 auto; padding: 2rem 1rem; }

.site-header, .site-footer {
    display: flex;
    justify-content: space-between;
    padding: 1rem 2rem;
    background: #0f172a;
    color: #f8fafc;
}
.site-header a { text-decoration: none; }
.site-footer { justify-content: center; font-size: 0.875rem; }

.prensa-toolbar { display: flex; gap: 0.75rem; flex-wrap: wrap; margin-bottom: 1rem; }
.prensa-toolbar input, .prensa-toolbar select, .prensa-toolbar button {
    padding: 0.5rem 0.75rem;
    border: 1px solid #cbd5e1;
    border-radius: 6px;
    font: inherit;
}
.prensa-results-count { margin-bottom: 1rem; color: #64748b; }

.prensa-grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
    gap: 1.5rem;
}

.prensa-card {
    display: flex;
    flex-direction: column;
    background: #ffffff;
    border-radius: 12px;
    overflow: hidden;
    text-decoration: none;
    box-shadow: 0 2px 8px rgba(15, 23, 42, 0.08);
    transition: transform 0.2s ease;
}
.prensa-card:hover { transform: translateY(-4px); }
.prensa-card__image-container { aspect-ratio: 16 / 9; background: #e2e8f0; }
.prensa-card__img { width: 100%; height: 100%; object-fit: cover; }
.prensa-card__placeholder { display: flex; height: 100%; align-items: center; justify-content: center; font-size: 2.5rem; }
.prensa-card__body { display: flex; flex-direction: column; gap: 0.5rem; padding: 1rem 1.25rem 1.25rem; }
.prensa-card__title { font-size: 1.125rem; }
.prensa-card__excerpt { color: #475569; }
.prensa-card__date { color: #64748b; font-size: 0.875rem; }
.prensa-card__cta { font-weight: 600; color: #1d4ed8; }

.prensa-card__badge, .prensa-detail__badge {
    align-self: flex-start;
    padding: 0.125rem 0.625rem;
    border-radius: 999px;
    font-size: 0.75rem;
    font-weight: 600;
    color: #ffffff;
}
.badge-blue { background: #2563eb; }
.badge-magenta { background: #c026d3; }
.badge-purple { background: #7c3aed; }
.badge-orange { background: #ea580c; }
.badge-green { background: #16a34a; }
.badge-cyan { background: #0891b2; }

.prensa-empty, .prensa-missing { padding: 3rem 1rem; text-align: center; }
.prensa-empty--error { color: #b91c1c; }
.prensa-missing__icon { font-size: 3rem; }

.press-article { background: #ffffff; border-radius: 12px; padding: 2rem; margin: 1rem 0 2rem; }
.prensa-detail__header { display: flex; flex-direction: column; gap: 0.5rem; margin-bottom: 1.5rem; }
.prensa-detail__title { font-size: 2rem; line-height: 1.2; }
.prensa-detail__subtitle { font-size: 1.125rem; color: #475569; }
.prensa-detail__date { color: #64748b; }
.prensa-detail__image { width: 100%; border-radius: 8px; cursor: zoom-in; }
.prensa-detail__content { margin: 1.5rem 0; }
.prensa-detail__content p { margin-bottom: 1rem; }
.prensa-detail__document {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 1rem;
    border: 1px solid #e2e8f0;
    border-radius: 8px;
}
.prensa-detail__share { display: flex; gap: 0.75rem; align-items: center; margin-top: 1.5rem; }

.press-embed { display: flex; justify-content: center; margin: 1.5rem 0; }
.press-embed--external { flex-direction: column; align-items: center; gap: 0.5rem; }
.press-embed__frame { max-width: 100%; border: 0; }

.lightbox {
    display: none;
    position: fixed;
    inset: 0;
    align-items: center;
    justify-content: center;
    background: rgba(0, 0, 0, 0.9);
    z-index: 50;
}
.lightbox:target { display: flex; }
.lightbox__img { max-width: 90vw; max-height: 90vh; }
.lightbox__close {
    position: absolute;
    top: 1rem;
    right: 1.5rem;
    color: #ffffff;
    font-size: 2rem;
    text-decoration: none;
}

.latest-news-section { margin-top: 2rem; }
.latest-news__title, .home-prensa__title { margin-bottom: 1rem; }
.home-prensa__more { display: inline-block; margin-top: 1.5rem; font-weight: 600; }
"#
}
