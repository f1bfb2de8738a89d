// Press pages: pure view models plus the HTML they bind to

pub mod body;
pub mod detail;
pub mod html;
pub mod list;
pub mod meta;
pub mod page;

use detail::{build_detail_view, find_item, render_detail, render_not_found};
use list::{Filters, build_list_view, latest, render_cards, render_list, render_load_error};
use page::{PageMeta, STYLESHEET_PATH, generate_css, render_home_teaser, render_page};
use press_kit_core::{ResolvedItem, SiteConfig};

pub use meta::{SocialMetadata, render_metadata_document};

const HOME_TEASER_COUNT: usize = 3;

pub struct GeneratedSite {
    pub pages: Vec<(String, String)>,   // (path, html)
    pub assets: Vec<(String, Vec<u8>)>, // (path, data)
}

/// A rendered detail route. `not_found` lets servers pick a status code.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub not_found: bool,
}

/// Pre-render the pages that do not depend on query parameters.
pub fn generate_site(config: &SiteConfig, items: &[ResolvedItem]) -> GeneratedSite {
    GeneratedSite {
        pages: vec![
            ("index.html".to_string(), home_page(config, items, false)),
            (
                "prensa/index.html".to_string(),
                list_page(config, items, &Filters::default(), false),
            ),
        ],
        assets: vec![(
            STYLESHEET_PATH.to_string(),
            generate_css().as_bytes().to_vec(),
        )],
    }
}

pub fn home_page(config: &SiteConfig, items: &[ResolvedItem], is_preview: bool) -> String {
    let cards = latest(items, HOME_TEASER_COUNT);
    let main = render_home_teaser(&render_cards(&cards));
    let canonical = format!("{}/", config.site.canonical_domain);
    let meta = PageMeta {
        title: &config.site.name,
        description: &config.metadata.default_description,
        canonical_url: Some(&canonical),
    };
    render_page(config, &meta, &main, is_preview)
}

pub fn list_page(
    config: &SiteConfig,
    items: &[ResolvedItem],
    filters: &Filters,
    is_preview: bool,
) -> String {
    let view = build_list_view(items, filters);
    let title = format!("Prensa | {}", config.site.name);
    let canonical = format!("{}/prensa/", config.site.canonical_domain);
    let meta = PageMeta {
        title: &title,
        description: &config.metadata.default_description,
        canonical_url: Some(&canonical),
    };
    render_page(config, &meta, &render_list(&view), is_preview)
}

/// List page shown when the feed could not be loaded.
pub fn load_error_page(config: &SiteConfig, is_preview: bool) -> String {
    let title = format!("Prensa | {}", config.site.name);
    let meta = PageMeta {
        title: &title,
        description: &config.metadata.default_description,
        canonical_url: None,
    };
    render_page(config, &meta, render_load_error(), is_preview)
}

pub fn detail_page(
    config: &SiteConfig,
    items: &[ResolvedItem],
    key: Option<&str>,
    is_preview: bool,
) -> RenderedPage {
    let found = key.and_then(|key| find_item(items, key));

    match found {
        Some(current) => {
            let view = build_detail_view(current, items, config);
            let meta = PageMeta {
                title: &view.page_title,
                description: &view.page_description,
                canonical_url: Some(&view.canonical_url),
            };
            RenderedPage {
                html: render_page(config, &meta, &render_detail(&view), is_preview),
                not_found: false,
            }
        }
        None => {
            let message = match key {
                Some(_) => "La publicación que buscás no existe o fue eliminada.",
                None => "No se indicó qué publicación mostrar.",
            };
            let meta = PageMeta {
                title: &config.metadata.default_title,
                description: &config.metadata.default_description,
                canonical_url: None,
            };
            RenderedPage {
                html: render_page(config, &meta, &render_not_found(message), is_preview),
                not_found: true,
            }
        }
    }
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

    fn items() -> Vec<ResolvedItem> {
        prepare(
            parse_feed(
                r#"{"items":[
                    {"titulo":"A","fecha":"2024-01-01"},
                    {"titulo":"B","fecha":"2024-06-01"},
                    {"titulo":"C","fecha":"2024-03-01"},
                    {"titulo":"D","fecha":"2023-03-01"}
                ]}"#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_generate_site_outputs() {
        let site = generate_site(&config(), &items());
        let paths: Vec<_> = site.pages.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["index.html", "prensa/index.html"]);
        assert_eq!(site.assets[0].0, "assets/css/prensa.css");
    }

    #[test]
    fn test_list_page_orders_newest_first() {
        let html = list_page(&config(), &items(), &Filters::default(), false);
        let b = html.find("2024-06-01-b").unwrap();
        let a = html.find("2024-01-01-a").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_home_page_shows_three_latest() {
        let html = home_page(&config(), &items(), false);
        assert!(html.contains("2024-06-01-b"));
        assert!(html.contains("2024-03-01-c"));
        assert!(html.contains("2024-01-01-a"));
        assert!(!html.contains("2023-03-01-d"));
    }

    #[test]
    fn test_detail_page_found_and_missing() {
        let items = items();
        let page = detail_page(&config(), &items, Some("2024-03-01-c"), false);
        assert!(!page.not_found);
        assert!(page.html.contains("<title>C | Cecilia Gortari</title>"));

        let page = detail_page(&config(), &items, Some("nada"), false);
        assert!(page.not_found);
        assert!(page.html.contains("Volver al listado"));

        assert!(detail_page(&config(), &items, None, false).not_found);
    }

    #[test]
    fn test_load_error_page() {
        assert!(load_error_page(&config(), false).contains("No pudimos cargar las publicaciones"));
    }
}
