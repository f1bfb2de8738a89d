//! Link-preview metadata document served to social crawlers.

use crate::html::{encode_uri, encode_uri_component, html_escape, strip_markdown, truncate};
use press_kit_core::{PressItem, SiteConfig, SiteInfo};

/// Values for the Open Graph and Twitter Card tags, unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialMetadata {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    /// Absolute and percent-encoded.
    pub image_url: String,
    pub found: bool,
    pub id: String,
}

impl SocialMetadata {
    pub fn for_item(item: &PressItem, requested_id: &str, config: &SiteConfig) -> Self {
        let title = match &item.title {
            Some(title) => format!("{} | {}", title, config.site.name),
            None => config.metadata.default_title.clone(),
        };
        let description = describe(item, config.metadata.description_max_len)
            .unwrap_or_else(|| config.metadata.default_description.clone());
        let image = item
            .image_url
            .as_deref()
            .unwrap_or(&config.metadata.default_image);

        SocialMetadata {
            title,
            description,
            canonical_url: canonical_detail_url(&config.site, requested_id),
            image_url: encode_uri(&config.site.absolute_url(image)),
            found: true,
            id: requested_id.to_string(),
        }
    }

    /// Fallback used when the requested item does not exist.
    pub fn defaults(requested_id: &str, config: &SiteConfig) -> Self {
        SocialMetadata {
            title: config.metadata.default_title.clone(),
            description: config.metadata.default_description.clone(),
            canonical_url: canonical_detail_url(&config.site, requested_id),
            image_url: encode_uri(&config.site.absolute_url(&config.metadata.default_image)),
            found: false,
            id: requested_id.to_string(),
        }
    }
}

/// Subtitle, else a plain-text excerpt of the body cut to `max_len` chars.
pub fn describe(item: &PressItem, max_len: usize) -> Option<String> {
    if let Some(subtitle) = &item.subtitle {
        return Some(subtitle.clone());
    }
    let plain = strip_markdown(item.body.as_deref()?);
    if plain.is_empty() {
        None
    } else {
        Some(truncate(&plain, max_len))
    }
}

pub fn canonical_detail_url(site: &SiteInfo, id: &str) -> String {
    if id.is_empty() {
        format!("{}/prensa/detalle/", site.canonical_domain)
    } else {
        format!(
            "{}/prensa/detalle/?id={}",
            site.canonical_domain,
            encode_uri_component(id)
        )
    }
}

pub fn render_metadata_document(meta: &SocialMetadata, config: &SiteConfig, debug: bool) -> String {
    let title = html_escape(&meta.title);
    let description = html_escape(&meta.description);
    let canonical = html_escape(&meta.canonical_url);
    let image = html_escape(&meta.image_url);
    let site_name = html_escape(&config.site.name);

    let debug_comment = if debug {
        format!(
            "\n  <!-- OG_FUNCTION hit=true found={} id={} -->",
            meta.found,
            html_escape(&meta.id)
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>{debug_comment}
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <meta name="description" content="{description}">
  <link rel="canonical" href="{canonical}">

  <meta property="og:type" content="article">
  <meta property="og:site_name" content="{site_name}">
  <meta property="og:url" content="{canonical}">
  <meta property="og:title" content="{title}">
  <meta property="og:description" content="{description}">
  <meta property="og:image" content="{image}">
  <meta property="og:image:secure_url" content="{image}">
  <meta property="og:image:alt" content="{title}">

  <meta name="twitter:card" content="summary_large_image">
  <meta name="twitter:title" content="{title}">
  <meta name="twitter:description" content="{description}">
  <meta name="twitter:image" content="{image}">
</head>
<body>
  <h1>{title}</h1>
  <p>{description}</p>
  <img src="{image}" alt="{title}">
  <a href="{canonical}">{canonical}</a>
</body>
</html>
"#,
        lang = html_escape(&config.site.lang),
    )
}
