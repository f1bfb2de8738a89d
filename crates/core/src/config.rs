use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BOT_USER_AGENTS: &[&str] = &[
    "facebookexternalhit",
    "WhatsApp",
    "Twitterbot",
    "Slackbot",
    "Discordbot",
    "LinkedInBot",
    "TelegramBot",
];

const MIN_CACHE_MAX_AGE: u32 = 300;
const MAX_CACHE_MAX_AGE: u32 = 600;

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSite,
    #[serde(default)]
    content: RawContent,
    #[serde(default)]
    metadata: RawMetadata,
    #[serde(default)]
    oauth: RawOAuth,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    name: String,
    canonical_domain: String,
    lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawContent {
    feed_file: Option<String>, // Convert to PathBuf
    feed_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    default_title: Option<String>,
    default_description: Option<String>,
    default_image: Option<String>,
    description_max_len: Option<usize>,
    cache_max_age: Option<u32>,
    not_found: Option<NotFoundPolicy>,
    debug_headers: Option<bool>,
    bot_user_agents: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOAuth {
    provider: Option<String>,
    authorize_url: Option<String>,
    token_url: Option<String>,
    scope: Option<String>,
    redirect_uri: Option<String>,
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let name = raw.site.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::ConfigParse("Empty 'site.name'".to_string()));
    }
    let canonical_domain = validate_domain(&raw.site.canonical_domain)?;

    let site = SiteInfo {
        name: name.clone(),
        canonical_domain: canonical_domain.clone(),
        lang: raw.site.lang.unwrap_or_else(|| "es".to_string()),
    };

    let content = ContentConfig {
        feed_file: validate_path(
            raw.content
                .feed_file
                .as_deref()
                .unwrap_or("content/prensa.json"),
            "content.feed_file",
        )?,
        feed_path: validate_url_path(
            raw.content
                .feed_path
                .as_deref()
                .unwrap_or("/content/prensa.json"),
            "content.feed_path",
        )?,
    };

    let metadata = convert_metadata(raw.metadata, &name)?;

    let oauth = OAuthConfig {
        provider: raw.oauth.provider.unwrap_or_else(|| "github".to_string()),
        authorize_url: raw
            .oauth
            .authorize_url
            .unwrap_or_else(|| "https://github.com/login/oauth/authorize".to_string()),
        token_url: raw
            .oauth
            .token_url
            .unwrap_or_else(|| "https://github.com/login/oauth/access_token".to_string()),
        scope: raw.oauth.scope.unwrap_or_else(|| "repo,user".to_string()),
        redirect_uri: raw
            .oauth
            .redirect_uri
            .unwrap_or_else(|| format!("{}/callback", canonical_domain)),
    };

    Ok(SiteConfig {
        site,
        content,
        metadata,
        oauth,
    })
}

fn convert_metadata(raw: RawMetadata, site_name: &str) -> Result<MetadataConfig> {
    let description_max_len = raw.description_max_len.unwrap_or(180);
    if description_max_len < 4 {
        return Err(Error::ConfigParse(format!(
            "'metadata.description_max_len' must be at least 4, got {}",
            description_max_len
        )));
    }

    let requested_max_age = raw.cache_max_age.unwrap_or(MIN_CACHE_MAX_AGE);
    let cache_max_age = requested_max_age.clamp(MIN_CACHE_MAX_AGE, MAX_CACHE_MAX_AGE);
    if cache_max_age != requested_max_age {
        tracing::warn!(
            requested = requested_max_age,
            used = cache_max_age,
            "metadata.cache_max_age outside 300..=600, clamped"
        );
    }

    let bot_user_agents = match raw.bot_user_agents {
        Some(agents) => {
            let agents: Vec<String> = agents
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();
            if agents.is_empty() {
                return Err(Error::ConfigParse(
                    "'metadata.bot_user_agents' must list at least one crawler".to_string(),
                ));
            }
            agents
        }
        None => DEFAULT_BOT_USER_AGENTS
            .iter()
            .map(|a| a.to_string())
            .collect(),
    };

    Ok(MetadataConfig {
        default_title: raw
            .default_title
            .unwrap_or_else(|| format!("Detalle de Prensa | {}", site_name)),
        default_description: raw
            .default_description
            .unwrap_or_else(|| "Detalle de la publicación.".to_string()),
        default_image: raw
            .default_image
            .unwrap_or_else(|| "/assets/img/hero-diputados.jpg".to_string()),
        description_max_len,
        cache_max_age,
        not_found: raw.not_found.unwrap_or_default(),
        debug_headers: raw.debug_headers.unwrap_or(false),
        bot_user_agents,
    })
}

fn validate_domain(domain: &str) -> Result<String> {
    let domain = domain.trim().trim_end_matches('/');
    if !(domain.starts_with("https://") || domain.starts_with("http://")) {
        return Err(Error::ConfigParse(format!(
            "'site.canonical_domain' must start with http:// or https://: '{}'",
            domain
        )));
    }
    Ok(domain.to_string())
}

fn validate_url_path(path: &str, field_name: &str) -> Result<String> {
    if !path.starts_with('/') {
        return Err(Error::ConfigParse(format!(
            "'{}' must be an absolute URL path starting with '/': '{}'",
            field_name, path
        )));
    }
    Ok(path.to_string())
}

/// Validate and convert a path string to PathBuf.
///
/// This function prevents path traversal vulnerabilities by rejecting:
/// - Absolute paths (starting with `/` or Windows drive letters)
/// - Paths containing parent directory references (`..`)
///
/// # Examples
///
/// ```text
/// validate_path("content/prensa.json", "content.feed_file")  → Ok(PathBuf)
/// validate_path("/etc/passwd", "content.feed_file")  → Err("Absolute paths not allowed...")
/// validate_path("../../secrets.json", "content.feed_file")  → Err("Parent directory references...")
/// ```
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    Ok(path.to_path_buf())
}
