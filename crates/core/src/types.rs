use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteInfo,
    pub content: ContentConfig,
    pub metadata: MetadataConfig,
    pub oauth: OAuthConfig,
}

/// Public identity of the site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    pub name: String,
    /// Scheme and host without a trailing slash, e.g. `https://www.example.com`
    pub canonical_domain: String,
    pub lang: String,
}

impl SiteInfo {
    /// Turn a site-relative path into an absolute URL on the canonical domain.
    /// Fully qualified URLs pass through.
    pub fn absolute_url(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else if let Some(rest) = path_or_url.strip_prefix('/') {
            format!("{}/{}", self.canonical_domain, rest)
        } else {
            format!("{}/{}", self.canonical_domain, path_or_url)
        }
    }
}

/// Where the press feed lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Feed file relative to the site (or build output) directory
    pub feed_file: PathBuf,
    /// URL path the feed is served at
    pub feed_path: String,
}

/// Social preview metadata settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    pub default_title: String,
    pub default_description: String,
    pub default_image: String,
    pub description_max_len: usize,
    /// Seconds, always within 300..=600
    pub cache_max_age: u32,
    pub not_found: NotFoundPolicy,
    pub debug_headers: bool,
    pub bot_user_agents: Vec<String>,
}

/// What the crawler responder does when the requested item does not exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotFoundPolicy {
    /// Hand the request to the regular page, which shows its own not-found view
    PassThrough,
    /// Answer with the default title, description and image
    #[default]
    DefaultMetadata,
}

/// Identity provider used by the CMS login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub provider: String,
    pub authorize_url: String,
    pub token_url: String,
    pub scope: String,
    pub redirect_uri: String,
}
