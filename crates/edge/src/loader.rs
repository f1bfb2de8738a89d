//! Content Loader: fetches the press feed from an ordered list of sources.

use crate::error::{EdgeError, Result};
use async_trait::async_trait;
use press_kit_core::feed::{ResolvedItem, parse_feed, prepare};
use press_kit_core::PressItem;
use reqwest::header::CACHE_CONTROL;
use std::path::PathBuf;

/// Somewhere the raw feed document can be read from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> String;

    async fn fetch(&self) -> Result<String>;
}

/// The feed file inside the served output directory.
pub struct AssetDirSource {
    path: PathBuf,
}

impl AssetDirSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContentSource for AssetDirSource {
    fn name(&self) -> String {
        format!("assets:{}", self.path.display())
    }

    async fn fetch(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            EdgeError::ContentUnavailable(format!("{}: {}", self.path.display(), e))
        })
    }
}

/// The feed fetched over the network, bypassing caches.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    fn name(&self) -> String {
        format!("http:{}", self.url)
    }

    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| EdgeError::ContentUnavailable(format!("{}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EdgeError::ContentUnavailable(format!(
                "{} returned {}",
                self.url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| EdgeError::ContentUnavailable(format!("{}: {}", self.url, e)))
    }
}

/// Tries each source in order and returns the first feed that parses.
#[derive(Default)]
pub struct ContentLoader {
    sources: Vec<Box<dyn ContentSource>>,
}

impl ContentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl ContentSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Items in feed order. Sorting and identifier resolution are left to the caller.
    pub async fn load_items(&self) -> Result<Vec<PressItem>> {
        for source in &self.sources {
            let name = source.name();
            let attempt = match source.fetch().await {
                Ok(content) => {
                    parse_feed(&content).map_err(|e| EdgeError::ContentUnavailable(e.to_string()))
                }
                Err(e) => Err(e),
            };

            match attempt {
                Ok(items) => {
                    tracing::debug!(source = %name, count = items.len(), "feed loaded");
                    return Ok(items);
                }
                Err(e) => {
                    tracing::warn!(source = %name, error = %e, "feed source failed");
                }
            }
        }

        Err(EdgeError::ContentUnavailable(
            "no content source returned a readable feed".to_string(),
        ))
    }

    /// Items with resolved identifiers, newest first.
    pub async fn load_resolved(&self) -> Result<Vec<ResolvedItem>> {
        self.load_items().await.map(prepare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_asset_dir_source_reads_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prensa.json");
        std::fs::write(&path, r#"{"items":[{"id":"a","titulo":"A"}]}"#).unwrap();

        let loader = ContentLoader::new().with_source(AssetDirSource::new(&path));
        let items = loader.load_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_falls_back_past_missing_and_malformed_sources() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        let good = dir.path().join("good.json");
        std::fs::write(&broken, "{not json").unwrap();
        std::fs::write(&good, r#"{"items":[{"titulo":"B","fecha":"2024-06-01"}]}"#).unwrap();

        let loader = ContentLoader::new()
            .with_source(AssetDirSource::new(dir.path().join("missing.json")))
            .with_source(AssetDirSource::new(&broken))
            .with_source(AssetDirSource::new(&good));

        let items = loader.load_resolved().await.unwrap();
        assert_eq!(items[0].id, "2024-06-01-b");
    }

    #[tokio::test]
    async fn test_total_failure_is_content_unavailable() {
        let loader = ContentLoader::new().with_source(AssetDirSource::new("/nonexistent/feed.json"));
        assert!(matches!(
            loader.load_items().await,
            Err(EdgeError::ContentUnavailable(_))
        ));
        assert!(ContentLoader::new().load_items().await.is_err());
    }

    #[tokio::test]
    async fn test_non_array_items_is_empty_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prensa.json");
        std::fs::write(&path, r#"{"items":"nope"}"#).unwrap();

        let loader = ContentLoader::new().with_source(AssetDirSource::new(&path));
        assert!(loader.load_items().await.unwrap().is_empty());
    }
}
