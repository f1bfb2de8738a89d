use anyhow::{Context, Result};
use press_kit_core::SiteConfig;
use press_kit_core::config::parse_site_toml;
use std::fs;
use std::path::{Path, PathBuf};

pub const SITE_TOML: &str = "site.toml";
pub const STATIC_DIR: &str = "static";

/// A site directory: `site.toml`, the feed file and a `static/` tree.
pub struct Site {
    pub root: PathBuf,
    pub config: SiteConfig,
}

impl Site {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Site directory does not exist: {}", path.display());
        }

        let config_path = path.join(SITE_TOML);
        if !config_path.exists() {
            anyhow::bail!(
                "site.toml not found in {}\nRun 'press-kit init {}' first",
                path.display(),
                path.display()
            );
        }

        let config = parse_site_toml(&config_path).context("Failed to parse site.toml")?;
        Ok(Self {
            root: path.to_path_buf(),
            config,
        })
    }

    pub fn feed_path(&self) -> PathBuf {
        self.root.join(&self.config.content.feed_file)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.root.join(STATIC_DIR)
    }

    pub fn read_feed(&self) -> Result<String> {
        let feed_path = self.feed_path();
        if !feed_path.exists() {
            anyhow::bail!("Feed not found: {}", feed_path.display());
        }
        fs::read_to_string(&feed_path)
            .with_context(|| format!("Failed to read {}", feed_path.display()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_requires_site_toml() {
        let dir = TempDir::new().unwrap();
        let err = Site::load(dir.path()).err().unwrap();
        assert!(err.to_string().contains("site.toml not found"));
    }

    #[test]
    fn test_missing_feed_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SITE_TOML), fixtures::SITE).unwrap();
        let site = Site::load(dir.path()).unwrap();
        let err = site.read_feed().unwrap_err();
        assert!(err.to_string().contains("Feed not found"));
    }
}
