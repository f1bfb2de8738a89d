use press_kit_validator::validate_feed;
use std::path::PathBuf;

use super::site::Site;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let site = Site::load(&path)?;

    println!("✓ site.toml valid");
    println!(
        "  Site: {} ({})",
        site.config.site.name, site.config.site.canonical_domain
    );
    println!(
        "  Crawlers: {}",
        site.config.metadata.bot_user_agents.join(", ")
    );

    let feed = site.read_feed()?;
    let report = validate_feed(&feed);

    for error in &report.errors {
        println!("  ✗ {}", error);
    }
    for warning in &report.warnings {
        println!("  ⚠ {}", warning);
    }
    for info in &report.info {
        println!("  · {}", info);
    }

    if !report.is_ok() {
        anyhow::bail!(
            "{} has {} error(s)",
            site.config.content.feed_file.display(),
            report.errors.len()
        );
    }

    println!(
        "✓ {} valid ({} warning(s))",
        site.config.content.feed_file.display(),
        report.warnings.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::site::fixtures::site_with_feed;

    #[tokio::test]
    async fn test_valid_feed_passes_with_warnings() {
        let site = site_with_feed(r#"{"items":[{"titulo":"Sin fecha"}]}"#);
        run(site.path().to_path_buf()).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_ids_fail() {
        let site = site_with_feed(r#"{"items":[{"id":"a"},{"id":"a"}]}"#);
        let err = run(site.path().to_path_buf()).await.unwrap_err();
        assert!(err.to_string().contains("1 error(s)"));
    }
}
