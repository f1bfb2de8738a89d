use anyhow::{Context, Result};
use press_kit_core::feed::{parse_feed, prepare};
use press_kit_generator::generate_site;
use press_kit_validator::{AssignMode, assign_identifiers_str};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::site::Site;

/// Build the site's asset root
///
/// Copies `static/`, writes the feed with every item carrying its resolved
/// `id`, and pre-renders the home teaser and the unfiltered press list.
/// Detail links (`/prensa/?id=`) and the list filters are query-dependent,
/// so the output is meant to be served by `press-kit serve --root`, which
/// renders those per request and answers crawlers. A plain static host only
/// ever shows the full list.
pub async fn run(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("🔨 Building press site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let site = Site::load(&path)?;

    println!("✓ Loaded: {}", site.config.site.name);
    println!("  Domain: {}", site.config.site.canonical_domain);

    let feed = site.read_feed()?;
    let (normalized, assignments) =
        assign_identifiers_str(&feed, AssignMode::All).context("Failed to read press feed")?;
    let items = prepare(parse_feed(&normalized).context("Failed to parse press feed")?);

    println!("  Items: {}", items.len());
    if !assignments.is_empty() {
        println!("  Derived ids: {}", assignments.len());
    }
    println!();

    println!("📁 Creating output directory...");
    fs::create_dir_all(&output).context("Failed to create output directory")?;
    println!("   ✓ Created {}", output.display());

    println!("🗂  Copying static files...");
    let copied = copy_tree(&site.static_dir(), &output)?;
    println!("   ✓ Copied {} static files", copied);

    println!("📰 Writing feed...");
    let feed_out = output.join(&site.config.content.feed_file);
    write_file(&feed_out, normalized)?;
    println!("   ✓ Wrote {}", site.config.content.feed_file.display());

    println!("📄 Generating pages...");
    let generated = generate_site(&site.config, &items);
    for (rel, html) in &generated.pages {
        write_file(&output.join(rel), html)?;
        println!("   ✓ Generated {}", rel);
    }
    for (rel, data) in &generated.assets {
        write_file(&output.join(rel), data)?;
        println!("   ✓ Generated {}", rel);
    }

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();
    println!("Serve it (detail pages and filters are rendered per request):");
    println!(
        "   press-kit serve {} --root {}",
        path.display(),
        output.display()
    );
    println!();

    Ok(())
}

/// Copy every file under `src` into `dst`, keeping relative paths.
fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    if !src.exists() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::site::fixtures::site_with_feed;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_build_writes_pages_feed_and_static() {
        let site = site_with_feed(
            r#"{"items":[
                {"titulo":"Presentación del Proyecto","fecha":"2024-06-01","cuerpo":"Texto"},
                {"id":"fijo","titulo":"Con id","fecha":"2024-01-01"}
            ]}"#,
        );
        fs::create_dir_all(site.path().join("static/assets/img")).unwrap();
        fs::write(site.path().join("static/robots.txt"), "User-agent: *\n").unwrap();
        fs::write(site.path().join("static/assets/img/logo.png"), b"png").unwrap();

        let out = TempDir::new().unwrap();
        run(site.path().to_path_buf(), out.path().to_path_buf())
            .await
            .unwrap();

        assert!(out.path().join("robots.txt").exists());
        assert!(out.path().join("assets/img/logo.png").exists());
        assert!(out.path().join("assets/css/prensa.css").exists());

        let list = fs::read_to_string(out.path().join("prensa/index.html")).unwrap();
        assert!(list.contains("/prensa/?id=2024-06-01-presentacion-del-proyecto"));
        assert!(list.contains("/prensa/?id=fijo"));

        let feed: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(out.path().join("content/prensa.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            feed["items"][0]["id"],
            "2024-06-01-presentacion-del-proyecto"
        );
        assert_eq!(feed["items"][0]["cuerpo"], "Texto");
        assert_eq!(feed["items"][1]["id"], "fijo");
    }

    #[tokio::test]
    async fn test_build_fails_on_malformed_feed() {
        let site = site_with_feed("{items: nope");
        let out = TempDir::new().unwrap();
        let err = run(site.path().to_path_buf(), out.path().to_path_buf())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read press feed"));
    }
}
