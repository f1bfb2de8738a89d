use anyhow::{Context, Result};
use press_kit_validator::{AssignMode, assign_identifiers_str};
use std::fs;
use std::path::PathBuf;

use super::site::Site;

/// Persist ids for complete items that lack one, as the CMS does before saving.
pub async fn run(path: PathBuf, dry_run: bool) -> Result<()> {
    let site = Site::load(&path)?;
    let feed_path = site.feed_path();
    let feed = site.read_feed()?;

    let (output, assignments) = assign_identifiers_str(&feed, AssignMode::Editorial)
        .with_context(|| format!("Failed to process {}", feed_path.display()))?;

    if assignments.is_empty() {
        println!("✓ Every complete item already has an id");
        return Ok(());
    }

    for assignment in &assignments {
        println!("  item {} → {}", assignment.index + 1, assignment.id);
    }

    if dry_run {
        println!(
            "Dry run: {} id(s) not written to {}",
            assignments.len(),
            feed_path.display()
        );
    } else {
        fs::write(&feed_path, output)
            .with_context(|| format!("Failed to write {}", feed_path.display()))?;
        println!(
            "✓ Wrote {} id(s) to {}",
            assignments.len(),
            feed_path.display()
        );
    }

    Ok(())
}
