use anyhow::{Context, Result};
use chrono::Local;
use press_kit_core::config::parse_site_toml;
use std::fs;
use std::path::{Path, PathBuf};

use super::site::{SITE_TOML, STATIC_DIR};

const FEED_FILE: &str = "content/prensa.json";

/// Escape a string for safe inclusion in a TOML basic string
///
/// Handles the required escape sequences:
/// - Backslash (\\) -> \\\\
/// - Quote (\") -> \\\"
/// - Backspace (\b) -> \\b
/// - Form feed (\f) -> \\f
/// - Newline (\n) -> \\n
/// - Carriage return (\r) -> \\r
/// - Tab (\t) -> \\t
///
/// The template carries comments, which serializing through the toml crate
/// would drop.
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

pub async fn run(path: PathBuf, name: Option<String>, domain: Option<String>) -> Result<()> {
    println!("Initializing site directory: {}", path.display());

    if !path.exists() {
        anyhow::bail!(
            "Directory '{}' does not exist. Create it first: mkdir {}",
            path.display(),
            path.display()
        );
    }

    let site_toml_path = path.join(SITE_TOML);
    if site_toml_path.exists() {
        anyhow::bail!(
            "site.toml already exists at {}\nHint: Delete it first or use a different directory",
            site_toml_path.display()
        );
    }

    if let Some(domain) = &domain
        && !(domain.starts_with("https://") || domain.starts_with("http://"))
    {
        anyhow::bail!("Domain must start with http:// or https://: '{}'", domain);
    }

    fs::create_dir_all(path.join("content")).context("Failed to create content directory")?;
    fs::create_dir_all(path.join(STATIC_DIR)).context("Failed to create static directory")?;

    generate_site_toml(&path, name.as_deref(), domain.as_deref())?;
    let feed_created = generate_sample_feed(&path)?;

    // Catch template mistakes before the user does.
    parse_site_toml(&site_toml_path).context("Generated site.toml does not parse")?;

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── site.toml            ← Edit this to set name and domain");
    println!("  ├── content/");
    if feed_created {
        println!("  │   └── prensa.json      ← Press items, edited by the CMS");
    }
    println!("  └── static/              ← Copied as-is into the build");

    println!("\nNext steps:");
    println!("  1. Edit site.toml (name, canonical domain, default image)");
    println!("  2. Check the feed: press-kit validate {}", path.display());
    println!("  3. Preview: press-kit serve {} --watch", path.display());

    Ok(())
}

fn generate_site_toml(base: &Path, name: Option<&str>, domain: Option<&str>) -> Result<()> {
    let site_name = toml_escape_string(name.unwrap_or("Mi Sitio"));
    let canonical_domain = toml_escape_string(domain.unwrap_or("https://www.example.com"));

    let name_comment = if name.is_some() {
        ""
    } else {
        "  # TODO: Set site name"
    };
    let domain_comment = if domain.is_some() {
        ""
    } else {
        "  # TODO: Set canonical domain"
    };

    let toml = format!(
        r#"[site]
name = "{site_name}"{name_comment}
canonical_domain = "{canonical_domain}"{domain_comment}
lang = "es"

[content]
feed_file = "{FEED_FILE}"
feed_path = "/{FEED_FILE}"

[metadata]
# default_title = "Detalle de Prensa | {site_name}"
default_description = "Detalle de la publicación."
default_image = "/assets/img/og-default.jpg"
description_max_len = 180
cache_max_age = 300           # seconds, 300..=600
not_found = "default-metadata" # or "pass-through"
debug_headers = false

[oauth]
provider = "github"
scope = "repo,user"
# Credentials come from GITHUB_CLIENT_ID and GITHUB_CLIENT_SECRET
"#
    );

    fs::write(base.join(SITE_TOML), toml).context("Failed to write site.toml")?;
    println!("✓ Generated site.toml");
    Ok(())
}

/// Writes a one-item feed unless one already exists. Returns whether it wrote.
fn generate_sample_feed(base: &Path) -> Result<bool> {
    let feed_path = base.join(FEED_FILE);
    if feed_path.exists() {
        println!("✓ Kept existing {}", FEED_FILE);
        return Ok(false);
    }

    let today = Local::now().format("%Y-%m-%d").to_string();
    let feed = format!(
        r#"{{
  "items": [
    {{
      "titulo": "Primera publicación",
      "subtitulo": "Reemplazá este texto desde el CMS.",
      "fecha": "{today}",
      "etiqueta": "Noticia",
      "cuerpo": "Contenido de la publicación."
    }}
  ]
}}
"#
    );

    fs::write(&feed_path, feed).context("Failed to write sample feed")?;
    println!("✓ Generated {}", FEED_FILE);
    Ok(true)
}
