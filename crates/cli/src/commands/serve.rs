use anyhow::{Context, Result};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use press_kit_edge::{
    AppState, AssetDirSource, ContentLoader, HttpSource, OAuthCredentials, build_router,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

use super::site::Site;

pub struct ServeOptions {
    pub path: PathBuf,
    pub root: Option<PathBuf>,
    pub port: u16,
    pub origin: Option<String>,
    pub watch: bool,
}

/// Serve the site locally.
///
/// This command:
/// - Validates and loads site.toml
/// - Renders /prensa/ and /prensa/detalle/ per request, with crawler metadata in front
/// - Serves static files from `static/` (or a built `--root`)
/// - Handles /auth and /callback for the CMS login
/// - With `--watch`, reloads open pages when site files change
pub async fn run(options: ServeOptions) -> Result<()> {
    println!("🌐 Starting press server...");
    println!("   Site: {}", options.path.display());

    let site = Site::load(&options.path)?;
    let served = prepare_app(site, options.root.as_deref(), options.origin)?;

    println!("   ✓ Loaded: {}", served.state.config.site.name);
    println!("   ✓ Static files: {}", served.static_root.display());
    println!(
        "   ✓ Feed: {} (fallback {})",
        served.asset_feed.display(),
        served.feed_url
    );

    let mut state = served.state;
    let static_root = served.static_root;

    if options.watch {
        let (reload_tx, _) = broadcast::channel::<()>(100);
        state = state.with_reload(reload_tx.clone());

        let mut watched = vec![options.path.clone()];
        if let Some(root) = &options.root {
            watched.push(root.clone());
        }
        tokio::spawn(async move {
            if let Err(e) = watch_files(watched, reload_tx).await {
                tracing::error!(error = %e, "file watcher stopped");
            }
        });
        println!("   ✓ Watching for changes (site.toml edits need a restart)");
    }

    let app = build_router(state, Some(static_root));

    let addr = SocketAddr::from(([127, 0, 0, 1], options.port));
    println!("\n🚀 Serving at: http://localhost:{}/prensa/", options.port);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

/// Everything the server needs for one site, before any reload wiring.
struct ServedSite {
    state: AppState,
    static_root: PathBuf,
    asset_feed: PathBuf,
    feed_url: String,
}

/// With `root`, a `press-kit build` output is served and its normalized
/// feed is read; otherwise the site's own `static/` tree and feed.
fn prepare_app(site: Site, root: Option<&Path>, origin: Option<String>) -> Result<ServedSite> {
    let static_root = root.map(Path::to_path_buf).unwrap_or_else(|| site.static_dir());
    let asset_feed = match root {
        Some(root) => root.join(&site.config.content.feed_file),
        None => site.feed_path(),
    };
    let config = site.config;

    let origin = origin.unwrap_or_else(|| config.site.canonical_domain.clone());
    let feed_url = format!(
        "{}{}",
        origin.trim_end_matches('/'),
        config.content.feed_path
    );

    let http = reqwest::Client::new();
    let loader = ContentLoader::new()
        .with_source(AssetDirSource::new(asset_feed.clone()))
        .with_source(HttpSource::new(http.clone(), feed_url.clone()));
    let credentials = OAuthCredentials::from_env(&config.oauth.provider);

    let state = AppState::new(config, loader, credentials, http)
        .context("Invalid metadata.bot_user_agents")?;

    Ok(ServedSite {
        state,
        static_root,
        asset_feed,
        feed_url,
    })
}

/// Watch for file changes and trigger reload
async fn watch_files(paths: Vec<PathBuf>, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    for path in &paths {
        watcher.watch(path, RecursiveMode::Recursive)?;
    }

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                // Filter out temporary files and hidden files
                if event.paths.iter().any(|p| {
                    let filename = p.file_name().unwrap_or_default().to_string_lossy();
                    !filename.starts_with('.') && !filename.ends_with('~')
                }) {
                    println!("   📝 File changed, reloading...");
                    let _ = reload_tx.send(());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal, stopping server");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build;
    use crate::commands::site::fixtures::site_with_feed;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_built_output_answers_detail_and_filter_urls() {
        let site = site_with_feed(
            r#"{"items":[
                {"titulo":"Presentación del Proyecto","fecha":"2024-06-01","cuerpo":"Texto"},
                {"titulo":"Recorrida","fecha":"2024-01-01"}
            ]}"#,
        );
        let out = TempDir::new().unwrap();
        build::run(site.path().to_path_buf(), out.path().to_path_buf())
            .await
            .unwrap();

        // Only the built feed can answer from here on.
        fs::remove_file(site.path().join("content/prensa.json")).unwrap();

        let served = prepare_app(
            Site::load(site.path()).unwrap(),
            Some(out.path()),
            Some("http://127.0.0.1:9".to_string()),
        )
        .unwrap();
        assert_eq!(served.asset_feed, out.path().join("content/prensa.json"));
        let app = build_router(served.state, Some(served.static_root));

        let (status, html) = get(
            app.clone(),
            "/prensa/?id=2024-06-01-presentacion-del-proyecto",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("prensa-detail__title"));
        assert!(html.contains("Presentación del Proyecto"));

        let (_, html) = get(app.clone(), "/prensa/?q=recorrida").await;
        assert!(html.contains("/prensa/?id=2024-01-01-recorrida"));
        assert!(!html.contains("/prensa/?id=2024-06-01-presentacion-del-proyecto"));

        let (status, _) = get(app, "/assets/css/prensa.css").await;
        assert_eq!(status, StatusCode::OK);
    }
}
