//! Bot-aware metadata responder.
//!
//! Each request walks `PassThrough`, or `LookupItem` then either
//! `RespondMetadata` or back to `PassThrough`, depending on the user agent,
//! the query string, the feed and the configured not-found policy.

use crate::bots::BotMatcher;
use crate::state::AppState;
use axum::extract::{Query, Request, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, USER_AGENT, VARY};
use axum::http::{HeaderMap, HeaderValue, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use press_kit_core::{NotFoundPolicy, ResolvedItem, SiteConfig, prepare};
use press_kit_generator::detail::find_item;
use press_kit_generator::{SocialMetadata, render_metadata_document};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct TargetQuery {
    id: Option<String>,
    slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponderState {
    PassThrough,
    LookupItem { key: String },
    RespondMetadata(SocialMetadata),
}

/// The requested item key: `id`, else `slug`. Blank values count as absent.
pub fn requested_key(uri: &Uri) -> Option<String> {
    let query = Query::<TargetQuery>::try_from_uri(uri).ok()?.0;
    [query.id, query.slug]
        .into_iter()
        .flatten()
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

/// First transition: only a crawler asking for a specific item is handled.
pub fn trigger(bots: &BotMatcher, user_agent: Option<&str>, uri: &Uri) -> ResponderState {
    let Some(user_agent) = user_agent.filter(|ua| bots.is_bot(ua)) else {
        return ResponderState::PassThrough;
    };
    match requested_key(uri) {
        Some(key) => {
            tracing::debug!(user_agent, key = %key, "crawler request for press item");
            ResponderState::LookupItem { key }
        }
        None => ResponderState::PassThrough,
    }
}

/// Second transition: match the key the way the detail page does, resolved
/// id first, then an explicit slug.
pub fn resolve_lookup(items: &[ResolvedItem], key: &str, config: &SiteConfig) -> ResponderState {
    match find_item(items, key) {
        Some(found) => {
            ResponderState::RespondMetadata(SocialMetadata::for_item(&found.item, key, config))
        }
        None => match config.metadata.not_found {
            NotFoundPolicy::PassThrough => ResponderState::PassThrough,
            NotFoundPolicy::DefaultMetadata => {
                ResponderState::RespondMetadata(SocialMetadata::defaults(key, config))
            }
        },
    }
}

pub fn metadata_response(meta: &SocialMetadata, config: &SiteConfig) -> Response {
    let debug = config.metadata.debug_headers;
    let body = render_metadata_document(meta, config, debug);

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    if let Ok(value) = HeaderValue::from_str(&format!(
        "public, max-age={}",
        config.metadata.cache_max_age
    )) {
        headers.insert(CACHE_CONTROL, value);
    }
    headers.insert(VARY, HeaderValue::from_static("User-Agent"));

    if debug {
        headers.insert("x-og-function", HeaderValue::from_static("hit"));
        headers.insert(
            "x-og-found",
            HeaderValue::from_static(if meta.found { "true" } else { "false" }),
        );
        // Non-visible-ASCII values cannot be header values; skip them.
        if let Ok(value) = HeaderValue::from_str(&meta.id) {
            headers.insert("x-og-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&meta.image_url) {
            headers.insert("x-og-image", value);
        }
    }

    (headers, body).into_response()
}

/// Middleware in front of the press routes.
pub async fn bot_metadata(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok());

    let ResponderState::LookupItem { key } = trigger(&state.bots, user_agent, req.uri()) else {
        return next.run(req).await;
    };

    let items = match state.loader.load_items().await {
        Ok(items) => prepare(items),
        Err(e) => {
            tracing::warn!(error = %e, key = %key, "feed unavailable for crawler, treating as not found");
            Vec::new()
        }
    };

    match resolve_lookup(&items, &key, &state.config) {
        ResponderState::RespondMetadata(meta) => {
            tracing::info!(key = %key, found = meta.found, "serving link preview metadata");
            metadata_response(&meta, &state.config)
        }
        _ => next.run(req).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use press_kit_core::{PressItem, RawPressItem};
    use press_kit_core::config::{DEFAULT_BOT_USER_AGENTS, parse_site_toml_str};

    const BOT: &str = "facebookexternalhit/1.1";

    fn config(not_found: &str) -> SiteConfig {
        parse_site_toml_str(&format!(
            r#"
[site]
name = "Cecilia Gortari"
canonical_domain = "https://www.ceciliagortari.com.ar"

[metadata]
not_found = "{}"
"#,
            not_found
        ))
        .unwrap()
    }

    fn bots() -> BotMatcher {
        BotMatcher::new(DEFAULT_BOT_USER_AGENTS).unwrap()
    }

    fn items() -> Vec<ResolvedItem> {
        let raw: Vec<RawPressItem> = serde_json::from_str(
            r#"[{"id":"a","slug":"viejo-a","titulo":"A"},{"titulo":"Sin id","fecha":"2024-01-01"}]"#,
        )
        .unwrap();
        prepare(raw.into_iter().map(PressItem::from).collect())
    }

    #[test]
    fn test_requested_key_prefers_id_then_slug() {
        let uri: Uri = "/prensa/?id=a&slug=b".parse().unwrap();
        assert_eq!(requested_key(&uri).as_deref(), Some("a"));
        let uri: Uri = "/prensa/detalle/?slug=b".parse().unwrap();
        assert_eq!(requested_key(&uri).as_deref(), Some("b"));
        let uri: Uri = "/prensa/?id=%20&slug=".parse().unwrap();
        assert_eq!(requested_key(&uri), None);
        let uri: Uri = "/prensa/?id=a%20b".parse().unwrap();
        assert_eq!(requested_key(&uri).as_deref(), Some("a b"));
    }

    #[test]
    fn test_trigger_needs_bot_and_key() {
        let with_id: Uri = "/prensa/?id=a".parse().unwrap();
        let without_id: Uri = "/prensa/".parse().unwrap();

        assert_eq!(
            trigger(&bots(), Some(BOT), &with_id),
            ResponderState::LookupItem { key: "a".into() }
        );
        assert_eq!(trigger(&bots(), Some(BOT), &without_id), ResponderState::PassThrough);
        assert_eq!(
            trigger(&bots(), Some("Mozilla/5.0 Firefox/120.0"), &with_id),
            ResponderState::PassThrough
        );
        assert_eq!(trigger(&bots(), None, &with_id), ResponderState::PassThrough);
    }

    #[test]
    fn test_lookup_by_resolved_id_or_slug() {
        let config = config("default-metadata");
        let items = items();

        let ResponderState::RespondMetadata(meta) = resolve_lookup(&items, "viejo-a", &config) else {
            panic!("slug should resolve");
        };
        assert!(meta.found);
        assert_eq!(meta.title, "A | Cecilia Gortari");

        let ResponderState::RespondMetadata(meta) =
            resolve_lookup(&items, "2024-01-01-sin-id", &config)
        else {
            panic!("derived id should resolve");
        };
        assert!(meta.found);
        assert_eq!(meta.title, "Sin id | Cecilia Gortari");
        assert_eq!(meta.id, "2024-01-01-sin-id");
    }

    #[test]
    fn test_not_found_policies() {
        let items = items();
        assert_eq!(
            resolve_lookup(&items, "missing", &config("pass-through")),
            ResponderState::PassThrough
        );
        match resolve_lookup(&items, "missing", &config("default-metadata")) {
            ResponderState::RespondMetadata(meta) => {
                assert_eq!(meta.title, "Detalle de Prensa | Cecilia Gortari");
                assert_eq!(meta.description, "Detalle de la publicación.");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_metadata_response_headers() {
        let mut config = config("default-metadata");
        config.metadata.debug_headers = true;
        let meta = SocialMetadata::defaults("missing", &config);
        let response = metadata_response(&meta, &config);
        let headers = response.headers();

        assert_eq!(headers[CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(headers[CACHE_CONTROL], "public, max-age=300");
        assert_eq!(headers[VARY], "User-Agent");
        assert_eq!(headers["x-og-function"], "hit");
        assert_eq!(headers["x-og-found"], "false");
        assert_eq!(headers["x-og-id"], "missing");
    }

    #[test]
    fn test_debug_headers_off_by_default() {
        let config = config("default-metadata");
        let response = metadata_response(&SocialMetadata::defaults("x", &config), &config);
        assert!(response.headers().get("x-og-function").is_none());
    }
}
