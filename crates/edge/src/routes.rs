use crate::error::EdgeError;
use crate::oauth;
use crate::responder::bot_metadata;
use crate::state::AppState;
use axum::Router;
use axum::extract::{Query, State};
use axum::middleware::from_fn_with_state;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use press_kit_core::ResolvedItem;
use press_kit_generator::list::Filters;
use press_kit_generator::{detail_page, home_page, list_page, load_error_page};
use serde::Deserialize;
use std::convert::Infallible;
use std::path::PathBuf;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Debug, Default, Deserialize)]
pub struct PressQuery {
    id: Option<String>,
    slug: Option<String>,
    q: Option<String>,
    categoria: Option<String>,
}

impl PressQuery {
    fn key(&self) -> Option<&str> {
        [self.id.as_deref(), self.slug.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|key| !key.is_empty())
    }
}

/// Build the site router.
///
/// The press routes sit behind the crawler middleware. Anything else falls
/// through to `static_root` when one is given.
pub fn build_router(state: AppState, static_root: Option<PathBuf>) -> Router {
    let press = Router::new()
        .route("/prensa", get(prensa))
        .route("/prensa/", get(prensa))
        .route("/prensa/detalle", get(prensa_detalle))
        .route("/prensa/detalle/", get(prensa_detalle))
        .route_layer(from_fn_with_state(state.clone(), bot_metadata));

    let mut app = Router::new()
        .route("/", get(home))
        .merge(press)
        .route("/auth", get(oauth::auth))
        .route("/callback", get(oauth::callback));

    if let Some(reload_tx) = state.reload_tx.clone() {
        app = app.merge(
            Router::new()
                .route("/_reload", get(sse_handler))
                .with_state(reload_tx),
        );
    }

    if let Some(root) = static_root {
        app = app.fallback_service(ServeDir::new(root));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn load(state: &AppState) -> Option<Vec<ResolvedItem>> {
    match state.loader.load_resolved().await {
        Ok(items) => Some(items),
        Err(e) => {
            tracing::warn!(error = %e, "press feed unavailable");
            None
        }
    }
}

async fn home(State(state): State<AppState>) -> Html<String> {
    let items = load(&state).await.unwrap_or_default();
    Html(home_page(&state.config, &items, state.is_preview()))
}

/// `/prensa/`: the filtered list, or a single item when `id` is given.
async fn prensa(State(state): State<AppState>, Query(query): Query<PressQuery>) -> Response {
    let Some(items) = load(&state).await else {
        return Html(load_error_page(&state.config, state.is_preview())).into_response();
    };

    match query.key() {
        Some(key) => detail_response(&state, &items, Some(key)),
        None => {
            let filters = Filters::new(query.q.as_deref(), query.categoria.as_deref());
            Html(list_page(&state.config, &items, &filters, state.is_preview())).into_response()
        }
    }
}

/// `/prensa/detalle/?slug=...`: links shared before the list and detail merged.
async fn prensa_detalle(
    State(state): State<AppState>,
    Query(query): Query<PressQuery>,
) -> Response {
    let Some(items) = load(&state).await else {
        return Html(load_error_page(&state.config, state.is_preview())).into_response();
    };
    detail_response(&state, &items, query.key())
}

/// A missing item keeps the HTML not-found view but takes the
/// [`EdgeError::ItemNotFound`] status.
fn detail_response(state: &AppState, items: &[ResolvedItem], key: Option<&str>) -> Response {
    let page = detail_page(&state.config, items, key, state.is_preview());
    if page.not_found {
        let err = EdgeError::ItemNotFound(key.unwrap_or_default().to_string());
        tracing::info!(error = %err, "press detail not found");
        return (err.status(), Html(page.html)).into_response();
    }
    Html(page.html).into_response()
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(reload_tx): State<broadcast::Sender<()>>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let mut rx = reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(()) => yield Ok(Event::default().data("reload")),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
