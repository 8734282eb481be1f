//! Route handlers.
//!
//! Filesystem work runs on the blocking pool. Misses and rejected slugs become
//! 404 pages; anything else from the store becomes a 500 page. Error details
//! stay in the log, clients only see the category.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, warn};
use xydocs_core::{
    Document, DocumentStore, Error, SearchIndex, SearchResult, build_sitemap, outline,
};

use super::AppState;
use super::pages;
use crate::output::route;

const PUBLIC_ERROR_MESSAGE: &str = "The documentation could not be loaded.";

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

async fn run_blocking<T, F>(work: F) -> xydocs_core::Result<T>
where
    F: FnOnce() -> xydocs_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Other(format!("Blocking task failed: {e}")))?
}

async fn list_documents(state: &AppState) -> xydocs_core::Result<Vec<Document>> {
    let store = Arc::clone(&state.store);
    run_blocking(move || store.list_documents()).await
}

pub async fn landing(State(state): State<AppState>) -> Response {
    match list_documents(&state).await {
        Ok(documents) => Html(pages::landing_page(&state.config.site, &documents)).into_response(),
        Err(e) => server_error(&state, &e),
    }
}

pub async fn docs_root(State(state): State<AppState>, headers: HeaderMap) -> Response {
    document(state, String::new(), &headers).await
}

pub async fn docs_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    document(state, slug, &headers).await
}

async fn document(state: AppState, slug: String, headers: &HeaderMap) -> Response {
    let store = Arc::clone(&state.store);
    let lookup = slug.clone();
    let found = run_blocking(move || store.get_document(&lookup)).await;

    let document = match found {
        Ok(Some(document)) => document,
        Ok(None) => return not_found_for(&state, &route(&state.config.site.docs_prefix, &slug)),
        Err(Error::InvalidSlug(requested)) => {
            debug!("Rejected slug {requested:?}");
            return not_found_for(&state, &route(&state.config.site.docs_prefix, &slug));
        },
        Err(e) => return server_error(&state, &e),
    };

    let etag = format!("\"{}\"", document.checksum);
    let unchanged = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.split(',').any(|tag| tag.trim() == etag));
    if unchanged {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    let rendered = state.renderer.render(&document.content);
    let toc = outline(&document.content).unwrap_or_else(|e| {
        warn!("Outline unavailable for '{}': {e}", document.slug);
        Vec::new()
    });
    let page = pages::document_page(&state.config.site, &document, &rendered.html, &toc);

    ([(header::ETAG, etag)], Html(page)).into_response()
}

pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Json(Vec::<SearchResult>::new()).into_response();
    }

    let store = Arc::clone(&state.store);
    let config = Arc::clone(&state.config);
    let limit = params.limit.unwrap_or(config.search.limit);
    let results = run_blocking(move || {
        let documents = store.list_documents()?;
        let index = SearchIndex::build(&documents, &config.site.title, config.search.clone());
        Ok(index.search_with_limit(&query, limit))
    })
    .await;

    match results {
        Ok(results) => Json(results).into_response(),
        Err(e) => {
            error!("Search failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": PUBLIC_ERROR_MESSAGE, "category": e.category() })),
            )
                .into_response()
        },
    }
}

pub async fn sitemap(State(state): State<AppState>) -> Response {
    let config = Arc::clone(&state.config);
    let store = Arc::clone(&state.store);
    let xml = run_blocking(move || {
        let documents = store.list_documents()?;
        build_sitemap(&documents, &config.site.base_url, &config.site.docs_prefix)
    })
    .await;

    match xml {
        Ok(xml) => ([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml).into_response(),
        Err(e) => server_error(&state, &e),
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

pub async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    not_found_for(&state, uri.path())
}

fn not_found_for(state: &AppState, path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(pages::not_found_page(&state.config.site, path)),
    )
        .into_response()
}

fn server_error(state: &AppState, err: &Error) -> Response {
    error!("Request failed ({}): {err}", err.category());
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(pages::error_page(&state.config.site, PUBLIC_ERROR_MESSAGE)),
    )
        .into_response()
}
