//! HTTP server for the documentation site.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | landing page |
//! | `GET {prefix}` | root document |
//! | `GET {prefix}/{*slug}` | document page with `ETag` |
//! | `GET /api/search?q=` | JSON array of search results |
//! | `GET /sitemap.xml` | sitemaps.org `urlset` |
//! | `GET /health` | liveness JSON |

mod handlers;
mod pages;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use xydocs_core::{Config, DocumentStore, MarkdownRenderer};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<Config>,
    pub renderer: Arc<MarkdownRenderer>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let renderer = MarkdownRenderer::new(config.render_options());
        Self {
            store,
            config: Arc::new(config),
            renderer: Arc::new(renderer),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let prefix = format!("/{}", state.config.site.docs_prefix.trim_matches('/'));

    Router::new()
        .route("/", get(handlers::landing))
        .route(&prefix, get(handlers::docs_root))
        .route(&format!("{prefix}/{{*slug}}"), get(handlers::docs_page))
        .route("/api/search", get(handlers::search))
        .route("/sitemap.xml", get(handlers::sitemap))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        "Serving {} from {} on http://{}",
        state.config.site.title,
        state.config.content.root.display(),
        listener.local_addr()?
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C, shutdown must be forced: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, finishing in-flight requests");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use xydocs_core::FsDocumentStore;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "README.md", "---\n---\nWelcome");
        write(
            dir.path(),
            "guide/intro.md",
            "---\ntitle: Intro\ndescription: First steps\n---\n# Getting started\n\nSee [routing](../routing.md).\n\n## Install\n",
        );
        write(dir.path(), "routing.md", "# Routing\n\nDefine routes with app.get.");
        dir
    }

    fn app(root: &Path) -> Router {
        let mut config = Config::default();
        config.content.root = root.to_path_buf();
        config.site.base_url = "https://xypriss.dev".into();
        let store: Arc<dyn DocumentStore> = Arc::new(FsDocumentStore::new(root));
        build_router(AppState::new(config, store))
    }

    async fn get_request(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_document_page_renders_with_metadata() {
        let dir = fixture();
        let (status, headers, body) = get_request(app(dir.path()), "/docs/guide/intro").await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(header::ETAG).is_some());
        assert!(body.contains("<title>Intro | XyPriss</title>"));
        assert!(body.contains("content=\"First steps\""));
        assert!(body.contains("href=\"/docs/routing\""));
        assert!(body.contains("<a href=\"#install\">Install</a>"));
    }

    #[tokio::test]
    async fn test_root_document_and_case_insensitive_lookup() {
        let dir = fixture();
        let (status, _, body) = get_request(app(dir.path()), "/docs").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Welcome"));

        let (status, _, body) = get_request(app(dir.path()), "/docs/GUIDE/Intro").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Getting started"));
    }

    #[tokio::test]
    async fn test_unknown_and_traversal_slugs_are_404() {
        let dir = fixture();
        let (status, _, body) = get_request(app(dir.path()), "/docs/does/not/exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));

        let (status, _, _) = get_request(app(dir.path()), "/docs/..%2F..%2Fetc%2Fpasswd").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = get_request(app(dir.path()), "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_etag_revalidation() {
        let dir = fixture();
        let (_, headers, _) = get_request(app(dir.path()), "/docs/routing").await;
        let etag = headers.get(header::ETAG).unwrap().clone();

        let response = app(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/docs/routing")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_search_api() {
        let dir = fixture();
        let (status, _, body) = get_request(app(dir.path()), "/api/search?q=routing").await;
        assert_eq!(status, StatusCode::OK);
        let hits: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(hits[0]["slug"], "routing");
        assert!(hits[0]["score"].as_f64().unwrap() < 0.5);

        let (status, _, body) = get_request(app(dir.path()), "/api/search?q=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");

        let (_, _, body) = get_request(app(dir.path()), "/api/search").await;
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_sitemap_and_health() {
        let dir = fixture();
        let (status, headers, body) = get_request(app(dir.path()), "/sitemap.xml").await;
        assert_eq!(status, StatusCode::OK);
        assert!(
            headers[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("application/xml")
        );
        assert!(body.contains("<loc>https://xypriss.dev/docs/guide/intro</loc>"));

        let (status, _, body) = get_request(app(dir.path()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn test_landing_lists_documents() {
        let dir = fixture();
        let (status, _, body) = get_request(app(dir.path()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("href=\"/docs/guide/intro\""));
        assert!(body.contains(">Intro</a>"));
    }

    #[tokio::test]
    async fn test_missing_root_is_server_error() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("gone");
        let (status, _, body) = get_request(app(&root), "/docs/anything").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("The documentation could not be loaded."));
        assert!(!body.contains(root.to_str().unwrap()));

        let (status, _, body) = get_request(app(&root), "/api/search?q=routing").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(error["category"], "root_unavailable");
        assert!(!body.contains(root.to_str().unwrap()));
    }
}
