//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the preview handler
//! - Wire up middleware (timeout, request ID, tracing)
//! - Bind server to listener and serve until shutdown
//! - Swap in rebuilt site snapshots delivered by the watcher or SIGHUP
//! - Dispatch requests to the controllers

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::controllers::{default_controllers, dispatch, Controller, ControllerContext};
use crate::http::request::{preview_request, request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::response::PreviewResponse;
use crate::model::ShapeRegistry;
use crate::render::{Renderer, TeraRenderer};
use crate::site::{Site, SiteHandle};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<SiteHandle>,
    pub shapes: Arc<ShapeRegistry>,
    pub renderer: Arc<dyn Renderer>,
    pub controllers: Arc<Vec<Box<dyn Controller>>>,
}

/// HTTP server for the preview.
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server over `site` with the Tera renderer.
    pub fn new(config: ServerConfig, site: Arc<SiteHandle>) -> Self {
        let state = AppState {
            site,
            shapes: Arc::new(ShapeRegistry::default()),
            renderer: Arc::new(TeraRenderer::new()),
            controllers: Arc::new(default_controllers()),
        };
        Self { config, state }
    }

    /// Replace the renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.state.renderer = renderer;
        self
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let request_id_header = HeaderName::from_static(X_REQUEST_ID);
        Router::new()
            .route("/{*path}", any(preview_handler))
            .route("/", any(preview_handler))
            .with_state(self.state.clone())
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id_header.clone(), UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id(request),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::new(request_id_header))
                    .layer(TimeoutLayer::new(Duration::from_secs(self.config.timeouts.request_secs))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Rebuilt snapshots arriving on `reloads` are swapped in; the server
    /// stops gracefully once `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut reloads: mpsc::UnboundedReceiver<Site>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.state.site.root().display(),
            "HTTP server starting"
        );

        let handle = self.state.site.clone();
        let reloader = tokio::spawn(async move {
            while let Some(site) = reloads.recv().await {
                tracing::info!(templates = site.templates().len(), "Swapping in reloaded site");
                handle.replace(site);
            }
        });

        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Single entry point: classify the request and hand it to the controllers.
async fn preview_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let Some(preview) = preview_request(request.method(), request.uri()) else {
        tracing::debug!(
            request_id = %request_id(&request),
            method = %request.method(),
            "Method not allowed"
        );
        return PreviewResponse::MethodNotAllowed.into_response();
    };

    // template loading and model reads are blocking file I/O
    let path = preview.path.clone();
    let handled = tokio::task::spawn_blocking(move || {
        let site = state.site.snapshot();
        let ctx = ControllerContext {
            site: &site,
            shapes: &state.shapes,
            renderer: state.renderer.as_ref(),
        };
        dispatch(&state.controllers, &ctx, &preview)
    })
    .await;

    match handled {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Request handling task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SiteConfig;
    use axum::http::{header, Method};
    use std::fs;
    use tower::ServiceExt;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("src/main/resources/templates/pages");
        let mock = dir.path().join("src/test/resources/templates/pages");
        fs::create_dir_all(&templates).unwrap();
        fs::create_dir_all(&mock).unwrap();
        fs::write(templates.join("hello.html"), "<p>{{ greeting }}</p>").unwrap();
        fs::write(mock.join("hello.json"), r#"{ "model": { "greeting": "Hi" } }"#).unwrap();
        dir
    }

    fn server(dir: &tempfile::TempDir) -> HttpServer {
        let site = Site::from_config(dir.path(), SiteConfig::default());
        HttpServer::new(ServerConfig::default(), Arc::new(SiteHandle::new(site)))
    }

    async fn call(server: &HttpServer, method: Method, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        server.router().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_renders_page_with_request_id() {
        let dir = project();
        let server = server(&dir);
        let response = call(&server, Method::GET, "/hello").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(X_REQUEST_ID));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<p>Hi</p>");
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let dir = project();
        let response = call(&server(&dir), Method::DELETE, "/hello").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(header::ALLOW));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let dir = project();
        let response = call(&server(&dir), Method::GET, "/nothing/here").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generated_index() {
        let dir = project();
        let response = call(&server(&dir), Method::GET, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("href=\"&#x2F;hello\""));
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render(&self, _site: &Site, template: &str, _model: &crate::model::Model) -> Result<String, crate::render::RenderError> {
            Err(crate::render::RenderError::Render {
                template: template.to_string(),
                message: "boom".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_render_failure_page() {
        let dir = project();
        let server = server(&dir).with_renderer(Arc::new(FailingRenderer));
        let response = call(&server, Method::GET, "/hello").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("boom"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_requests_on_blocking_pool() {
        let dir = project();
        let router = server(&dir).router();
        let calls: Vec<_> = (0..8)
            .map(|_| {
                let router = router.clone();
                tokio::spawn(async move {
                    let request = Request::builder().uri("/hello").body(Body::empty()).unwrap();
                    router.oneshot(request).await.unwrap().status()
                })
            })
            .collect();
        for call in calls {
            assert_eq!(call.await.unwrap(), StatusCode::OK);
        }
    }
}
