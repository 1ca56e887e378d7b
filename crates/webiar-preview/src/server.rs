//! `PreviewServer` — Axum HTTP server for the live document.

use std::net::SocketAddr;

use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use axum::routing::get;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use webiar_core::HtmlDocument;

use crate::config::PreviewConfig;

/// Errors from starting the preview server.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// Binding the listener failed.
    #[error("failed to bind preview server: {0}")]
    Bind(#[from] std::io::Error),
}

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
struct AppState {
    document: watch::Receiver<HtmlDocument>,
}

/// The preview HTTP server.
pub struct PreviewServer {
    config: PreviewConfig,
    document: watch::Receiver<HtmlDocument>,
}

impl PreviewServer {
    /// Create a server that renders the document published on `document`.
    pub fn new(config: PreviewConfig, document: watch::Receiver<HtmlDocument>) -> Self {
        Self { config, document }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        let state = AppState {
            document: self.document.clone(),
        };

        Router::new()
            .route("/", get(render_document))
            .route("/revision", get(revision))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind and serve. Returns the bound address and the serve task.
    ///
    /// With `port = 0` the OS assigns a free port; read it from the
    /// returned address.
    pub async fn listen(&self) -> Result<(SocketAddr, JoinHandle<()>), PreviewError> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;
        info!(%addr, "preview server listening");

        let router = self.router();
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!(error = %e, "preview server exited");
            }
        });

        Ok((addr, handle))
    }
}

/// GET / — the current document, verbatim.
async fn render_document(State(state): State<AppState>) -> impl IntoResponse {
    let html = state.document.borrow().html().to_owned();
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(html),
    )
}

/// Revision response body.
#[derive(Serialize)]
struct RevisionResponse {
    revision: u64,
}

/// GET /revision — the current revision, for cheap change polling.
async fn revision(State(state): State<AppState>) -> Json<RevisionResponse> {
    let revision = state.document.borrow().revision();
    Json(RevisionResponse { revision })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn make_server() -> (watch::Sender<HtmlDocument>, PreviewServer) {
        let (tx, rx) = watch::channel(HtmlDocument::new());
        (tx, PreviewServer::new(PreviewConfig::default(), rx))
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = axum::body::to_bytes(resp.into_body(), 1_000_000)
            .await
            .unwrap()
            .to_vec();
        (status, headers, body)
    }

    #[tokio::test]
    async fn root_serves_current_html() {
        let (tx, server) = make_server();
        tx.send_modify(|doc| {
            let _ = doc.replace("<b>x</b>");
        });

        let (status, headers, body) = get(server.router(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<b>x</b>");
        assert_eq!(headers[header::CACHE_CONTROL.as_str()], "no-store");
        assert!(
            headers[header::CONTENT_TYPE.as_str()]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
    }

    #[tokio::test]
    async fn root_serves_empty_document_initially() {
        let (_tx, server) = make_server();
        let (status, _headers, body) = get(server.router(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn replacement_is_visible_on_next_request() {
        let (tx, server) = make_server();
        let router = server.router();

        let (_, _, body) = get(router.clone(), "/").await;
        assert!(body.is_empty());

        tx.send_modify(|doc| {
            let _ = doc.replace("<p>now</p>");
        });
        let (_, _, body) = get(router, "/").await;
        assert_eq!(body, b"<p>now</p>");
    }

    #[tokio::test]
    async fn html_is_served_unsanitized() {
        let (tx, server) = make_server();
        tx.send_modify(|doc| {
            let _ = doc.replace("<script>alert(1)</script>");
        });
        let (_, _, body) = get(server.router(), "/").await;
        assert_eq!(body, b"<script>alert(1)</script>");
    }

    #[tokio::test]
    async fn revision_endpoint_tracks_replacements() {
        let (tx, server) = make_server();
        let router = server.router();

        let (status, _, body) = get(router.clone(), "/revision").await;
        assert_eq!(status, StatusCode::OK);
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["revision"], 0);

        tx.send_modify(|doc| {
            let _ = doc.replace("<b>x</b>");
        });
        let (_, _, body) = get(router, "/revision").await;
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["revision"], 1);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (_tx, server) = make_server();
        let (status, _, _) = get(server.router(), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn listen_binds_an_ephemeral_port() {
        let (tx, server) = make_server();
        tx.send_modify(|doc| {
            let _ = doc.replace("<i>live</i>");
        });

        let (addr, handle) = server.listen().await.unwrap();
        assert_ne!(addr.port(), 0);

        let body = reqwest::get(format!("http://{addr}/"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "<i>live</i>");
        handle.abort();
    }
}
