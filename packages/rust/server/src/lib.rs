//! HTTP surface for DocViewer.
//!
//! Routes:
//! - `GET /?doc=<key>`: the full viewer page
//! - `GET /fragment?doc=<key>`: only the sanitized document
//! - `GET /api/documents`: the registry as JSON, in tab order
//! - `GET /healthz`: liveness check

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::response::{Html, Json};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};
use url::form_urlencoded;

use docviewer_core::{DocParam, Viewer};
use docviewer_shared::{DocViewerError, Result};

/// Name of the query parameter selecting the document.
const DOC_PARAM: &str = "doc";

/// Shared handler state.
pub type AppState = Arc<Viewer>;

/// Build the application router.
pub fn build_router(viewer: AppState) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/fragment", get(fragment))
        .route("/api/documents", get(documents))
        .route("/healthz", get(healthz))
        .with_state(viewer)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(viewer: Viewer, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| DocViewerError::Network(format!("failed to bind {addr}: {e}")))?;
    let local = listener
        .local_addr()
        .map_err(|e| DocViewerError::Network(e.to_string()))?;

    info!(addr = %local, "serving documentation");

    axum::serve(listener, build_router(Arc::new(viewer)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DocViewerError::Network(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Extract every `doc` value from a raw query string.
///
/// Parsing is lenient: malformed escapes are decoded lossily, never rejected.
fn doc_param(query: Option<&str>) -> Option<DocParam> {
    let query = query?;
    DocParam::from_values(
        form_urlencoded::parse(query.as_bytes())
            .filter(|(name, _)| name == DOC_PARAM)
            .map(|(_, value)| value.into_owned()),
    )
}

#[instrument(skip(viewer))]
async fn page(State(viewer): State<AppState>, RawQuery(query): RawQuery) -> Html<String> {
    let param = doc_param(query.as_deref());
    Html(viewer.page(param.as_ref()).await)
}

#[instrument(skip(viewer))]
async fn fragment(State(viewer): State<AppState>, RawQuery(query): RawQuery) -> Html<String> {
    let param = doc_param(query.as_deref());
    Html(viewer.document(param.as_ref()).await.html)
}

/// Registry entry as exposed by `/api/documents`.
#[derive(Debug, Serialize)]
struct DocumentSummary {
    key: String,
    title: String,
    label: String,
    file: String,
    section: Vec<String>,
    default: bool,
}

async fn documents(State(viewer): State<AppState>) -> Json<Vec<DocumentSummary>> {
    let registry = viewer.registry();
    let summaries = registry
        .iter()
        .map(|(key, entry)| DocumentSummary {
            key: key.to_string(),
            title: entry.title.clone(),
            label: entry.sidebar_label().to_string(),
            file: entry.file.clone(),
            section: entry.section.clone(),
            default: key == registry.default_key(),
        })
        .collect();
    Json(summaries)
}

async fn healthz() -> &'static str {
    "ok"
}
