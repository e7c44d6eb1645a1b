//! Read document HTML from disk.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use docviewer_shared::{DocViewerError, Result};

/// Served in place of a document that cannot be read.
pub const FALLBACK_HTML: &str = r#"<!doctype html><html><body><p style="font-family:Arial, sans-serif">Documento não encontrado ou erro ao carregar.</p></body></html>"#;

/// Path of a document file under the documents root.
pub fn document_path(docs_root: &Path, file: &str) -> PathBuf {
    docs_root.join(file)
}

/// Read a document, decoding it as UTF-8 (invalid sequences are replaced).
pub async fn read_document(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DocViewerError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read a document, returning [`FALLBACK_HTML`] on any failure.
#[instrument(skip(docs_root), fields(root = %docs_root.display()))]
pub async fn load_document(docs_root: &Path, file: &str) -> String {
    let path = document_path(docs_root, file);
    match read_document(&path).await {
        Ok(html) => {
            debug!(bytes = html.len(), "document loaded");
            html
        }
        Err(err) => {
            warn!(error = %err, "document unavailable, serving fallback");
            FALLBACK_HTML.to_string()
        }
    }
}
