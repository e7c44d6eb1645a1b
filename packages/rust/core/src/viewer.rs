//! Request-level orchestration: resolve → load → sanitize → render.

use std::path::PathBuf;

use tracing::{info, instrument};

use docviewer_shared::{AppConfig, DocKey, DocumentEntry, DocumentRegistry, Result};

use crate::loader::load_document;
use crate::page::{SiteOptions, render_page};
use crate::resolver::{DocParam, resolve_key};

/// A document ready for embedding.
#[derive(Debug, Clone)]
pub struct ViewedDocument {
    /// Key the request resolved to.
    pub key: DocKey,
    /// Registry entry for `key`.
    pub entry: DocumentEntry,
    /// Sanitized HTML fragment.
    pub html: String,
}

/// Read-only viewer state shared by every request.
#[derive(Debug, Clone)]
pub struct Viewer {
    registry: DocumentRegistry,
    docs_root: PathBuf,
    site: SiteOptions,
}

impl Viewer {
    pub fn new(registry: DocumentRegistry, docs_root: impl Into<PathBuf>, site: SiteOptions) -> Self {
        Self {
            registry,
            docs_root: docs_root.into(),
            site,
        }
    }

    /// Build the viewer described by the application config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let registry = DocumentRegistry::from_config(config)?;
        let viewer = Self::new(
            registry,
            &config.viewer.docs_root,
            SiteOptions::from(&config.viewer),
        );
        info!(
            documents = viewer.registry.len(),
            docs_root = %viewer.docs_root.display(),
            default = %viewer.registry.default_key(),
            "viewer ready"
        );
        Ok(viewer)
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    pub fn docs_root(&self) -> &std::path::Path {
        &self.docs_root
    }

    pub fn site(&self) -> &SiteOptions {
        &self.site
    }

    /// Resolve the `doc` parameter to a registered key.
    pub fn resolve(&self, param: Option<&DocParam>) -> &DocKey {
        resolve_key(&self.registry, param)
    }

    /// Load and sanitize the document selected by `param`.
    #[instrument(skip(self))]
    pub async fn document(&self, param: Option<&DocParam>) -> ViewedDocument {
        let key = self.resolve(param).clone();
        let entry = self.registry.entry_or_default(&key).clone();
        let raw = load_document(&self.docs_root, &entry.file).await;
        let html = docviewer_sanitize::sanitize(&raw);

        ViewedDocument { key, entry, html }
    }

    /// Render the full viewer page for `param`.
    pub async fn page(&self, param: Option<&DocParam>) -> String {
        let doc = self.document(param).await;
        render_page(&self.registry, &doc.key, &doc.html, &self.site)
    }
}
