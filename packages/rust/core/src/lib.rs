//! Document lookup, loading and page rendering for DocViewer.
//!
//! This crate ties the registry, the file loader and the sanitizer together
//! into the request flow: resolve the `doc` parameter, read the file (or a
//! fallback), sanitize it and embed it in the viewer page.

pub mod loader;
pub mod page;
pub mod resolver;
pub mod viewer;

pub use loader::{FALLBACK_HTML, load_document};
pub use page::{SiteOptions, doc_href, render_page};
pub use resolver::{DocParam, resolve_key};
pub use viewer::{ViewedDocument, Viewer};
