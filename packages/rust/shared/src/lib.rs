//! Shared types, error model, and configuration for DocViewer.
//!
//! This crate is the foundation depended on by all other DocViewer crates.
//! It provides:
//! - [`DocViewerError`]: the unified error type
//! - Domain types ([`DocKey`], [`DocumentEntry`], [`DocumentRegistry`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod registry;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DocumentConfig, SectionConfig, ServerConfig, ViewerConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{DocViewerError, Result};
pub use registry::{DEFAULT_DOC_KEY, DocumentRegistry};
pub use types::{DocKey, DocumentEntry};
