//! Application configuration for DocViewer.
//!
//! User config lives at `~/.docviewer/docviewer.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocViewerError, Result};
use crate::registry::DEFAULT_DOC_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docviewer.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docviewer";

// ---------------------------------------------------------------------------
// Config structs (matching docviewer.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Viewer presentation and document lookup settings.
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// Registered documents. Empty means "use the built-in registry".
    #[serde(default)]
    pub documents: Vec<DocumentConfig>,

    /// Explicit sidebar section ids. Sections without one get a slug of
    /// their path.
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3000
}

/// `[viewer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Directory that document file paths are relative to.
    #[serde(default = "default_docs_root")]
    pub docs_root: String,

    /// Key served when the request names none (or an unknown one).
    #[serde(default = "default_doc")]
    pub default_doc: String,

    /// Site name shown in the sidebar and page title.
    #[serde(default = "default_site_title")]
    pub site_title: String,

    /// Line shown under the site name.
    #[serde(default = "default_site_tagline")]
    pub site_tagline: String,

    /// `localStorage` key for the sidebar's collapse state.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            docs_root: default_docs_root(),
            default_doc: default_doc(),
            site_title: default_site_title(),
            site_tagline: default_site_tagline(),
            storage_key: default_storage_key(),
        }
    }
}

fn default_docs_root() -> String {
    ".".into()
}
fn default_doc() -> String {
    DEFAULT_DOC_KEY.into()
}
fn default_site_title() -> String {
    "Nexus Docs".into()
}
fn default_site_tagline() -> String {
    "Documentação da Plataforma Nexus".into()
}
fn default_storage_key() -> String {
    "nexus-docs-sidebar".into()
}

/// `[[documents]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Registry key, used as the `doc` query parameter.
    pub key: String,
    /// Display title.
    pub title: String,
    /// HTML file, relative to `viewer.docs_root`.
    pub file: String,
    /// Sidebar label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Sidebar section path, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub section: Vec<String>,
    /// Position within its sidebar section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_order: Option<u32>,
}

/// `[[sections]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Section path, outermost first.
    pub path: Vec<String>,
    /// Element id of the section, also its key in the saved collapse state.
    pub id: String,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docviewer/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocViewerError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docviewer/docviewer.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocViewerError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocViewerError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocViewerError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocViewerError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocViewerError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
