//! Core domain types for the document viewer.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DocKey
// ---------------------------------------------------------------------------

/// Short identifier of a document in the registry (e.g. `helmet`, `awsS3`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocKey(String);

impl DocKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// DocumentEntry
// ---------------------------------------------------------------------------

/// A registered document: what to call it and where its HTML lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Display title (usually the source file the page documents).
    pub title: String,
    /// HTML file path, relative to the documents root.
    pub file: String,
    /// Short sidebar label. Falls back to `title` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Sidebar section path, outermost first (e.g. `["Backend", "Config"]`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub section: Vec<String>,
    /// Position within its sidebar section. Unordered entries follow the
    /// ordered ones, in registry order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_order: Option<u32>,
}

impl DocumentEntry {
    pub fn new(title: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file: file.into(),
            label: None,
            section: Vec::new(),
            nav_order: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_section<I, S>(mut self, section: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.section = section.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_nav_order(mut self, order: u32) -> Self {
        self.nav_order = Some(order);
        self
    }

    /// Label shown in the sidebar.
    pub fn sidebar_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.title)
    }

    /// Label shown on the tab strip: the last `/` segment of the title.
    pub fn tab_label(&self) -> &str {
        self.title.rsplit('/').next().unwrap_or(&self.title)
    }
}
