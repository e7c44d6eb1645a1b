//! The document registry: an ordered, read-only key → entry mapping.
//!
//! Built once at startup (from config or the built-in Nexus set) and shared
//! read-only for the lifetime of the process. Insertion order is tab order.

use std::collections::{HashMap, HashSet};

use crate::config::AppConfig;
use crate::error::{DocViewerError, Result};
use crate::types::{DocKey, DocumentEntry};

/// Key used when a request names no document, or an unknown one.
pub const DEFAULT_DOC_KEY: &str = "helmet";

/// Ordered mapping from [`DocKey`] to [`DocumentEntry`].
#[derive(Debug, Clone)]
pub struct DocumentRegistry {
    entries: Vec<(DocKey, DocumentEntry)>,
    index: HashMap<DocKey, usize>,
    default_key: DocKey,
    section_ids: HashMap<Vec<String>, String>,
}

impl DocumentRegistry {
    /// Build a registry, validating key uniqueness and the default key.
    pub fn new(
        entries: Vec<(DocKey, DocumentEntry)>,
        default_key: impl Into<DocKey>,
    ) -> Result<Self> {
        let default_key = default_key.into();

        if entries.is_empty() {
            return Err(DocViewerError::validation("document registry is empty"));
        }

        let mut index = HashMap::with_capacity(entries.len());
        for (pos, (key, entry)) in entries.iter().enumerate() {
            if key.as_str().trim().is_empty() {
                return Err(DocViewerError::validation(format!(
                    "document at position {pos} has an empty key"
                )));
            }
            if entry.file.trim().is_empty() {
                return Err(DocViewerError::validation(format!(
                    "document '{key}' has an empty file path"
                )));
            }
            if index.insert(key.clone(), pos).is_some() {
                return Err(DocViewerError::validation(format!(
                    "duplicate document key '{key}'"
                )));
            }
        }

        if !index.contains_key(&default_key) {
            return Err(DocViewerError::validation(format!(
                "default document '{default_key}' is not in the registry"
            )));
        }

        Ok(Self {
            entries,
            index,
            default_key,
            section_ids: HashMap::new(),
        })
    }

    /// Attach explicit sidebar section ids, keyed by section path.
    ///
    /// Ids must be non-empty and unique, and a path may only be named once.
    pub fn with_section_ids<I, P>(mut self, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, String)>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let mut seen = HashSet::new();
        for (path, id) in ids {
            let path: Vec<String> = path.into_iter().map(Into::into).collect();
            if id.trim().is_empty() {
                return Err(DocViewerError::validation(format!(
                    "section {path:?} has an empty id"
                )));
            }
            if !seen.insert(id.clone()) {
                return Err(DocViewerError::validation(format!(
                    "duplicate section id '{id}'"
                )));
            }
            if self.section_ids.insert(path.clone(), id).is_some() {
                return Err(DocViewerError::validation(format!(
                    "section {path:?} is given two ids"
                )));
            }
        }
        Ok(self)
    }

    /// Build the registry described by the config, or the built-in one when
    /// the config lists no documents.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let default_key = DocKey::new(config.viewer.default_doc.clone());

        let configured_ids = config
            .sections
            .iter()
            .map(|section| (section.path.clone(), section.id.clone()));

        if config.documents.is_empty() {
            let registry = Self::new(builtin_entries(), default_key)?;
            let registry = if config.sections.is_empty() {
                registry.with_section_ids(builtin_section_ids())?
            } else {
                registry.with_section_ids(configured_ids)?
            };
            tracing::debug!(count = registry.len(), "using built-in document registry");
            return Ok(registry);
        }

        let entries = config
            .documents
            .iter()
            .map(|doc| {
                let entry = DocumentEntry {
                    title: doc.title.clone(),
                    file: doc.file.clone(),
                    label: doc.label.clone(),
                    section: doc.section.clone(),
                    nav_order: doc.nav_order,
                };
                (DocKey::new(doc.key.clone()), entry)
            })
            .collect();

        let registry = Self::new(entries, default_key)?.with_section_ids(configured_ids)?;
        tracing::debug!(count = registry.len(), "loaded document registry from config");
        Ok(registry)
    }

    /// The built-in Nexus backend registry.
    pub fn builtin() -> Self {
        let entries = builtin_entries();
        let index = entries
            .iter()
            .enumerate()
            .map(|(pos, (key, _))| (key.clone(), pos))
            .collect();
        let section_ids = builtin_section_ids()
            .into_iter()
            .map(|(path, id)| (path.iter().map(|s| s.to_string()).collect(), id))
            .collect();
        Self {
            entries,
            index,
            default_key: DocKey::new(DEFAULT_DOC_KEY),
            section_ids,
        }
    }

    pub fn get(&self, key: &str) -> Option<&DocumentEntry> {
        self.index
            .get(&DocKey::from(key))
            .map(|&pos| &self.entries[pos].1)
    }

    /// Return the registry's own copy of `key`, if registered.
    pub fn key(&self, key: &str) -> Option<&DocKey> {
        self.index
            .get(&DocKey::from(key))
            .map(|&pos| &self.entries[pos].0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(&DocKey::from(key))
    }

    /// Explicit sidebar id for the section at `path`, if one was given.
    pub fn section_id(&self, path: &[String]) -> Option<&str> {
        self.section_ids.get(path).map(String::as_str)
    }

    pub fn default_key(&self) -> &DocKey {
        &self.default_key
    }

    /// Entry for `key`, or the default entry when `key` is unknown.
    pub fn entry_or_default(&self, key: &DocKey) -> &DocumentEntry {
        let pos = self
            .index
            .get(key)
            .or_else(|| self.index.get(&self.default_key))
            .copied()
            .unwrap_or(0);
        &self.entries[pos].1
    }

    /// Entries in insertion (tab) order.
    pub fn iter(&self) -> impl Iterator<Item = (&DocKey, &DocumentEntry)> {
        self.entries.iter().map(|(k, e)| (k, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Built-in entries
// ---------------------------------------------------------------------------

const PLATFORM: &str = "Plataforma Nexus";
const BACKEND: &str = "Backend";

fn builtin_entries() -> Vec<(DocKey, DocumentEntry)> {
    let config: &[&str] = &[PLATFORM, BACKEND, "Config"];
    let middleware: &[&str] = &[PLATFORM, BACKEND, "Middleware"];
    let action_voice: &[&str] = &[PLATFORM, BACKEND, "Integrations", "Action Voice"];
    let aws: &[&str] = &[PLATFORM, BACKEND, "Integrations", "AWS"];

    let doc = |key: &str, title: &str, file: &str, label: &str, section: &[&str], order: u32| {
        (
            DocKey::new(key),
            DocumentEntry::new(title, file)
                .with_label(label)
                .with_section(section.iter().copied())
                .with_nav_order(order),
        )
    };

    vec![
        doc(
            "helmet",
            "src/config/helmet.ts",
            "src/docs/backend/config/src_config_helmet.html",
            "Helmet",
            config,
            0,
        ),
        doc(
            "database",
            "src/config/database.ts",
            "src/docs/backend/config/src_config_database.html",
            "Database",
            config,
            1,
        ),
        doc(
            "adminRoutesTs",
            "src/config/admin-routes.ts",
            "src/docs/backend/config/src_config_admin_routes.ts.html",
            "Admin Routes",
            config,
            4,
        ),
        doc(
            "adminRoutes",
            "src/config/routes.ts",
            "src/docs/backend/config/src_config_routes.html",
            "Routes",
            config,
            3,
        ),
        doc(
            "env",
            "src/config/env.ts",
            "src/docs/backend/config/src_config_env.html",
            "Env",
            config,
            2,
        ),
        doc(
            "errorHandler",
            "Middleware/errorHandler.ts",
            "src/docs/backend/middleware/middleware_error_Handler.html",
            "Error Handler",
            middleware,
            1,
        ),
        doc(
            "roleMiddleware",
            "Middleware/roleMiddleware.ts",
            "src/docs/backend/middleware/middleware_role_Middleware.html",
            "Role Middleware",
            middleware,
            2,
        ),
        doc(
            "authMiddleware",
            "Middleware/authMiddleware.ts",
            "src/docs/backend/middleware/middleware_auth_Middleware.html",
            "Auth Middleware",
            middleware,
            0,
        ),
        doc(
            "actionVoice",
            "integrations/actionvoice",
            "src/docs/backend/integrations/action_voice/integrations_actionvoice_index.html",
            "ActionVoice",
            action_voice,
            0,
        ),
        doc(
            "awsPinpoint",
            "integrations/aws/pinpoint",
            "src/docs/backend/integrations/aws/pinpoint/integrations_aws_pinpoint_index.html",
            "AWS Pinpoint",
            aws,
            0,
        ),
        doc(
            "awsS3",
            "integrations/aws/s3",
            "src/docs/backend/integrations/aws/s3/integrations_aws_s3_index.html",
            "AWS S3",
            aws,
            1,
        ),
    ]
}

/// Section ids of the built-in sidebar, stable across releases so saved
/// collapse state keeps applying.
fn builtin_section_ids() -> Vec<(Vec<&'static str>, String)> {
    [
        (vec![PLATFORM], "platform"),
        (vec![PLATFORM, BACKEND], "backend"),
        (vec![PLATFORM, BACKEND, "Config"], "config"),
        (vec![PLATFORM, BACKEND, "Middleware"], "middleware"),
        (vec![PLATFORM, BACKEND, "Integrations"], "integrations"),
        (
            vec![PLATFORM, BACKEND, "Integrations", "Action Voice"],
            "integrations-actionvoice",
        ),
        (vec![PLATFORM, BACKEND, "Integrations", "AWS"], "integrations-aws"),
    ]
    .into_iter()
    .map(|(path, id)| (path, id.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentConfig;

    fn entry(file: &str) -> DocumentEntry {
        DocumentEntry::new(file, file)
    }

    #[test]
    fn builtin_registry_order_and_default() {
        let registry = DocumentRegistry::builtin();
        let keys: Vec<&str> = registry.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys.len(), 11);
        assert_eq!(keys[0], "helmet");
        assert_eq!(keys[10], "awsS3");
        assert_eq!(registry.default_key().as_str(), DEFAULT_DOC_KEY);
        assert!(registry.contains("roleMiddleware"));
    }

    #[test]
    fn builtin_registry_validates() {
        let registry = DocumentRegistry::new(builtin_entries(), DEFAULT_DOC_KEY)
            .expect("built-in entries are valid");
        assert_eq!(registry.len(), DocumentRegistry::builtin().len());
    }

    #[test]
    fn duplicate_keys_rejected() {
        let entries = vec![
            (DocKey::new("a"), entry("a.html")),
            (DocKey::new("a"), entry("b.html")),
        ];
        let err = DocumentRegistry::new(entries, "a").unwrap_err();
        assert!(err.to_string().contains("duplicate document key 'a'"));
    }

    #[test]
    fn unknown_default_rejected() {
        let entries = vec![(DocKey::new("a"), entry("a.html"))];
        let err = DocumentRegistry::new(entries, "missing").unwrap_err();
        assert!(err.to_string().contains("'missing'"));
    }

    #[test]
    fn empty_registry_rejected() {
        assert!(DocumentRegistry::new(Vec::new(), "a").is_err());
    }

    #[test]
    fn from_config_uses_listed_documents() {
        let mut config = AppConfig::default();
        config.viewer.default_doc = "intro".into();
        config.documents = vec![
            DocumentConfig {
                key: "intro".into(),
                title: "Introduction".into(),
                file: "docs/intro.html".into(),
                label: None,
                section: vec!["Guide".into()],
                nav_order: Some(1),
            },
            DocumentConfig {
                key: "api".into(),
                title: "API".into(),
                file: "docs/api.html".into(),
                label: Some("API Reference".into()),
                section: Vec::new(),
                nav_order: None,
            },
        ];

        let registry = DocumentRegistry::from_config(&config).expect("valid config");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.default_key().as_str(), "intro");
        assert_eq!(
            registry.get("api").map(DocumentEntry::sidebar_label),
            Some("API Reference")
        );
        assert_eq!(registry.get("intro").and_then(|e| e.nav_order), Some(1));
    }

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn builtin_sections_keep_stable_ids() {
        let registry = DocumentRegistry::builtin();
        assert_eq!(registry.section_id(&path(&[PLATFORM])), Some("platform"));
        assert_eq!(
            registry.section_id(&path(&[PLATFORM, BACKEND, "Config"])),
            Some("config")
        );
        assert_eq!(
            registry.section_id(&path(&[PLATFORM, BACKEND, "Integrations", "Action Voice"])),
            Some("integrations-actionvoice")
        );
        assert_eq!(registry.section_id(&path(&["Elsewhere"])), None);

        let from_config = DocumentRegistry::from_config(&AppConfig::default()).expect("defaults");
        assert_eq!(
            from_config.section_id(&path(&[PLATFORM, BACKEND, "Integrations", "AWS"])),
            Some("integrations-aws")
        );
    }

    #[test]
    fn from_config_reads_section_ids() {
        let config: AppConfig = toml::from_str(
            r#"
            [viewer]
            default_doc = "intro"

            [[documents]]
            key = "intro"
            title = "Introduction"
            file = "docs/intro.html"
            section = ["Guide"]

            [[sections]]
            path = ["Guide"]
            id = "guide-root"
            "#,
        )
        .expect("parse");

        let registry = DocumentRegistry::from_config(&config).expect("valid config");
        assert_eq!(registry.section_id(&path(&["Guide"])), Some("guide-root"));
    }

    #[test]
    fn duplicate_section_ids_rejected() {
        let registry = DocumentRegistry::new(vec![(DocKey::new("a"), entry("a.html"))], "a")
            .expect("valid registry");
        let err = registry
            .with_section_ids([
                (vec!["One"], "same".to_string()),
                (vec!["Two"], "same".to_string()),
            ])
            .unwrap_err();
        assert!(err.to_string().contains("duplicate section id 'same'"));
    }

    #[test]
    fn empty_section_id_rejected() {
        let registry = DocumentRegistry::new(vec![(DocKey::new("a"), entry("a.html"))], "a")
            .expect("valid registry");
        assert!(registry.with_section_ids([(vec!["One"], " ".to_string())]).is_err());
    }

    #[test]
    fn from_config_falls_back_to_builtin() {
        let registry = DocumentRegistry::from_config(&AppConfig::default()).expect("defaults");
        assert_eq!(registry.len(), 11);
    }

    #[test]
    fn entry_or_default_for_unknown_key() {
        let registry = DocumentRegistry::builtin();
        let entry = registry.entry_or_default(&DocKey::new("nope"));
        assert_eq!(entry.title, "src/config/helmet.ts");
    }
}
