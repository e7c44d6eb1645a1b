//! Full-page HTML rendering: sidebar, tabs and the sanitized document.
//!
//! The page is self-contained (inline stylesheet and sidebar script). All
//! interpolated text is escaped except the sanitized document, which is
//! embedded verbatim.

use url::form_urlencoded;

use docviewer_shared::{DocKey, DocumentEntry, DocumentRegistry, ViewerConfig};

const STYLESHEET: &str = include_str!("../assets/viewer.css");
const SIDEBAR_SCRIPT: &str = include_str!("../assets/sidebar.js");
const STORAGE_KEY_PLACEHOLDER: &str = "__STORAGE_KEY__";

/// Hint shown under the document title.
const DOC_HINT: &str = "Selecione outros documentos nas abas ou no menu lateral.";

/// Site-wide presentation settings.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub site_title: String,
    pub site_tagline: String,
    /// `localStorage` key for the sidebar's collapse state.
    pub storage_key: String,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for SiteOptions {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            site_title: config.site_title.clone(),
            site_tagline: config.site_tagline.clone(),
            storage_key: config.storage_key.clone(),
        }
    }
}

/// Render the complete viewer page for `current`.
pub fn render_page(
    registry: &DocumentRegistry,
    current: &DocKey,
    document_html: &str,
    site: &SiteOptions,
) -> String {
    let entry = registry.entry_or_default(current);
    let title = html_escape(&entry.title);
    let site_title = html_escape(&site.site_title);

    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · {site_title}</title>
<style>{css}</style>
</head>
<body>
<div class="layout">
<div class="sidebar-overlay" data-sidebar-close hidden></div>
<aside class="sidebar" id="sidebar">
<div class="sidebar-inner">
<div class="sidebar-head">
<div>
<a class="site-title" href="/">{site_title}</a>
<p class="site-tagline">{tagline}</p>
</div>
<button class="sidebar-close" type="button" data-sidebar-close aria-label="Fechar menu">&times;</button>
</div>
<nav class="sidebar-nav">{nav}</nav>
</div>
</aside>
<main class="content">
<header class="mobile-header">
<button class="menu-button" type="button" data-sidebar-open aria-label="Abrir menu" aria-controls="sidebar"><span></span><span></span><span></span></button>
<div>
<h1 class="mobile-title">{site_title}</h1>
<p class="mobile-subtitle">{title}</p>
</div>
</header>
<div class="content-inner">
<div class="breadcrumb">{breadcrumb}</div>
<h1 class="doc-title">{title}</h1>
<p class="doc-hint">{hint}</p>
<div class="tabs">{tabs}</div>
<section class="viewer">
<article class="prose">{document_html}</article>
</section>
</div>
</main>
</div>
<script>{js}</script>
</body>
</html>
"#,
        css = STYLESHEET,
        tagline = html_escape(&site.site_tagline),
        nav = render_nav(registry, current),
        breadcrumb = render_breadcrumb(entry),
        hint = DOC_HINT,
        tabs = render_tabs(registry, current),
        js = sidebar_script(&site.storage_key),
    )
}

// ---------------------------------------------------------------------------
// Sidebar
// ---------------------------------------------------------------------------

/// A node of the sidebar tree, built from entries' section paths.
#[derive(Debug, Default)]
struct NavSection<'a> {
    label: &'a str,
    id: String,
    docs: Vec<(&'a DocKey, &'a DocumentEntry)>,
    children: Vec<NavSection<'a>>,
}

/// Sections and documents appear in first-seen registry order; within a
/// section, entries with a `nav_order` come first, sorted by it.
fn build_nav_tree(registry: &DocumentRegistry) -> NavSection<'_> {
    let mut root = NavSection::default();

    for (key, entry) in registry.iter() {
        let mut node = &mut root;
        let mut slugs: Vec<String> = Vec::new();

        for (depth, label) in entry.section.iter().enumerate() {
            slugs.push(slugify(label));
            let pos = match node.children.iter().position(|c| c.label == label) {
                Some(pos) => pos,
                None => {
                    let id = registry
                        .section_id(&entry.section[..=depth])
                        .map(String::from)
                        .unwrap_or_else(|| slugs.join("-"));
                    node.children.push(NavSection {
                        label: label.as_str(),
                        id,
                        ..NavSection::default()
                    });
                    node.children.len() - 1
                }
            };
            node = &mut node.children[pos];
        }

        node.docs.push((key, entry));
    }

    sort_nav_docs(&mut root);
    root
}

fn sort_nav_docs(section: &mut NavSection<'_>) {
    // Stable, so unordered entries keep registry order.
    section
        .docs
        .sort_by_key(|(_, entry)| entry.nav_order.unwrap_or(u32::MAX));
    for child in &mut section.children {
        sort_nav_docs(child);
    }
}

fn render_nav(registry: &DocumentRegistry, current: &DocKey) -> String {
    let tree = build_nav_tree(registry);
    let mut out = String::new();
    render_nav_section(&mut out, &tree, current, 0);
    out
}

fn render_nav_section(out: &mut String, section: &NavSection<'_>, current: &DocKey, depth: usize) {
    if !section.docs.is_empty() {
        out.push_str(r#"<ul class="nav-links">"#);
        for (key, entry) in &section.docs {
            out.push_str(&format!(
                r#"<li><a href="{href}"{active}>{label}</a></li>"#,
                href = html_escape(&doc_href(key)),
                active = aria_current(*key == current),
                label = html_escape(entry.sidebar_label()),
            ));
        }
        out.push_str("</ul>");
    }

    for child in &section.children {
        out.push_str(&format!(
            r#"<details class="nav-depth-{depth}" data-collapse id="{id}" open><summary><span>{label}</span><span class="chevron">&rsaquo;</span></summary><div data-collapse-content>"#,
            id = html_escape(&child.id),
            label = html_escape(child.label),
        ));
        render_nav_section(out, child, current, depth + 1);
        out.push_str("</div></details>");
    }
}

// ---------------------------------------------------------------------------
// Breadcrumb and tabs
// ---------------------------------------------------------------------------

fn render_breadcrumb(entry: &DocumentEntry) -> String {
    let mut out = String::new();
    for label in &entry.section {
        out.push_str(&format!(
            r#"<span>{}</span><span class="sep">/</span>"#,
            html_escape(label)
        ));
    }
    out.push_str(&format!(
        r#"<span class="current">{}</span>"#,
        html_escape(entry.tab_label())
    ));
    out
}

fn render_tabs(registry: &DocumentRegistry, current: &DocKey) -> String {
    registry
        .iter()
        .map(|(key, entry)| {
            format!(
                r#"<a class="tab" href="{href}"{active}>{label}</a>"#,
                href = html_escape(&doc_href(key)),
                active = aria_current(key == current),
                label = html_escape(entry.tab_label()),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Link to a document: `/?doc=<key>`.
pub fn doc_href(key: &DocKey) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("doc", key.as_str())
        .finish();
    format!("/?{query}")
}

fn aria_current(active: bool) -> &'static str {
    if active { r#" aria-current="page""# } else { "" }
}

/// Sidebar script with the storage key injected as a JS string literal.
fn sidebar_script(storage_key: &str) -> String {
    let literal = serde_json::to_string(storage_key)
        .unwrap_or_else(|_| "\"docviewer-sidebar\"".to_string())
        .replace("</", "<\\/");
    SIDEBAR_SCRIPT.replace(STORAGE_KEY_PLACEHOLDER, &literal)
}

/// Lowercase ASCII slug: runs of other characters become a single `-`.
fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
