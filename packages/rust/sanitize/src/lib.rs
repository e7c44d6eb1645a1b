//! HTML normalization for exported documentation fragments.
//!
//! Turns loosely structured exported HTML into a constrained subset that is
//! embedded verbatim in the viewer page. The passes run in a fixed order:
//! 1. Drop Private Use Area characters and references
//! 2. Extract the `<body>` interior (if any)
//! 3. Drop `<style>`, `<script>` and `<link>` elements
//! 4. Drop `class`, `style`, `id` and `data-*` attributes
//! 5. Convert line-broken paragraphs into `<pre><code>` blocks
//! 6. Merge adjacent code blocks
//! 7. Trim
//!
//! The sequence is re-run until its output stops changing, which makes
//! [`sanitize`] idempotent.
//!
//! This is not a security sanitizer: event-handler attributes, `<iframe>`,
//! `javascript:` URLs and the like pass through. Only feed it trusted input.

mod passes;
mod pua;

use tracing::{debug, instrument};

pub use pua::{BMP_PRIVATE_USE, PLANE_15_PRIVATE_USE, PLANE_16_PRIVATE_USE, is_private_use};

/// Normalize raw exported HTML into the viewer's display subset.
///
/// Total over arbitrary text: malformed markup yields best-effort output.
#[instrument(skip(html), fields(input_len = html.len()))]
pub fn sanitize(html: &str) -> String {
    let output = passes::run_pipeline(html);
    debug!(output_len = output.len(), "sanitize complete");
    output
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};
    use std::fs;

    fn fixture_path(name: &str) -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    fn load_fixture(name: &str) -> String {
        fs::read_to_string(fixture_path(name))
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    /// Every element name and attribute name in `html`, parsed as a fragment.
    fn element_names_and_attrs(html: &str) -> (Vec<String>, Vec<String>) {
        let doc = Html::parse_fragment(html);
        let all = Selector::parse("*").unwrap();
        let mut names = Vec::new();
        let mut attrs = Vec::new();
        for el in doc.select(&all) {
            names.push(el.value().name().to_string());
            attrs.extend(el.value().attrs().map(|(name, _)| name.to_string()));
        }
        (names, attrs)
    }

    // --- Documented examples ---

    #[test]
    fn converts_and_merges_line_broken_paragraphs() {
        let out = sanitize("<p>line1<br>line2</p><p>line3<br>line4</p>");
        assert_eq!(out, "<pre><code>line1\nline2\nline3\nline4</code></pre>");
    }

    #[test]
    fn keeps_paragraph_with_anchor() {
        let input = r#"<p><a href="x">link</a><br>more</p>"#;
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn strips_presentational_attributes() {
        let out = sanitize(r#"<div class="foo" id="bar" data-x="1">text</div>"#);
        assert_eq!(out, "<div>text</div>");
    }

    #[test]
    fn fragment_without_body_passes_through() {
        let input = "<h2>Title</h2>\n<p>Plain paragraph.</p>";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("  \n\t "), "");
    }

    /// Output holds no forbidden element, attribute or private-use character.
    fn assert_display_subset(input: &str, out: &str) {
        let (names, attrs) = element_names_and_attrs(out);
        for forbidden in ["style", "script", "link"] {
            assert!(
                !names.iter().any(|n| n == forbidden),
                "<{forbidden}> survived in {out:?} (input {input:?})"
            );
        }
        for attr in &attrs {
            assert!(
                !matches!(attr.as_str(), "class" | "style" | "id") && !attr.starts_with("data-"),
                "attribute {attr} survived in {out:?} (input {input:?})"
            );
        }
        assert!(!out.chars().any(is_private_use), "private-use char in {out:?}");
    }

    const MALFORMED: &[&str] = &[
        "<p>unclosed<br>",
        "<body><p>a</p>",
        "<div class=\"unterminated>text",
        "</code></pre><pre><code>",
        "&#;&#x;&#xZZ;",
        "<<<>>>",
        "<scr&#xE000;ipt>alert(1)</scr&#xE000;ipt>",
        "<div cl\u{E000}ass=\"x\">t</div>",
        "<scr<link>ipt>alert(1)</scr<link>ipt>",
        "<sty<link>le>p{}</sty<link>le>text",
        "&&#xE000;#xE000;",
        "<div class=\"x\"title=\"y\">t</div>",
        "<div/class=\"x\">t</div>",
        "<p class=\"a\" \"b\">t</p>",
        "<div class=x'y>t</div>",
        "<p><scr<em>ipt>x<br>y</p>",
    ];

    #[test]
    fn malformed_markup_stays_in_display_subset() {
        for input in MALFORMED {
            let out = sanitize(input);
            assert_display_subset(input, &out);
            assert_eq!(sanitize(&out), out, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn removed_characters_cannot_rebuild_markup() {
        assert_eq!(sanitize("<scr&#xE000;ipt>alert(1)</scr&#xE000;ipt>"), "");
        assert_eq!(sanitize("<div cl\u{E000}ass=\"x\">t</div>"), "<div>t</div>");
        assert_eq!(sanitize("<scr<link>ipt>alert(1)</scr<link>ipt>"), "");
        assert_eq!(sanitize("&&#xE000;#xE000;"), "");
    }

    #[test]
    fn attributes_without_whitespace_are_stripped() {
        assert_eq!(sanitize(r#"<div class="x"title="y">t</div>"#), r#"<div title="y">t</div>"#);
        assert_eq!(sanitize(r#"<div/class="x">t</div>"#), "<div>t</div>");
        assert_eq!(sanitize(r#"<p class="a" "b">t</p>"#), r#"<p "b">t</p>"#);
    }

    // --- Fixture-based tests ---

    #[test]
    fn exported_fixture_is_normalized() {
        let out = sanitize(&load_fixture("html/exported_doc.html"));

        assert!(out.starts_with("<h1>"), "body interior only: {out}");
        assert!(!out.contains("dataLayer"));
        assert!(!out.contains("tracking"));
        assert!(!out.contains("Courier New"));

        // Two line-broken paragraphs collapse into a single code block
        assert_eq!(out.matches("<pre><code>").count(), 1);
        assert!(out.contains("<pre><code>import helmet from &quot;helmet&quot;;\n"));
        assert!(out.contains("  app.use(helmet());\n}</code></pre>"));

        // Paragraph with a link stays a paragraph
        assert!(out.contains(r#"<p><span>See also:</span><br><a href="?doc=env">env</a></p>"#));

        // Semantic attributes survive
        assert!(out.contains(r#"<td colspan="2">Header</td>"#));
        assert!(out.contains(r#"<a href="https://helmetjs.github.io/">helmet</a>"#));

        // Icon glyph references are gone
        assert!(!out.contains("&#xe873;"));
        assert!(!out.contains("&#57520;"));
        assert!(out.contains("<p><span></span>Icon glyphs"));
    }

    #[test]
    fn exported_fixture_has_no_forbidden_tags_or_attributes() {
        let out = sanitize(&load_fixture("html/exported_doc.html"));
        let (names, attrs) = element_names_and_attrs(&out);

        for forbidden in ["style", "script", "link"] {
            assert!(!names.iter().any(|n| n == forbidden), "found <{forbidden}>");
        }
        for attr in &attrs {
            assert!(
                !matches!(attr.as_str(), "class" | "style" | "id") && !attr.starts_with("data-"),
                "found attribute {attr}"
            );
        }
        assert!(attrs.iter().any(|a| a == "href"));
        assert!(attrs.iter().any(|a| a == "colspan"));
    }

    #[test]
    fn sanitize_is_idempotent() {
        let inputs = [
            load_fixture("html/exported_doc.html"),
            "<p>a<br>b</p>\n<p>c</p>\n<p>d<br>e</p>".to_string(),
            "<div data-k=\"v\"><p><span>x</span><br>y</p></div>".to_string(),
            "&&#xE000;#xE000;".to_string(),
            "<div cl\u{E000}ass=\"x\">t</div>".to_string(),
        ];
        for input in &inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn no_private_use_characters_survive() {
        let input = "<p>\u{E000}a\u{E8F0}b&#xF8FF;c\u{F0001}</p>";
        let out = sanitize(input);
        assert_eq!(out, "<p>abc</p>");
        assert!(!out.chars().any(is_private_use));
    }
}
