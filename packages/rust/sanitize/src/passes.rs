//! Normalization passes over exported HTML text.
//!
//! Each pass is a function `&str -> String` applied in sequence. Private-use
//! characters go first, before anything that looks for tags. Paragraphs are
//! converted only after attributes are gone, and merged only after that.
//!
//! Removing text can splice its neighbours into new markup
//! (`<scr<link>ipt>`), so the stripping passes repeat until nothing changes
//! and the whole sequence repeats until its output is stable.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::pua::is_private_use;

/// Upper bound on full pipeline rounds.
const MAX_ROUNDS: usize = 8;

/// Run every pass over raw HTML text until the output is stable.
pub(crate) fn run_pipeline(html: &str) -> String {
    let mut current = run_round(html);

    for round in 1..MAX_ROUNDS {
        let next = run_round(&current);
        if next == current {
            return current;
        }
        debug!(round, "markup changed on re-run, normalizing again");
        current = next;
    }

    current
}

/// One pass over the whole sequence.
fn run_round(html: &str) -> String {
    let mut result = until_stable(html, strip_private_use);

    result = extract_body(&result);
    result = until_stable(&result, strip_elements);
    result = strip_attributes(&result);
    result = paragraphs_to_code(&result);
    result = merge_code_blocks(&result);

    result.trim().to_string()
}

/// Apply a shrinking pass until its output stops changing.
fn until_stable(html: &str, pass: fn(&str) -> String) -> String {
    let mut current = pass(html);
    loop {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

// ---------------------------------------------------------------------------
// Pass 1: Strip private-use-area characters
// ---------------------------------------------------------------------------

/// Drop numeric character references and literal characters that point into
/// a Unicode Private Use Area. Every other reference is kept verbatim.
fn strip_private_use(html: &str) -> String {
    static DEC_REF_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"&#([0-9]+);").expect("valid regex"));
    static HEX_REF_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"&#[xX]([0-9a-fA-F]+);").expect("valid regex"));

    let result = DEC_REF_RE.replace_all(html, |caps: &Captures| {
        drop_private_ref(&caps[0], caps[1].parse::<u32>().ok())
    });
    let result = HEX_REF_RE.replace_all(&result, |caps: &Captures| {
        drop_private_ref(&caps[0], u32::from_str_radix(&caps[1], 16).ok())
    });

    result.chars().filter(|&c| !is_private_use(c)).collect()
}

fn drop_private_ref(reference: &str, code_point: Option<u32>) -> String {
    match code_point.and_then(char::from_u32) {
        Some(c) if is_private_use(c) => String::new(),
        _ => reference.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Pass 2: Body extraction
// ---------------------------------------------------------------------------

/// Keep only the interior of `<body>` when the document has one.
fn extract_body(html: &str) -> String {
    static BODY_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<body\b[^>]*>(.*?)</body\s*>").expect("valid regex")
    });

    match BODY_RE.captures(html) {
        Some(caps) => caps[1].to_string(),
        None => html.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Pass 3: Strip style, script and link elements
// ---------------------------------------------------------------------------

/// Remove `<style>` and `<script>` elements with their content, and every
/// `<link>` tag. Unterminated style/script tags lose the tag itself.
fn strip_elements(html: &str) -> String {
    static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid regex")
    });
    static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex")
    });
    static STRAY_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)</?(?:style|script|link)\b[^>]*>").expect("valid regex")
    });

    let result = STYLE_RE.replace_all(html, "");
    let result = SCRIPT_RE.replace_all(&result, "");
    STRAY_RE.replace_all(&result, "").to_string()
}

// ---------------------------------------------------------------------------
// Pass 4: Strip presentational attributes
// ---------------------------------------------------------------------------

/// One attribute-list token: leading separators (group 1), then a
/// `name[=value]` pair (name in group 2), a stray quoted string or a single
/// stray character.
const ATTR_TOKEN: &str = r#"([\s/]*)(?:([^\s"'>/=]+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+))?|"[^"]*"|'[^']*'|[^\s/>])"#;

/// Remove `class`, `style`, `id` and `data-*` attributes from every tag.
///
/// Tags are matched whole (quoted values may contain `>`), so text content
/// that merely looks like `id="..."` is never touched. Attributes need no
/// whitespace between them (`class="x"title="y"`, `<div/class="x">`) and
/// stray tokens are kept as they are.
fn strip_attributes(html: &str) -> String {
    static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(&format!(
            r"<(?P<name>/?[A-Za-z][^\s/>]*)(?P<attrs>(?:{ATTR_TOKEN})*)(?P<tail>[\s/]*)>"
        ))
        .expect("valid regex")
    });
    static ATTR_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(ATTR_TOKEN).expect("valid regex"));

    let presentational = |token: &Captures| {
        token
            .get(2)
            .is_some_and(|name| is_presentational(name.as_str()))
    };

    TAG_RE
        .replace_all(html, |caps: &Captures| {
            let attrs = &caps["attrs"];
            if !ATTR_RE.captures_iter(attrs).any(|t| presentational(&t)) {
                return caps[0].to_string();
            }

            let mut tag = format!("<{}", &caps["name"]);
            let mut dropped = false;
            for token in ATTR_RE.captures_iter(attrs) {
                if presentational(&token) {
                    dropped = true;
                    continue;
                }
                // `class="x"title="y"` must not become `<divtitle="y">`
                if dropped && token[1].is_empty() {
                    tag.push(' ');
                }
                tag.push_str(&token[0]);
                dropped = false;
            }
            tag.push_str(&caps["tail"]);
            tag.push('>');
            tag
        })
        .to_string()
}

fn is_presentational(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    matches!(name.as_str(), "class" | "style" | "id")
        || (name.len() > "data-".len() && name.starts_with("data-"))
}

// ---------------------------------------------------------------------------
// Pass 5: Convert line-broken paragraphs into code blocks
// ---------------------------------------------------------------------------

/// Turn `<p>` elements made of manually broken lines into `<pre><code>`.
///
/// Paragraphs without a `<br>`, or holding a link or table markup, are kept.
fn paragraphs_to_code(html: &str) -> String {
    static PARA_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").expect("valid regex")
    });
    static BR_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<br\b[^>]*>").expect("valid regex"));
    static KEEP_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)<a\b|</?(?:table|caption|colgroup|col|thead|tbody|tfoot|tr|td|th)\b")
            .expect("valid regex")
    });

    PARA_RE
        .replace_all(html, |caps: &Captures| {
            let inner = &caps[1];
            if !BR_RE.is_match(inner) || KEEP_RE.is_match(inner) {
                return caps[0].to_string();
            }
            format!("<pre><code>{}</code></pre>", code_text(inner, &BR_RE))
        })
        .to_string()
}

/// Plain-text body of a converted paragraph.
fn code_text(inner: &str, br_re: &Regex) -> String {
    static SPAN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)</?span\b[^>]*>").expect("valid regex"));
    static WRAPPER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)</?(?:div|em|strong|u)\b[^>]*>").expect("valid regex")
    });

    let text = SPAN_RE.replace_all(inner, "");
    let text = br_re.replace_all(&text, "\n").replace("&nbsp;", " ");
    let text = WRAPPER_RE.replace_all(&text, "");

    text.trim().to_string()
}

// ---------------------------------------------------------------------------
// Pass 6: Merge adjacent code blocks
// ---------------------------------------------------------------------------

/// Collapse runs of `<pre><code>` blocks separated only by whitespace into a
/// single block, joining their contents with newlines.
fn merge_code_blocks(html: &str) -> String {
    static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?s)<pre><code>(.*?)</code></pre>").expect("valid regex")
    });

    let mut out = String::with_capacity(html.len());
    let mut pending: Option<String> = None;
    let mut last_end = 0;

    for caps in CODE_BLOCK_RE.captures_iter(html) {
        let Some(block) = caps.get(0) else { continue };
        let gap = &html[last_end..block.start()];

        match pending.as_mut() {
            Some(code) if gap.trim().is_empty() => {
                code.push('\n');
                code.push_str(&caps[1]);
            }
            _ => {
                if let Some(code) = pending.take() {
                    push_code_block(&mut out, &code);
                }
                out.push_str(gap);
                pending = Some(caps[1].to_string());
            }
        }

        last_end = block.end();
    }

    if let Some(code) = pending {
        push_code_block(&mut out, &code);
    }
    out.push_str(&html[last_end..]);

    out
}

fn push_code_block(out: &mut String, code: &str) {
    out.push_str("<pre><code>");
    out.push_str(code);
    out.push_str("</code></pre>");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
