//! Base markup renderer.
//!
//! Line-oriented and intentionally small: headings, emphasis, inline code,
//! links, quotes, list items, paragraphs and plain fenced code. Author text
//! is HTML-escaped; component placeholders expand to mount points for the
//! presentation layer.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::ComponentKind;

/// Placeholder delimiters. Private-use characters, stripped from the source
/// before parsing so authored text can never produce one.
pub(crate) const PLACEHOLDER_OPEN: char = '\u{E000}';
pub(crate) const PLACEHOLDER_CLOSE: char = '\u{E001}';

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[([^\]]+)\]\(([^)\s"]+)\)"#).expect("valid regex"));
static STRONG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
static EM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*\s][^*]*?)\*").expect("valid regex"));
static ORDERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)$").expect("valid regex"));

/// Render `text`; `components` maps placeholder ids to their kinds.
/// Placeholders with unknown ids render nothing.
pub fn render(text: &str, components: &HashMap<&str, ComponentKind>) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut fence: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some((lang, code)) = fence.as_mut() {
            if line.trim() == "```" {
                out.push(code_block(lang, code));
                fence = None;
            } else {
                code.push(line);
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(info) = trimmed.strip_prefix("```") {
            fence = Some((info.trim().to_string(), Vec::new()));
            continue;
        }
        if let Some(rendered) = placeholder(trimmed, components) {
            if !rendered.is_empty() {
                out.push(rendered);
            }
            continue;
        }
        out.push(render_line(trimmed));
    }

    // Unclosed fence: keep its lines as text.
    if let Some((lang, code)) = fence {
        out.push(format!("<p>```{}</p>", html_escape::encode_text(&lang)));
        out.extend(code.iter().filter(|l| !l.trim().is_empty()).map(|l| render_line(l.trim())));
    }

    out.join("\n")
}

fn placeholder(line: &str, components: &HashMap<&str, ComponentKind>) -> Option<String> {
    let id = line
        .strip_prefix(PLACEHOLDER_OPEN)?
        .strip_suffix(PLACEHOLDER_CLOSE)?;
    Some(match components.get(id) {
        Some(kind) => format!(
            r#"<div class="interactive-component" data-component-id="{}" data-component-kind="{}"></div>"#,
            html_escape::encode_double_quoted_attribute(id),
            kind
        ),
        None => String::new(),
    })
}

fn code_block(lang: &str, code: &[&str]) -> String {
    let body = html_escape::encode_text(&code.join("\n")).into_owned();
    if lang.is_empty() {
        format!("<pre><code>{}</code></pre>", body)
    } else {
        format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            html_escape::encode_double_quoted_attribute(lang),
            body
        )
    }
}

fn render_line(line: &str) -> String {
    if let Some(rest) = line.strip_prefix("### ") {
        format!("<h3>{}</h3>", inline(rest))
    } else if let Some(rest) = line.strip_prefix("## ") {
        format!("<h2>{}</h2>", inline(rest))
    } else if let Some(rest) = line.strip_prefix("# ") {
        format!("<h1>{}</h1>", inline(rest))
    } else if let Some(rest) = line.strip_prefix("> ") {
        format!("<blockquote>{}</blockquote>", inline(rest))
    } else if let Some(rest) = line.strip_prefix("- ") {
        format!("<ul><li>{}</li></ul>", inline(rest))
    } else if let Some(caps) = ORDERED.captures(line) {
        format!("<ol><li>{}</li></ol>", inline(&caps[1]))
    } else {
        format!("<p>{}</p>", inline(line))
    }
}

/// Inline markup. Text between backticks is code and left untouched.
fn inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let segments: Vec<&str> = text.split('`').collect();
    let closed = segments.len() % 2 == 1;

    for (idx, segment) in segments.iter().enumerate() {
        let is_code = idx % 2 == 1 && (closed || idx + 1 < segments.len());
        if is_code {
            out.push_str("<code>");
            out.push_str(&html_escape::encode_text(segment));
            out.push_str("</code>");
        } else {
            if idx % 2 == 1 {
                out.push('`');
            }
            out.push_str(&links(segment));
        }
    }
    out
}

/// Links are matched on raw text so the href can be attribute-encoded once.
/// Links with a scheme other than http, https or mailto stay plain text.
fn links(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut cursor = 0;

    for caps in LINK.captures_iter(raw) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&emphasis(&raw[cursor..whole.start()]));
        let url = &caps[2];
        if is_safe_url(url) {
            out.push_str(&format!(
                r#"<a href="{}">{}</a>"#,
                html_escape::encode_double_quoted_attribute(url),
                emphasis(&caps[1])
            ));
        } else {
            out.push_str(&emphasis(whole.as_str()));
        }
        cursor = whole.end();
    }

    out.push_str(&emphasis(&raw[cursor..]));
    out
}

/// Relative and fragment URLs, plus an allowlist of schemes.
fn is_safe_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    match lower.find([':', '/', '?', '#']) {
        Some(idx) if lower[idx..].starts_with(':') => {
            matches!(&lower[..idx], "http" | "https" | "mailto")
        }
        _ => true,
    }
}

fn emphasis(raw: &str) -> String {
    let escaped = html_escape::encode_text(raw);
    let strong = STRONG.replace_all(&escaped, "<strong>$1</strong>");
    EM.replace_all(&strong, "<em>$1</em>").into_owned()
}
