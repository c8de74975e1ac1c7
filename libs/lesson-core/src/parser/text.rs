//! Small text helpers shared by the per-kind content parsers.

use std::sync::LazyLock;

use regex::Regex;

use super::extract::{is_fence, split_lines};

static STRONG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s{0,3}#{1,6}\s+(.+?)\s*#*\s*$").expect("valid regex"));

/// A fenced code region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fence<'a> {
    pub info: &'a str,
    pub code: &'a str,
    /// Byte range of the whole fence, delimiter lines included.
    pub start: usize,
    pub end: usize,
}

impl Fence<'_> {
    /// Language of an ```` ```executable:<lang> ```` fence.
    pub fn executable_language(&self) -> Option<&str> {
        self.info.strip_prefix("executable:").map(str::trim).filter(|l| !l.is_empty())
    }
}

/// All closed fences of `text`, in order.
pub(crate) fn fences(text: &str) -> Vec<Fence<'_>> {
    let lines = split_lines(text);
    let mut found = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        let open = lines[idx];
        if !is_fence(open.text) {
            idx += 1;
            continue;
        }
        let Some(close) = (idx + 1..lines.len()).find(|&j| lines[j].text.trim() == "```") else {
            break;
        };
        let code_start = open.end;
        let code_end = lines[close].start.max(code_start);
        found.push(Fence {
            info: open.text.trim().trim_start_matches('`').trim(),
            code: text[code_start..code_end].trim_end_matches(['\n', '\r']),
            start: open.start,
            end: lines[close].end,
        });
        idx = close + 1;
    }

    found
}

/// Code of the first fence in `body`, or the trimmed body when unfenced.
pub(crate) fn fenced_or_plain(body: &str) -> String {
    match fences(body).into_iter().next() {
        Some(fence) => fence.code.to_string(),
        None => body.trim().to_string(),
    }
}

/// Remove the first ```` ```executable:<lang> ```` fence from `text`,
/// returning `(code, language, remaining text)`.
pub(crate) fn take_executable(text: &str) -> Option<(String, String, String)> {
    let fence = fences(text)
        .into_iter()
        .find(|f| f.executable_language().is_some())?;
    let language = fence.executable_language()?.to_string();
    let mut rest = String::with_capacity(text.len());
    rest.push_str(&text[..fence.start]);
    rest.push_str(&text[fence.end..]);
    Some((fence.code.to_string(), language, rest))
}

/// Split prose into a title and the remaining description.
///
/// The title is the first `**strong**` run; failing that, the first
/// heading. A line left empty by removing the title is dropped.
pub(crate) fn split_title(prose: &str) -> (Option<String>, String) {
    let lines: Vec<&str> = prose.lines().collect();

    for (idx, line) in lines.iter().enumerate() {
        if let Some(caps) = STRONG.captures(line) {
            let title = caps[1].trim().to_string();
            let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
            let remainder = format!("{}{}", &line[..whole.start], &line[whole.end..]);
            return (Some(title), rejoin(&lines, idx, remainder.trim()));
        }
    }

    for (idx, line) in lines.iter().enumerate() {
        if let Some(caps) = HEADING.captures(line) {
            return (Some(caps[1].to_string()), rejoin(&lines, idx, ""));
        }
    }

    (None, prose.trim().to_string())
}

fn rejoin(lines: &[&str], replaced: usize, replacement: &str) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        if idx == replaced {
            if !replacement.is_empty() {
                out.push(replacement);
            }
        } else {
            out.push(line);
        }
    }
    collapse_blank_runs(&out.join("\n"))
}

/// Trim and squeeze runs of blank lines to a single blank line.
pub(crate) fn collapse_blank_runs(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.trim().lines() {
        let blank = line.trim().is_empty();
        if blank && out.last().is_some_and(|l| l.trim().is_empty()) {
            continue;
        }
        out.push(if blank { "" } else { line.trim_end() });
    }
    out.join("\n")
}
