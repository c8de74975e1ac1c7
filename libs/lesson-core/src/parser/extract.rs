//! Block scanning.
//!
//! Blocks open with a line-initial `:::name` and close with a bare `:::`.
//! Bodies may contain sub-blocks using the same syntax, so closers are
//! matched against an explicit stack of open frames. Lines inside ```
//! fences are never treated as delimiters.

use std::ops::Range;

use crate::render::PLACEHOLDER_OPEN;
use crate::types::ComponentKind;

/// A located block. `body` excludes the delimiter lines; `span` covers them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block<'a> {
    pub kind: ComponentKind,
    pub args: &'a str,
    pub body: &'a str,
    pub span: Range<usize>,
}

/// A top-level sub-block inside a block body, e.g. `:::hint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Directive<'a> {
    pub name: &'a str,
    pub args: &'a str,
    pub body: &'a str,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    pub text: &'a str,
    pub start: usize,
    /// Byte offset just past the line terminator.
    pub end: usize,
}

pub(crate) fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for raw in text.split_inclusive('\n') {
        let end = start + raw.len();
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        lines.push(Line {
            text: content,
            start,
            end,
        });
        start = end;
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter<'a> {
    Open { name: &'a str, args: &'a str },
    Close,
}

fn classify(line: &str) -> Option<Delimiter<'_>> {
    let rest = line.trim_start().strip_prefix(":::")?;
    if rest.trim().is_empty() {
        return Some(Delimiter::Close);
    }
    let name_len = rest
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphabetic() || *c == '-'))
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    Some(Delimiter::Open {
        name: &rest[..name_len],
        args: rest[name_len..].trim(),
    })
}

pub(crate) fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Advance fence tracking over `line`. Returns true when the line is a fence
/// delimiter or fenced content. Only a bare ```` ``` ```` closes a fence.
fn in_code(in_fence: &mut bool, line: &str) -> bool {
    if *in_fence {
        if line.trim() == "```" {
            *in_fence = false;
        }
        return true;
    }
    if is_fence(line) {
        *in_fence = true;
        return true;
    }
    false
}

/// An open block awaiting its closer.
#[derive(Debug, Clone, Copy)]
struct Frame<'a> {
    name: &'a str,
    line: usize,
}

/// Index of the line closing the block opened at `open_idx`, or the
/// innermost frame left open at end of input.
fn find_close<'a>(lines: &[Line<'a>], open_idx: usize) -> Result<usize, Frame<'a>> {
    let mut stack: Vec<Frame<'a>> = Vec::new();
    if let Some(Delimiter::Open { name, .. }) = classify(lines[open_idx].text) {
        stack.push(Frame {
            name,
            line: open_idx,
        });
    }
    let mut in_fence = false;

    for (idx, line) in lines.iter().enumerate().skip(open_idx + 1) {
        if in_code(&mut in_fence, line.text) {
            continue;
        }
        match classify(line.text) {
            Some(Delimiter::Open { name, .. }) => stack.push(Frame { name, line: idx }),
            Some(Delimiter::Close) => {
                stack.pop();
                if stack.is_empty() {
                    return Ok(idx);
                }
            }
            None => {}
        }
    }

    Err(stack.pop().unwrap_or(Frame {
        name: "",
        line: open_idx,
    }))
}

/// Walk `text` and collect every well-formed directive accepted by `wanted`,
/// skipping over the interior of matched ones. Unterminated openers are left
/// alone and scanning resumes on the following line.
fn scan<'a>(text: &'a str, wanted: impl Fn(&str) -> bool) -> Vec<Directive<'a>> {
    let lines = split_lines(text);
    let mut found = Vec::new();
    let mut in_fence = false;
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        if in_code(&mut in_fence, line.text) {
            idx += 1;
            continue;
        }

        if let Some(Delimiter::Open { name, args }) = classify(line.text) {
            if wanted(name) {
                match find_close(&lines, idx) {
                    Ok(close) => {
                        let body_start = line.end;
                        let body_end = lines[close].start.max(body_start);
                        found.push(Directive {
                            name,
                            args,
                            body: &text[body_start..body_end],
                            span: line.start..lines[close].end,
                        });
                        idx = close + 1;
                        continue;
                    }
                    Err(open) => tracing::debug!(
                        name,
                        line = idx + 1,
                        unclosed = open.name,
                        unclosed_line = open.line + 1,
                        "unterminated block left as text"
                    ),
                }
            }
        }
        idx += 1;
    }

    found
}

/// Find all well-formed blocks of `kind`, in document order.
pub(crate) fn find_blocks(text: &str, kind: ComponentKind) -> Vec<Block<'_>> {
    if kind == ComponentKind::ExecutableDemo {
        return find_demo_blocks(text);
    }
    scan(text, |name| ComponentKind::from_name(name) == Some(kind))
        .into_iter()
        .map(|d| Block {
            kind,
            args: d.args,
            body: d.body,
            span: d.span,
        })
        .collect()
}

/// Top-level sub-blocks of a block body, of any name.
pub(crate) fn directives(body: &str) -> Vec<Directive<'_>> {
    scan(body, |_| true)
}

/// Body text with every top-level sub-block removed.
pub(crate) fn strip_directives(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut cursor = 0;
    for directive in directives(body) {
        out.push_str(&body[cursor..directive.span.start]);
        cursor = directive.span.end;
    }
    out.push_str(&body[cursor..]);
    out
}

/// Whether `line` starts a region of its own: a component opener or a
/// placeholder left by an earlier extraction.
fn starts_region(line: &str) -> bool {
    if line.trim_start().starts_with(PLACEHOLDER_OPEN) {
        return true;
    }
    matches!(
        classify(line),
        Some(Delimiter::Open { name, .. }) if ComponentKind::from_name(name).is_some()
    )
}

/// Standalone ```` ```executable:<lang> ```` fences, each optionally followed
/// by one `:::hint` and one `:::solution` sub-block in either order. The
/// block body is the full spanned text; `args` is the language.
///
/// Fences between an unterminated nesting opener and the next component
/// opener belong to that broken block and stay text.
fn find_demo_blocks(text: &str) -> Vec<Block<'_>> {
    let lines = split_lines(text);
    let mut found = Vec::new();
    let mut in_fence = false;
    let mut in_broken_block = false;
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        let language = if in_fence {
            None
        } else {
            executable_language(line.text)
        };

        if language.is_none() || in_broken_block {
            if !in_code(&mut in_fence, line.text) && starts_region(line.text) {
                in_broken_block = match classify(line.text) {
                    Some(Delimiter::Open { name, .. }) => {
                        ComponentKind::from_name(name).is_some_and(|k| k.is_nesting())
                            && find_close(&lines, idx).is_err()
                    }
                    _ => false,
                };
            }
            idx += 1;
            continue;
        }

        let Some(close) = (idx + 1..lines.len()).find(|&j| lines[j].text.trim() == "```") else {
            tracing::debug!(line = idx + 1, "unterminated executable fence left as text");
            idx += 1;
            continue;
        };

        let mut end_idx = close;
        let mut seen_hint = false;
        let mut seen_solution = false;
        let mut next = close + 1;
        loop {
            let mut probe = next;
            while probe < lines.len() && lines[probe].text.trim().is_empty() {
                probe += 1;
            }
            if probe >= lines.len() {
                break;
            }
            let follows = match classify(lines[probe].text) {
                Some(Delimiter::Open { name: "hint", .. }) if !seen_hint => {
                    seen_hint = true;
                    true
                }
                Some(Delimiter::Open {
                    name: "solution", ..
                }) if !seen_solution => {
                    seen_solution = true;
                    true
                }
                _ => false,
            };
            if !follows {
                break;
            }
            match find_close(&lines, probe) {
                Ok(sub_close) => {
                    end_idx = sub_close;
                    next = sub_close + 1;
                }
                Err(_) => break,
            }
        }

        let span = line.start..lines[end_idx].end;
        found.push(Block {
            kind: ComponentKind::ExecutableDemo,
            args: language.unwrap_or_default(),
            body: &text[span.clone()],
            span,
        });
        idx = end_idx + 1;
    }

    found
}

/// Language of a ```` ```executable:<lang> ```` opening fence.
pub(crate) fn executable_language(line: &str) -> Option<&str> {
    let lang = line.trim().strip_prefix("```executable:")?.trim();
    (!lang.is_empty()).then_some(lang)
}
