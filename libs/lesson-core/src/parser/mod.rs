//! Lesson parser.
//!
//! # Format
//! ````markdown
//! # Functions
//!
//! :::exercise
//! **Double it**
//! ```executable:javascript
//! function double(n) {}
//! ```
//! :::hint
//! Multiply by two.
//! :::
//! :::
//!
//! :::quiz
//! Which is a keyword?
//! - [x] let
//! - [ ] banana
//! :::
//! ````
//!
//! Every interactive block is replaced by a placeholder and described by an
//! [`InteractiveComponent`]; whatever remains is rendered as markup.

mod challenge;
mod demo;
mod drag_drop;
mod exercise;
mod extract;
mod fill_blank;
mod quiz;
mod text;

use crate::render::{render, PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};
use crate::types::{ComponentData, ComponentKind, InteractiveComponent, ParsedDocument};

use extract::Block;

/// Extraction order. Kinds whose bodies may hold sub-blocks go first so
/// their contents are never picked up as top-level blocks; standalone
/// demos go last so fences nested in exercises are already gone.
const EXTRACTION_ORDER: [ComponentKind; 6] = [
    ComponentKind::Exercise,
    ComponentKind::DragDrop,
    ComponentKind::Challenge,
    ComponentKind::Quiz,
    ComponentKind::FillBlank,
    ComponentKind::ExecutableDemo,
];

/// Monotonic component id source shared by all kinds within a parse.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next id: `component-1`, `component-2`, ...
    pub fn next_id(&mut self) -> String {
        self.next += 1;
        format!("component-{}", self.next)
    }
}

/// Parse a lesson with a fresh id generator.
pub fn parse(source: &str) -> ParsedDocument {
    parse_with(source, &mut IdGenerator::new())
}

/// Parse a lesson, minting component ids from `ids`.
pub fn parse_with(source: &str, ids: &mut IdGenerator) -> ParsedDocument {
    let mut text: String = source
        .chars()
        .filter(|c| *c != PLACEHOLDER_OPEN && *c != PLACEHOLDER_CLOSE)
        .collect();
    let mut components = Vec::new();

    for kind in EXTRACTION_ORDER {
        let blocks = extract::find_blocks(&text, kind);
        if blocks.is_empty() {
            continue;
        }

        let mut replacements = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let id = ids.next_id();
            components.push(InteractiveComponent {
                id: id.clone(),
                data: parse_block(block),
            });
            replacements.push((block.span.clone(), id));
        }
        drop(blocks);

        // Right to left so earlier spans stay valid.
        for (span, id) in replacements.into_iter().rev() {
            text.replace_range(span, &format!("{PLACEHOLDER_OPEN}{id}{PLACEHOLDER_CLOSE}\n"));
        }
    }

    let order = placeholder_order(&text);
    components.sort_by_key(|c| order.iter().position(|id| *id == c.id));

    let kinds = components.iter().map(|c| (c.id.as_str(), c.kind())).collect();
    let html = render(&text, &kinds);

    ParsedDocument { html, components }
}

fn parse_block(block: &Block<'_>) -> ComponentData {
    match block.kind {
        ComponentKind::Exercise => ComponentData::Exercise(exercise::parse_exercise(block.body)),
        ComponentKind::ExecutableDemo => {
            ComponentData::ExecutableDemo(demo::parse_demo(block.args, block.body))
        }
        ComponentKind::Quiz => ComponentData::Quiz(quiz::parse_quiz(block.body)),
        ComponentKind::FillBlank => {
            ComponentData::FillBlank(fill_blank::parse_fill_blank(block.args, block.body))
        }
        ComponentKind::DragDrop => ComponentData::DragDrop(drag_drop::parse_drag_drop(block.body)),
        ComponentKind::Challenge => {
            ComponentData::Challenge(challenge::parse_challenge(block.body))
        }
    }
}

/// Component ids in the order their placeholders appear.
fn placeholder_order(text: &str) -> Vec<&str> {
    let mut ids = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find(PLACEHOLDER_OPEN) {
        let after = &rest[open + PLACEHOLDER_OPEN.len_utf8()..];
        let Some(close) = after.find(PLACEHOLDER_CLOSE) else {
            break;
        };
        ids.push(&after[..close]);
        rest = &after[close + PLACEHOLDER_CLOSE.len_utf8()..];
    }
    ids
}
