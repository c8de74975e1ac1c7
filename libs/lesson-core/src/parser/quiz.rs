//! `:::quiz` bodies.

use std::sync::LazyLock;

use regex::Regex;

use super::extract::{directives, strip_directives};
use super::text::collapse_blank_runs;
use crate::types::{QuizOption, QuizSpec};

static OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+\[([ xX])\]\s+(.+?)\s*$").expect("valid regex"));

pub(crate) fn parse_quiz(body: &str) -> QuizSpec {
    let explanation = directives(body)
        .into_iter()
        .find(|d| d.name == "explanation")
        .map(|d| d.body.trim().to_string());

    let prose = strip_directives(body);
    let mut options = Vec::new();
    let mut question = Vec::new();

    for line in prose.lines() {
        match OPTION.captures(line) {
            Some(caps) => options.push(QuizOption {
                id: option_id(options.len()),
                text: caps[2].to_string(),
                is_correct: !caps[1].trim().is_empty(),
            }),
            None => question.push(line),
        }
    }

    let multiple_choice = options.iter().filter(|o| o.is_correct).count() > 1;

    QuizSpec {
        question: collapse_blank_runs(&question.join("\n")),
        options,
        explanation,
        multiple_choice,
    }
}

/// `a`, `b`, ... `z`, then `option-27` onwards.
fn option_id(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'a' + i).to_string(),
        _ => format!("option-{}", index + 1),
    }
}
