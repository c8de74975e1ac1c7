//! `:::fill-blank` bodies.

use std::sync::LazyLock;

use regex::Regex;

use super::extract::{directives, strip_directives};
use crate::types::{Blank, FillBlankSpec};

static BLANK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\{([^{}]*)\}\*\*").expect("valid regex"));

/// `args` is the remainder of the opener line; `case-sensitive` there makes
/// every blank case-sensitive.
pub(crate) fn parse_fill_blank(args: &str, body: &str) -> FillBlankSpec {
    let case_sensitive = args.split_whitespace().any(|a| a == "case-sensitive");

    let explanation = directives(body)
        .into_iter()
        .find(|d| d.name == "explanation")
        .map(|d| d.body.trim().to_string());

    let content = strip_directives(body).trim_matches(['\n', '\r']).to_string();

    let blanks = BLANK
        .captures_iter(&content)
        .enumerate()
        .map(|(idx, caps)| Blank {
            id: format!("blank-{}", idx + 1),
            accepted_answers: caps[1]
                .split('|')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect(),
            case_sensitive,
        })
        .collect();

    FillBlankSpec {
        content,
        blanks,
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blanks_in_reading_order() {
        let body = "2 + 3 = **{5|five}**, and 5 * 2 = **{ 10 }**.\n";
        let spec = parse_fill_blank("", body);
        assert_eq!(spec.content, "2 + 3 = **{5|five}**, and 5 * 2 = **{ 10 }**.");
        assert_eq!(spec.blanks.len(), 2);
        assert_eq!(spec.blanks[0].id, "blank-1");
        assert_eq!(spec.blanks[0].accepted_answers, vec!["5", "five"]);
        assert_eq!(spec.blanks[1].accepted_answers, vec!["10"]);
        assert!(!spec.blanks[0].case_sensitive);
    }

    #[test]
    fn case_sensitive_flag_and_explanation() {
        let body = "The DOM method is **{getElementById}**.\n:::explanation\nCase matters in JS.\n:::\n";
        let spec = parse_fill_blank("case-sensitive", body);
        assert!(spec.blanks[0].case_sensitive);
        assert_eq!(spec.explanation.as_deref(), Some("Case matters in JS."));
        assert_eq!(spec.content, "The DOM method is **{getElementById}**.");
    }
}
