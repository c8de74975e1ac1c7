//! Reader for `:::test-cases` bodies.
//!
//! # Format
//! ```text
//! add(1, 2) -> 3
//! greet('Ann') -> 'Hello, Ann'
//! double(21)
//! ```
//! A line without `->` has its expected value computed from the reference
//! solution at grading time. Malformed lines are skipped.

use serde_json::Value;

use crate::literal::{parse_arguments, parse_literal};
use crate::types::{ExpectedOutput, FunctionCall, TestCase};

/// Parse every well-formed test-case line of `body`.
pub fn parse_test_cases(body: &str) -> Vec<TestCase> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//") && !line.starts_with('#'))
        .filter_map(|line| {
            let case = parse_line(line);
            if case.is_none() {
                tracing::debug!(line, "skipping malformed test case line");
            }
            case
        })
        .collect()
}

fn parse_line(line: &str) -> Option<TestCase> {
    let open = line.find('(')?;
    let function_name = line[..open].trim();
    if !is_function_name(function_name) {
        return None;
    }

    let close = matching_paren(line, open)?;
    let params = parse_arguments(&line[open + 1..close]).ok()?;

    let tail = line[close + 1..].trim();
    let expected_output = if tail.is_empty() {
        ExpectedOutput::Deferred
    } else {
        let literal = tail.strip_prefix("->")?.trim();
        if literal.is_empty() {
            return None;
        }
        ExpectedOutput::Literal(
            parse_literal(literal).unwrap_or_else(|_| Value::String(strip_quotes(literal).to_string())),
        )
    };

    Some(TestCase {
        input: FunctionCall {
            function_name: function_name.to_string(),
            params,
        },
        expected_output,
        description: line[..=close].to_string(),
    })
}

fn is_function_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.')
}

/// Index of the `)` closing the `(` at `open`, skipping quoted text.
fn matching_paren(line: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in line[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    for q in ['"', '\'', '`'] {
        if let Some(inner) = trimmed
            .strip_prefix(q)
            .and_then(|rest| rest.strip_suffix(q))
        {
            return inner;
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parse_case_with_expected_value() {
        let cases = parse_test_cases("add(1, 2) -> 3");
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].input.function_name, "add");
        assert_eq!(cases[0].input.params, vec![json!(1), json!(2)]);
        assert_eq!(cases[0].expected_output, ExpectedOutput::Literal(json!(3)));
        assert_eq!(cases[0].description, "add(1, 2)");
    }

    #[test]
    fn parse_deferred_case() {
        let cases = parse_test_cases("double(3)");
        assert_eq!(cases[0].expected_output, ExpectedOutput::Deferred);
        assert_eq!(cases[0].input.params, vec![json!(3)]);
    }

    #[test]
    fn unparseable_expected_falls_back_to_text() {
        let cases = parse_test_cases("greet('Ann') -> `Hello Ann`");
        assert_eq!(
            cases[0].expected_output,
            ExpectedOutput::Literal(json!("Hello Ann"))
        );
    }

    #[test]
    fn parens_inside_strings_do_not_close_the_call() {
        let cases = parse_test_cases("wrap('(x)') -> '[(x)]'");
        assert_eq!(cases[0].input.params, vec![json!("(x)")]);
        assert_eq!(cases[0].expected_output, ExpectedOutput::Literal(json!("[(x)]")));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let body = "sum([1, 2]) -> 3\nnot a call\nbroken(1, \n\nmax(4, 9) -> 9\nrun(a + b) -> 1";
        let cases = parse_test_cases(body);
        let names: Vec<_> = cases.iter().map(|c| c.description.as_str()).collect();
        assert_eq!(names, vec!["sum([1, 2])", "max(4, 9)"]);
    }

    #[test]
    fn empty_argument_list() {
        let cases = parse_test_cases("now() -> null");
        assert!(cases[0].input.params.is_empty());
        assert_eq!(cases[0].expected_output, ExpectedOutput::Literal(Value::Null));
    }
}
