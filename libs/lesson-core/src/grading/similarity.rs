//! Fuzzy comparison of program output against a reference.
//!
//! The reference is cut into fragments at whitespace and common sentence
//! punctuation; coverage is the share of fragments found, case-insensitively,
//! anywhere in the learner's output.

use serde::{Deserialize, Serialize};

use super::percent;
use crate::types::GradingVerdict;

/// Coverage needed for a valid verdict.
pub const VALID_COVERAGE: u8 = 60;
/// Coverage from which the feedback reports a partial match.
pub const PARTIAL_COVERAGE: u8 = 40;
/// Floor applied to the score of a valid fuzzy match.
pub const VALID_SCORE_FLOOR: u8 = 80;
/// Fragments of at least this many characters are significant.
pub const SIGNIFICANT_FRAGMENT_CHARS: usize = 2;

const FRAGMENT_DELIMITERS: &[char] = &[',', '.', ';', '!', '?', '，', '。', '；', '！', '？', '、'];

/// Result of comparing actual output to expected output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputMatch {
    /// Equal after trimming.
    pub exact: bool,
    /// Percentage of expected fragments found in the actual output.
    pub coverage: u8,
    pub matched_fragments: usize,
    pub total_fragments: usize,
    pub significant_matched: usize,
}

/// Compare actual output to expected output.
pub fn compare_output(actual: &str, expected: &str) -> OutputMatch {
    let actual_normalized = normalize_newlines(actual);
    let expected_normalized = normalize_newlines(expected);
    let exact = actual_normalized.trim() == expected_normalized.trim();

    let haystack = actual_normalized.to_lowercase();
    let fragments = fragments(&expected_normalized);
    let found: Vec<&String> = fragments.iter().filter(|f| haystack.contains(f.as_str())).collect();
    let significant_matched = found
        .iter()
        .filter(|f| f.chars().count() >= SIGNIFICANT_FRAGMENT_CHARS)
        .count();

    OutputMatch {
        exact,
        coverage: if fragments.is_empty() {
            100
        } else {
            percent(found.len(), fragments.len())
        },
        matched_fragments: found.len(),
        total_fragments: fragments.len(),
        significant_matched,
    }
}

/// Lowercased, non-empty fragments of `text`.
pub fn fragments(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || FRAGMENT_DELIMITERS.contains(&c))
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n")
}

/// Verdict for an output comparison.
pub(crate) fn output_verdict(m: &OutputMatch) -> GradingVerdict {
    if m.exact {
        return GradingVerdict::passed("Output matches the expected output.");
    }
    if m.total_fragments == 0 {
        return GradingVerdict::passed("Code ran successfully.");
    }

    if m.coverage >= VALID_COVERAGE && m.significant_matched > 0 {
        let mut verdict = GradingVerdict::passed(format!(
            "Output is close to the expected output ({}% of key parts found).",
            m.coverage
        ));
        verdict.score = m.coverage.max(VALID_SCORE_FLOOR);
        verdict
    } else if m.coverage >= PARTIAL_COVERAGE {
        GradingVerdict::failed(
            m.coverage,
            format!(
                "Output partially matches the expected output ({}% of key parts found).",
                m.coverage
            ),
        )
    } else {
        GradingVerdict::failed(
            m.coverage,
            format!(
                "Output does not match the expected output ({}% of key parts found).",
                m.coverage
            ),
        )
    }
}
