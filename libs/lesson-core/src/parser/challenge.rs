//! `:::challenge` bodies.

use std::sync::LazyLock;

use regex::Regex;

use super::extract::{directives, strip_directives};
use super::text::{collapse_blank_runs, fences, split_title};
use crate::types::{ChallengeSpec, ChallengeTestCase, StarterCode};

static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[.)、]\s*(.+?)\s*$").expect("valid regex"));
static CASE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(.+?)\s*[：:]\s*(?:输入|input)\s*[：:]?\s*(.+?)\s*[，,]\s*(?:期望输出|expected output|expected)\s*[：:]?\s*(.+?)\s*$")
        .expect("valid regex")
});

pub(crate) fn parse_challenge(body: &str) -> ChallengeSpec {
    let mut starter_code = StarterCode::default();
    let mut test_cases = None;

    for directive in directives(body) {
        match directive.name {
            "starter-code" => starter_code = parse_starter_code(directive.body),
            "test-cases" => {
                let cases: Vec<_> = directive.body.lines().filter_map(parse_case_line).collect();
                test_cases = (!cases.is_empty()).then_some(cases);
            }
            other => tracing::debug!(name = other, "ignoring unknown challenge section"),
        }
    }

    let (requirements, prose) = take_requirements(&strip_directives(body));
    let (title, description) = split_title(&prose);

    ChallengeSpec {
        title: title.unwrap_or_else(|| "Challenge".to_string()),
        description,
        requirements,
        starter_code,
        test_cases,
    }
}

/// First fence per variant wins; fences in other languages are ignored.
fn parse_starter_code(body: &str) -> StarterCode {
    let mut code = StarterCode::default();
    for fence in fences(body) {
        let slot = match fence.info.to_ascii_lowercase().as_str() {
            "html" | "htm" => &mut code.html,
            "css" => &mut code.css,
            "js" | "javascript" => &mut code.javascript,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(fence.code.to_string());
        }
    }
    code
}

fn parse_case_line(line: &str) -> Option<ChallengeTestCase> {
    let caps = CASE_LINE.captures(line)?;
    Some(ChallengeTestCase {
        description: caps[1].to_string(),
        input: caps[2].to_string(),
        expected_output: caps[3].to_string(),
    })
}

fn is_requirements_heading(line: &str) -> bool {
    let plain = line
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches('*')
        .trim()
        .trim_end_matches(['：', ':'])
        .trim_matches('*')
        .trim();
    plain == "要求" || plain.eq_ignore_ascii_case("requirements")
}

/// Pull the numbered list under the requirements heading out of `prose`.
fn take_requirements(prose: &str) -> (Vec<String>, String) {
    let lines: Vec<&str> = prose.lines().collect();
    let Some(heading) = lines.iter().position(|l| is_requirements_heading(l)) else {
        return (Vec::new(), prose.to_string());
    };

    let mut requirements = Vec::new();
    let mut end = heading + 1;
    while end < lines.len() {
        let line = lines[end];
        if let Some(caps) = NUMBERED.captures(line) {
            requirements.push(caps[1].to_string());
        } else if !line.trim().is_empty() {
            break;
        } else if !requirements.is_empty()
            && !lines[end + 1..]
                .iter()
                .find(|l| !l.trim().is_empty())
                .is_some_and(|l| NUMBERED.is_match(l))
        {
            break;
        }
        end += 1;
    }

    let rest: Vec<&str> = lines[..heading]
        .iter()
        .chain(lines[end..].iter())
        .copied()
        .collect();
    (requirements, collapse_blank_runs(&rest.join("\n")))
}
