//! Standalone ```` ```executable:<lang> ```` demos.

use super::extract::directives;
use super::text::{fenced_or_plain, take_executable};
use crate::types::DemoSpec;

pub(crate) fn parse_demo(language: &str, body: &str) -> DemoSpec {
    let starter_code = take_executable(body)
        .map(|(code, _, _)| code)
        .unwrap_or_default();

    let mut hint = None;
    let mut solution = None;
    for directive in directives(body) {
        match directive.name {
            "hint" => hint = Some(directive.body.trim().to_string()),
            "solution" => solution = Some(fenced_or_plain(directive.body)),
            _ => {}
        }
    }

    DemoSpec {
        title: format!("{} example", display_language(language)),
        starter_code,
        language: language.to_string(),
        hint,
        solution,
    }
}

/// Human-readable language name used in demo titles.
pub(crate) fn display_language(language: &str) -> String {
    match language.to_ascii_lowercase().as_str() {
        "js" | "javascript" => "JavaScript".to_string(),
        "ts" | "typescript" => "TypeScript".to_string(),
        "py" | "python" => "Python".to_string(),
        "html" => "HTML".to_string(),
        "css" => "CSS".to_string(),
        "rust" | "rs" => "Rust".to_string(),
        "sql" => "SQL".to_string(),
        _ => {
            let mut chars = language.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => "Code".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_demo_with_hint_and_solution() {
        let body = "```executable:python\nprint('hi')\n```\n:::solution\n```python\nprint('hello')\n```\n:::\n:::hint\nChange the text.\n:::\n";
        let spec = parse_demo("python", body);
        assert_eq!(spec.title, "Python example");
        assert_eq!(spec.starter_code, "print('hi')");
        assert_eq!(spec.hint.as_deref(), Some("Change the text."));
        assert_eq!(spec.solution.as_deref(), Some("print('hello')"));
    }

    #[test]
    fn unknown_languages_are_capitalized() {
        assert_eq!(display_language("go"), "Go");
        assert_eq!(display_language("js"), "JavaScript");
    }
}
