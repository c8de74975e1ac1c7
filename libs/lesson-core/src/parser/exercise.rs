//! `:::exercise` bodies.

use super::extract::{directives, strip_directives};
use super::text::{fenced_or_plain, split_title, take_executable};
use crate::test_cases::parse_test_cases;
use crate::types::ExerciseSpec;

pub(crate) const DEFAULT_LANGUAGE: &str = "javascript";

pub(crate) fn parse_exercise(body: &str) -> ExerciseSpec {
    let mut hints = Vec::new();
    let mut solution = None;
    let mut test_cases = None;
    let mut expected_output = None;

    for directive in directives(body) {
        match directive.name {
            "hint" => hints.push(directive.body.trim().to_string()),
            "solution" => solution = Some(fenced_or_plain(directive.body)),
            "test-cases" => {
                let cases = parse_test_cases(directive.body);
                test_cases = (!cases.is_empty()).then_some(cases);
            }
            "expected-output" => expected_output = Some(fenced_or_plain(directive.body)),
            other => tracing::debug!(name = other, "ignoring unknown exercise section"),
        }
    }

    let prose = strip_directives(body);
    let (starter_code, language, prose) = take_executable(&prose)
        .unwrap_or_else(|| (String::new(), DEFAULT_LANGUAGE.to_string(), prose));
    let (title, description) = split_title(&prose);

    ExerciseSpec {
        title: title.unwrap_or_else(|| "Exercise".to_string()),
        description,
        starter_code,
        language,
        hints,
        solution,
        test_cases,
        expected_output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExpectedOutput;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const BODY: &str = r#"**Double it**

Write a function `double(n)` returning twice `n`.

```executable:javascript
function double(n) {
  // your code
}
```

:::hint
Multiply by two.
:::

:::hint
Or add `n` to itself.
:::

:::solution
```javascript
function double(n) { return n * 2; }
```
:::

:::test-cases
double(2) -> 4
double(3)
:::
"#;

    #[test]
    fn parse_full_exercise() {
        let spec = parse_exercise(BODY);
        assert_eq!(spec.title, "Double it");
        assert_eq!(spec.description, "Write a function `double(n)` returning twice `n`.");
        assert_eq!(spec.language, "javascript");
        assert_eq!(spec.starter_code, "function double(n) {\n  // your code\n}");
        assert_eq!(spec.hints, vec!["Multiply by two.", "Or add `n` to itself."]);
        assert_eq!(
            spec.solution.as_deref(),
            Some("function double(n) { return n * 2; }")
        );
        let cases = spec.test_cases.unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].expected_output, ExpectedOutput::Literal(json!(4)));
        assert_eq!(cases[1].expected_output, ExpectedOutput::Deferred);
    }

    #[test]
    fn parse_minimal_exercise() {
        let spec = parse_exercise("Print hello.\n\n:::expected-output\nhello\n:::\n");
        assert_eq!(spec.title, "Exercise");
        assert_eq!(spec.description, "Print hello.");
        assert_eq!(spec.language, DEFAULT_LANGUAGE);
        assert!(spec.starter_code.is_empty());
        assert!(spec.hints.is_empty());
        assert_eq!(spec.test_cases, None);
        assert_eq!(spec.expected_output.as_deref(), Some("hello"));
    }
}
