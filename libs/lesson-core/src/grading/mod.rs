//! Grading engine.
//!
//! Stateless: each call takes a component, a submission and an execution
//! capability, and returns a fresh verdict. Strategy, first applicable wins:
//! 1. exercise with test cases: run each case, score by share passed;
//! 2. reference solution: compare printed output with the reference's;
//! 3. declared expected output: same comparison against that text, or
//!    success alone when nothing is declared;
//! 4. a failed submission run is invalid with score 0 and the runner's error;
//! 5. quiz, fill-blank and drag-drop are graded without running anything.

mod choice;
pub mod execution;
mod functional;
mod harness;
pub mod similarity;

use crate::error::{GradeError, Result};
use crate::types::{ChallengeSpec, ComponentData, DemoSpec, ExerciseSpec, GradingVerdict, StarterCode, Submission};

pub use execution::{ExecutionCapability, ExecutionOutcome};

/// Grade `submission` against `component`.
pub async fn grade<E: ExecutionCapability>(
    component: &ComponentData,
    submission: &Submission,
    executor: &E,
) -> Result<GradingVerdict> {
    let verdict = match (component, submission) {
        (ComponentData::Exercise(spec), Submission::Exercise { code }) => {
            grade_exercise(spec, code, executor).await
        }
        (ComponentData::ExecutableDemo(spec), Submission::ExecutableDemo { code }) => {
            grade_demo(spec, code, executor).await
        }
        (ComponentData::Quiz(spec), Submission::Quiz { selected }) => {
            choice::grade_quiz(spec, selected)
        }
        (ComponentData::FillBlank(spec), Submission::FillBlank { answers }) => {
            choice::grade_fill_blank(spec, answers)
        }
        (ComponentData::DragDrop(spec), Submission::DragDrop { placements }) => {
            choice::grade_drag_drop(spec, placements)
        }
        (ComponentData::Challenge(spec), Submission::Challenge { code }) => {
            grade_challenge(spec, code, executor).await
        }
        _ => {
            return Err(GradeError::KindMismatch {
                expected: component.kind(),
                submitted: submission.kind(),
            })
        }
    };

    tracing::debug!(
        kind = %component.kind(),
        score = verdict.score,
        valid = verdict.is_valid,
        "graded submission"
    );
    Ok(verdict)
}

async fn grade_exercise<E: ExecutionCapability>(
    spec: &ExerciseSpec,
    code: &str,
    executor: &E,
) -> GradingVerdict {
    let solution = spec.solution.as_deref();
    match spec.test_cases.as_deref() {
        Some(cases) if !cases.is_empty() => {
            functional::grade_test_cases(code, &spec.language, solution, cases, executor).await
        }
        _ => {
            functional::grade_output(
                code,
                &spec.language,
                solution,
                spec.expected_output.as_deref(),
                executor,
            )
            .await
        }
    }
}

async fn grade_demo<E: ExecutionCapability>(
    spec: &DemoSpec,
    code: &str,
    executor: &E,
) -> GradingVerdict {
    functional::grade_run(code, &spec.language, executor).await
}

/// Challenge test cases are free text for the learner; only the script
/// variant is run.
async fn grade_challenge<E: ExecutionCapability>(
    spec: &ChallengeSpec,
    code: &StarterCode,
    executor: &E,
) -> GradingVerdict {
    let verdict = match code.javascript.as_deref().map(str::trim) {
        Some(script) if !script.is_empty() => {
            functional::grade_run(script, "javascript", executor).await
        }
        _ => GradingVerdict::passed("Submission received."),
    };
    if verdict.is_valid && !spec.requirements.is_empty() {
        let mut verdict = verdict;
        verdict.feedback = format!(
            "{} Check your work against the {} requirements.",
            verdict.feedback,
            spec.requirements.len()
        );
        return verdict;
    }
    verdict
}

/// `round(100 * part / total)`; callers handle `total == 0`.
pub(crate) fn percent(part: usize, total: usize) -> u8 {
    debug_assert!(total > 0 && part <= total);
    ((part as f64 * 100.0) / total as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::{CaseOutcome, ComponentKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    /// Runs a tiny, fixed repertoire of programs.
    struct FakeRunner<F>(F);

    impl<F> ExecutionCapability for FakeRunner<F>
    where
        F: Fn(&str, &str) -> ExecutionOutcome + Send + Sync,
    {
        async fn execute(&self, code: &str, language: &str) -> ExecutionOutcome {
            (self.0)(code, language)
        }
    }

    /// Understands `double` implementations and the harness call line.
    fn doubling_runner() -> FakeRunner<impl Fn(&str, &str) -> ExecutionOutcome + Send + Sync> {
        FakeRunner(|code: &str, _language: &str| {
            if code.contains("syntax error") {
                return ExecutionOutcome::failed("SyntaxError: Unexpected token");
            }
            let Some(call) = code.lines().rev().find(|l| l.contains(harness::RESULT_MARKER)) else {
                return ExecutionOutcome::succeeded("");
            };
            let start = call.find("double(").map(|i| i + "double(".len());
            let arg: i64 = match start.and_then(|s| call[s..].split(')').next()?.parse::<i64>().ok()) {
                Some(n) => n,
                None => return ExecutionOutcome::failed("TypeError: bad call"),
            };
            let result = if code.contains("return n * 2") || code.contains("return n + n") {
                arg * 2
            } else if code.contains("return n + 1") {
                arg + 1
            } else {
                return ExecutionOutcome::failed("ReferenceError: double is not defined");
            };
            ExecutionOutcome::succeeded(format!("{}{}\n", harness::RESULT_MARKER, result))
        })
    }

    /// Prints a fixed string per program.
    fn printing_runner(outputs: &[(&str, &str)]) -> FakeRunner<impl Fn(&str, &str) -> ExecutionOutcome + Send + Sync> {
        let outputs: HashMap<String, String> = outputs
            .iter()
            .map(|(code, out)| (code.to_string(), out.to_string()))
            .collect();
        FakeRunner(move |code: &str, _language: &str| match outputs.get(code) {
            Some(out) => ExecutionOutcome::succeeded(out.clone()),
            None => ExecutionOutcome::failed("Error: program crashed"),
        })
    }

    fn exercise(body: &str) -> ComponentData {
        let doc = parse(&format!(":::exercise\n{}\n:::\n", body));
        assert_eq!(doc.components.len(), 1);
        doc.components[0].data.clone()
    }

    fn code(src: &str) -> Submission {
        Submission::Exercise {
            code: src.to_string(),
        }
    }

    #[tokio::test]
    async fn deferred_case_uses_reference_solution() {
        let component = exercise(
            ":::solution\n```javascript\nfunction double(n) { return n * 2; }\n```\n:::\n:::test-cases\ndouble(3)\n:::",
        );
        let verdict = grade(
            &component,
            &code("function double(n) { return n + n; }"),
            &doubling_runner(),
        )
        .await
        .unwrap();
        assert!(verdict.is_valid);
        assert_eq!(verdict.score, 100);
        assert_eq!(verdict.test_results.len(), 1);
        assert_eq!(verdict.test_results[0].outcome, CaseOutcome::Passed);
    }

    #[tokio::test]
    async fn cases_are_scored_independently() {
        let component = exercise(":::test-cases\ndouble(1) -> 2\ndouble(2) -> 4\ndouble(5) -> 10\n:::");
        let verdict = grade(&component, &code("function double(n) { return n + 1; }"), &doubling_runner())
            .await
            .unwrap();
        assert!(!verdict.is_valid);
        assert_eq!(verdict.score, 33);
        let outcomes: Vec<bool> = verdict.test_results.iter().map(|r| r.outcome.is_passed()).collect();
        assert_eq!(outcomes, vec![true, false, false]);
        assert_eq!(
            verdict.test_results[1].outcome,
            CaseOutcome::Failed {
                expected: json!(4),
                actual: json!(3),
            }
        );
        assert!(verdict.feedback.starts_with("1 of 3 test cases passed."));
    }

    #[tokio::test]
    async fn submission_that_never_runs_reports_the_runner_error() {
        let component = exercise(":::test-cases\ndouble(1) -> 2\ndouble(2) -> 4\n:::");
        let verdict = grade(&component, &code("syntax error"), &doubling_runner())
            .await
            .unwrap();
        assert!(!verdict.is_valid);
        assert_eq!(verdict.score, 0);
        assert_eq!(verdict.feedback, "SyntaxError: Unexpected token");
        assert_eq!(verdict.test_results.len(), 2);
    }

    #[tokio::test]
    async fn failing_reference_marks_only_that_case() {
        let component = exercise(
            ":::solution\n```javascript\nsyntax error\n```\n:::\n:::test-cases\ndouble(3)\ndouble(4) -> 8\n:::",
        );
        let verdict = grade(&component, &code("function double(n) { return n * 2; }"), &doubling_runner())
            .await
            .unwrap();
        assert!(!verdict.is_valid);
        assert_eq!(verdict.score, 50);
        assert!(matches!(
            verdict.test_results[0].outcome,
            CaseOutcome::ReferenceError { .. }
        ));
        assert_eq!(verdict.test_results[1].outcome, CaseOutcome::Passed);
    }

    #[tokio::test]
    async fn output_compared_with_reference() {
        let component = exercise(":::solution\n```javascript\nref()\n```\n:::");
        let runner = printing_runner(&[("ref()", "Total: 15"), ("mine()", "the total is 15 units"), ("same()", "Total: 15\n")]);

        let verdict = grade(&component, &code("mine()"), &runner).await.unwrap();
        assert!(!verdict.is_valid);
        assert_eq!(verdict.score, 50);

        let again = grade(&component, &code("mine()"), &runner).await.unwrap();
        assert_eq!(verdict, again);

        let exact = grade(&component, &code("same()"), &runner).await.unwrap();
        assert!(exact.is_valid);
        assert_eq!(exact.score, 100);
    }

    #[tokio::test]
    async fn declared_expected_output_or_success_alone() {
        let runner = printing_runner(&[("hello()", "Hello, world")]);

        let declared = exercise(":::expected-output\nhello, world!\n:::");
        let verdict = grade(&declared, &code("hello()"), &runner).await.unwrap();
        assert!(verdict.is_valid);

        let undeclared = exercise("Just run it.");
        let verdict = grade(&undeclared, &code("hello()"), &runner).await.unwrap();
        assert!(verdict.is_valid);
        assert_eq!(verdict.score, 100);
    }

    #[tokio::test]
    async fn failed_submission_surfaces_error_verbatim() {
        let component = exercise(":::solution\n```javascript\nref()\n```\n:::");
        let runner = printing_runner(&[("ref()", "ok")]);
        let verdict = grade(&component, &code("boom()"), &runner).await.unwrap();
        assert!(!verdict.is_valid);
        assert_eq!(verdict.score, 0);
        assert_eq!(verdict.feedback, "Error: program crashed");
    }

    #[tokio::test]
    async fn quiz_needs_no_runner() {
        let doc = parse(":::quiz\nPick A\n- [x] A\n- [ ] B\n- [ ] C\n:::\n");
        let runner = printing_runner(&[]);
        let component = &doc.components[0].data;

        let right = Submission::Quiz {
            selected: vec!["a".to_string()],
        };
        assert!(grade(component, &right, &runner).await.unwrap().is_valid);

        let too_many = Submission::Quiz {
            selected: vec!["a".to_string(), "b".to_string()],
        };
        let verdict = grade(component, &too_many, &runner).await.unwrap();
        assert!(!verdict.is_valid);
        assert_eq!(verdict.score, 0);
    }

    #[tokio::test]
    async fn demo_and_challenge_complete_on_success() {
        let runner = printing_runner(&[("run()", "")]);
        let doc = parse("```executable:javascript\nrun()\n```\n\n:::challenge\n要求：\n1. one\n:::\n");
        let demo = &doc.components[0].data;
        let challenge = &doc.components[1].data;

        let verdict = grade(demo, &Submission::ExecutableDemo { code: "run()".to_string() }, &runner)
            .await
            .unwrap();
        assert!(verdict.is_valid);

        let submission = Submission::Challenge {
            code: StarterCode {
                javascript: Some("crash()".to_string()),
                ..StarterCode::default()
            },
        };
        let verdict = grade(challenge, &submission, &runner).await.unwrap();
        assert!(!verdict.is_valid);
        assert_eq!(verdict.feedback, "Error: program crashed");
    }

    #[tokio::test]
    async fn mismatched_submission_kind_is_an_error() {
        let component = exercise("Run it.");
        let submission = Submission::Quiz { selected: vec![] };
        let err = grade(&component, &submission, &printing_runner(&[])).await.unwrap_err();
        assert!(matches!(
            err,
            GradeError::KindMismatch {
                expected: ComponentKind::Exercise,
                submitted: ComponentKind::Quiz,
            }
        ));
    }
}
