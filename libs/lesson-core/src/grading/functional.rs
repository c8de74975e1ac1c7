//! Grading strategies that run code.

use serde_json::Value;

use super::execution::ExecutionCapability;
use super::harness::{call_program, read_result, values_equal};
use super::percent;
use super::similarity::{compare_output, output_verdict};
use crate::types::{
    CaseOutcome, ExpectedOutput, FunctionCall, GradingVerdict, TestCase, TestCaseResult,
};

/// Run every test case against the submission. Cases are independent: a
/// failing or erroring case never stops the others.
pub(crate) async fn grade_test_cases<E: ExecutionCapability>(
    code: &str,
    language: &str,
    solution: Option<&str>,
    cases: &[TestCase],
    executor: &E,
) -> GradingVerdict {
    let mut results = Vec::with_capacity(cases.len());
    for case in cases {
        let outcome = run_case(code, language, solution, case, executor).await;
        results.push(TestCaseResult {
            description: case.description.clone(),
            outcome,
        });
    }

    let total = results.len();
    let passed = results.iter().filter(|r| r.outcome.is_passed()).count();

    let mut verdict = if passed == total {
        GradingVerdict::passed(format!("All {} test cases passed.", total))
    } else if let Some(message) = shared_error(&results) {
        GradingVerdict::failed(0, message)
    } else {
        let mut feedback = format!("{} of {} test cases passed.", passed, total);
        if let Some(first) = results.iter().find(|r| !r.outcome.is_passed()) {
            feedback.push_str(&format!(" {}: {}", first.description, describe(&first.outcome)));
        }
        GradingVerdict::failed(percent(passed, total), feedback)
    };
    verdict.test_results = results;
    verdict
}

/// The error every case hit, when they all failed the same way. That is the
/// submission itself failing to run, so it is reported as is.
fn shared_error(results: &[TestCaseResult]) -> Option<String> {
    let mut messages = results.iter().map(|r| match &r.outcome {
        CaseOutcome::Error { message } => Some(message),
        _ => None,
    });
    let first = messages.next()??;
    messages
        .all(|m| m == Some(first))
        .then(|| first.clone())
}

async fn run_case<E: ExecutionCapability>(
    code: &str,
    language: &str,
    solution: Option<&str>,
    case: &TestCase,
    executor: &E,
) -> CaseOutcome {
    let expected = match &case.expected_output {
        ExpectedOutput::Literal(value) => value.clone(),
        ExpectedOutput::Deferred => {
            let Some(solution) = solution else {
                return CaseOutcome::ReferenceError {
                    message: "no reference solution to compute the expected value".to_string(),
                };
            };
            match evaluate_call(solution, language, &case.input, executor).await {
                Ok(value) => value,
                Err(message) => {
                    tracing::debug!(case = %case.description, %message, "reference solution failed");
                    return CaseOutcome::ReferenceError { message };
                }
            }
        }
    };

    match evaluate_call(code, language, &case.input, executor).await {
        Ok(actual) if values_equal(&expected, &actual) => CaseOutcome::Passed,
        Ok(actual) => CaseOutcome::Failed { expected, actual },
        Err(message) => CaseOutcome::Error { message },
    }
}

async fn evaluate_call<E: ExecutionCapability>(
    code: &str,
    language: &str,
    call: &FunctionCall,
    executor: &E,
) -> Result<Value, String> {
    let program = call_program(code, language, call)?;
    let outcome = executor.execute(&program, language).await;
    if !outcome.success {
        return Err(outcome.error_message());
    }
    read_result(&outcome.output)
}

fn describe(outcome: &CaseOutcome) -> String {
    match outcome {
        CaseOutcome::Passed => "passed".to_string(),
        CaseOutcome::Failed { expected, actual } => {
            format!("expected {}, got {}", expected, actual)
        }
        CaseOutcome::Error { message } => message.clone(),
        CaseOutcome::ReferenceError { message } => format!("reference solution error: {}", message),
    }
}

/// Compare printed output against the reference solution's output, or else
/// against a declared expected output. Without either, running cleanly is
/// enough. A failed submission run scores zero with the runner's error.
pub(crate) async fn grade_output<E: ExecutionCapability>(
    code: &str,
    language: &str,
    solution: Option<&str>,
    expected_output: Option<&str>,
    executor: &E,
) -> GradingVerdict {
    let submission = executor.execute(code, language).await;
    if !submission.success {
        return GradingVerdict::failed(0, submission.error_message());
    }

    if let Some(solution) = solution {
        let reference = executor.execute(solution, language).await;
        if reference.success {
            return output_verdict(&compare_output(&submission.output, &reference.output));
        }
        tracing::debug!(error = ?reference.error, "reference solution failed, falling back");
    }

    match expected_output {
        Some(expected) => output_verdict(&compare_output(&submission.output, expected)),
        None => GradingVerdict::passed("Code ran successfully."),
    }
}

/// Running without error completes the component.
pub(crate) async fn grade_run<E: ExecutionCapability>(
    code: &str,
    language: &str,
    executor: &E,
) -> GradingVerdict {
    let outcome = executor.execute(code, language).await;
    if outcome.success {
        GradingVerdict::passed("Code ran successfully.")
    } else {
        GradingVerdict::failed(0, outcome.error_message())
    }
}
