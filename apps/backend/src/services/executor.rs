//! HTTP client for the external code runner.
//!
//! The runner accepts `POST {base}/execute` with `{"code", "language"}` and
//! answers with an execution outcome. Every failure on the way (no runner
//! configured, network error, non-success status, unreadable body) becomes a
//! failed outcome so grading can report it like any other runtime error.

use std::time::{Duration, Instant};

use lesson_core::{ExecutionCapability, ExecutionOutcome};
use reqwest::Client;
use serde::Serialize;

pub const NOT_CONFIGURED: &str = "code execution is not configured";

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    code: &'a str,
    language: &'a str,
}

/// Code runner reached over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteExecutor {
    client: Client,
    base_url: Option<String>,
}

impl RemoteExecutor {
    pub fn new(base_url: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default HTTP client");
                Client::new()
            });
        Self {
            client,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    async fn call(&self, base_url: &str, code: &str, language: &str) -> ExecutionOutcome {
        let url = format!("{}/execute", base_url);
        let request = ExecuteRequest { code, language };

        let resp = match self.client.post(&url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                return ExecutionOutcome::failed("code execution timed out");
            }
            Err(e) => {
                tracing::warn!(error = %e, %url, "code runner unreachable");
                return ExecutionOutcome::failed(format!("code runner unreachable: {}", e));
            }
        };

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(status, %message, "code runner rejected request");
            return ExecutionOutcome::failed(format!(
                "code runner returned status {}: {}",
                status,
                message.trim()
            ));
        }

        match resp.json::<ExecutionOutcome>().await {
            Ok(outcome) => outcome,
            Err(e) => ExecutionOutcome::failed(format!("unreadable code runner response: {}", e)),
        }
    }
}

impl ExecutionCapability for RemoteExecutor {
    async fn execute(&self, code: &str, language: &str) -> ExecutionOutcome {
        let Some(base_url) = self.base_url.as_deref() else {
            return ExecutionOutcome::failed(NOT_CONFIGURED);
        };

        let started = Instant::now();
        let mut outcome = self.call(base_url, code, language).await;
        if outcome.elapsed_ms == 0 {
            outcome.elapsed_ms = started.elapsed().as_millis() as u64;
        }
        tracing::debug!(
            language,
            success = outcome.success,
            elapsed_ms = outcome.elapsed_ms,
            "code executed"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_executor_fails_every_run() {
        let executor = RemoteExecutor::new(None, Duration::from_secs(1));
        assert!(!executor.is_configured());

        let outcome = executor.execute("console.log(1)", "javascript").await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some(NOT_CONFIGURED));
    }

    #[tokio::test]
    async fn test_unreachable_runner_is_a_failed_outcome() {
        // Port 9 (discard) is closed on test machines.
        let executor = RemoteExecutor::new(
            Some("http://127.0.0.1:9/".to_string()),
            Duration::from_secs(2),
        );
        let outcome = executor.execute("print(1)", "python").await;
        assert!(!outcome.success);
        assert!(outcome.error.is_some());
    }
}
