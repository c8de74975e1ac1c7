//! Contract of the external code-execution capability.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// Result of running one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    #[serde(default)]
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub elapsed_ms: u64,
}

impl ExecutionOutcome {
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
            elapsed_ms: 0,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
            elapsed_ms: 0,
        }
    }

    /// The error reported by the runner, verbatim.
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "execution failed".to_string())
    }
}

/// Sandboxed code runner.
///
/// Implementations enforce their own wall-clock limit and report a failed
/// outcome instead of hanging; the grading engine applies no timeout.
pub trait ExecutionCapability: Send + Sync {
    fn execute(&self, code: &str, language: &str) -> impl Future<Output = ExecutionOutcome> + Send;
}
