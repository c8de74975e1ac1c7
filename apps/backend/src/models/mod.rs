//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export shared types from lesson-core
pub use lesson_core::types::{ComponentData, GradingVerdict, ParsedDocument, Submission};

/// Request to parse lesson content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseRequest {
    pub content: String,
}

/// Request to grade a submission against a component description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRequest {
    pub component: ComponentData,
    pub submission: Submission,
}

/// Request to grade a submission against one component of a lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonGradeRequest {
    pub content: String,
    pub component_id: String,
    pub submission: Submission,
}

/// Grading response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResponse {
    pub verdict: GradingVerdict,
    pub graded_at: DateTime<Utc>,
}

impl GradeResponse {
    pub fn now(verdict: GradingVerdict) -> Self {
        Self {
            verdict,
            graded_at: Utc::now(),
        }
    }
}
