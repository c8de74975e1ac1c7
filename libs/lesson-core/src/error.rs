//! Error types for lesson-core.

use thiserror::Error;

use crate::types::ComponentKind;

/// Errors raised while reading literal test-case data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {position}")]
pub struct LiteralError {
    pub position: usize,
    pub message: String,
}

impl LiteralError {
    pub(crate) fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Errors that can occur when a grading call is malformed.
///
/// A failing submission is never an error; it is a verdict.
#[derive(Debug, Error)]
pub enum GradeError {
    #[error("submission for {submitted} cannot be graded against a {expected} component")]
    KindMismatch {
        expected: ComponentKind,
        submitted: ComponentKind,
    },
}

/// Result type alias using GradeError.
pub type Result<T> = std::result::Result<T, GradeError>;
