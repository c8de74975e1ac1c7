//! Core types shared by the parser, the grading engine and the backend.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of interactive component embedded in a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Exercise,
    ExecutableDemo,
    Quiz,
    FillBlank,
    DragDrop,
    Challenge,
}

impl ComponentKind {
    /// Get the kind name as it appears in lesson markup.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exercise => "exercise",
            Self::ExecutableDemo => "executable-demo",
            Self::Quiz => "quiz",
            Self::FillBlank => "fill-blank",
            Self::DragDrop => "drag-drop",
            Self::Challenge => "challenge",
        }
    }

    /// Parse from string.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "exercise" => Some(Self::Exercise),
            "executable-demo" => Some(Self::ExecutableDemo),
            "quiz" => Some(Self::Quiz),
            "fill-blank" => Some(Self::FillBlank),
            "drag-drop" => Some(Self::DragDrop),
            "challenge" => Some(Self::Challenge),
            _ => None,
        }
    }

    /// Whether blocks of this kind may hold sub-blocks in the same syntax.
    pub fn is_nesting(&self) -> bool {
        matches!(self, Self::Exercise | Self::DragDrop | Self::Challenge)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call part of a test case: `name(params...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub function_name: String,
    pub params: Vec<Value>,
}

/// Expected result of a test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ExpectedOutput {
    Literal(Value),
    /// Computed at grading time by running the same call against the
    /// reference solution.
    Deferred,
}

/// A declared test case of a functional exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: FunctionCall,
    pub expected_output: ExpectedOutput,
    pub description: String,
}

/// Coding exercise with optional reference solution and test cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSpec {
    pub title: String,
    pub description: String,
    pub starter_code: String,
    pub language: String,
    pub hints: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_cases: Option<Vec<TestCase>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

/// Standalone runnable code sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoSpec {
    pub title: String,
    pub starter_code: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSpec {
    pub question: String,
    pub options: Vec<QuizOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub multiple_choice: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blank {
    pub id: String,
    pub accepted_answers: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillBlankSpec {
    pub content: String,
    pub blanks: Vec<Blank>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Draggable item: `content` is the backtick label, `caption` the text after
/// the hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceItem {
    pub id: String,
    pub content: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropZone {
    pub id: String,
    pub label: String,
    pub accepted_items: Vec<String>,
    pub max_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragDropSpec {
    pub title: String,
    pub description: String,
    pub source_items: Vec<SourceItem>,
    pub drop_zones: Vec<DropZone>,
    pub template: String,
}

/// The three independently optional starter variants of a challenge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarterCode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javascript: Option<String>,
}

/// Free-text challenge test case; surfaced to the learner, never executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeTestCase {
    pub description: String,
    pub input: String,
    pub expected_output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSpec {
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub starter_code: StarterCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_cases: Option<Vec<ChallengeTestCase>>,
}

/// Kind-specific component data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ComponentData {
    Exercise(ExerciseSpec),
    ExecutableDemo(DemoSpec),
    Quiz(QuizSpec),
    FillBlank(FillBlankSpec),
    DragDrop(DragDropSpec),
    Challenge(ChallengeSpec),
}

impl ComponentData {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Exercise(_) => ComponentKind::Exercise,
            Self::ExecutableDemo(_) => ComponentKind::ExecutableDemo,
            Self::Quiz(_) => ComponentKind::Quiz,
            Self::FillBlank(_) => ComponentKind::FillBlank,
            Self::DragDrop(_) => ComponentKind::DragDrop,
            Self::Challenge(_) => ComponentKind::Challenge,
        }
    }
}

/// A component extracted from a lesson, keyed by its generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveComponent {
    pub id: String,
    pub data: ComponentData,
}

impl InteractiveComponent {
    pub fn kind(&self) -> ComponentKind {
        self.data.kind()
    }
}

/// Output of a parse pass: renderable markup plus the component side-table,
/// listed in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub html: String,
    pub components: Vec<InteractiveComponent>,
}

impl ParsedDocument {
    /// Look up a component by id.
    pub fn component(&self, id: &str) -> Option<&InteractiveComponent> {
        self.components.iter().find(|c| c.id == id)
    }
}

/// A learner's answer, shaped per component kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Submission {
    Exercise {
        code: String,
    },
    ExecutableDemo {
        code: String,
    },
    Quiz {
        selected: Vec<String>,
    },
    FillBlank {
        answers: HashMap<String, String>,
    },
    DragDrop {
        /// Zone id to the item ids dropped into it.
        placements: HashMap<String, Vec<String>>,
    },
    Challenge {
        #[serde(default)]
        code: StarterCode,
    },
}

impl Submission {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Exercise { .. } => ComponentKind::Exercise,
            Self::ExecutableDemo { .. } => ComponentKind::ExecutableDemo,
            Self::Quiz { .. } => ComponentKind::Quiz,
            Self::FillBlank { .. } => ComponentKind::FillBlank,
            Self::DragDrop { .. } => ComponentKind::DragDrop,
            Self::Challenge { .. } => ComponentKind::Challenge,
        }
    }
}

/// Outcome of one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed,
    Failed { expected: Value, actual: Value },
    Error { message: String },
    /// The reference solution could not produce the expected value.
    ReferenceError { message: String },
}

impl CaseOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub description: String,
    pub outcome: CaseOutcome,
}

/// Result of grading one submission. Never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingVerdict {
    pub is_valid: bool,
    /// Score between 0 and 100.
    pub score: u8,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_results: Vec<TestCaseResult>,
}

impl GradingVerdict {
    pub fn passed(feedback: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            score: 100,
            feedback: feedback.into(),
            explanation: None,
            test_results: Vec::new(),
        }
    }

    pub fn failed(score: u8, feedback: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            score,
            feedback: feedback.into(),
            explanation: None,
            test_results: Vec::new(),
        }
    }

    pub fn with_explanation(mut self, explanation: Option<String>) -> Self {
        self.explanation = explanation;
        self
    }
}
