//! Core lesson library shared by the backend and any other front end.
//!
//! Provides:
//! - Lesson parser turning authored text into markup plus interactive components
//! - Grading engine for exercises, demos, quizzes, fill-blanks, drag-drops and challenges
//! - Literal and test-case readers used by both
//! - Shared types (components, submissions, verdicts)

pub mod error;
pub mod grading;
pub mod literal;
pub mod parser;
pub mod render;
pub mod test_cases;
pub mod types;

pub use error::{GradeError, LiteralError, Result};
pub use grading::similarity::{compare_output, OutputMatch};
pub use grading::{grade, ExecutionCapability, ExecutionOutcome};
pub use literal::{parse_arguments, parse_literal};
pub use parser::{parse, parse_with, IdGenerator};
pub use test_cases::parse_test_cases;
pub use types::{
    Blank, CaseOutcome, ChallengeSpec, ChallengeTestCase, ComponentData, ComponentKind, DemoSpec,
    DragDropSpec, DropZone, ExerciseSpec, ExpectedOutput, FillBlankSpec, FunctionCall,
    GradingVerdict, InteractiveComponent, ParsedDocument, QuizOption, QuizSpec, SourceItem,
    StarterCode, Submission, TestCase, TestCaseResult,
};
