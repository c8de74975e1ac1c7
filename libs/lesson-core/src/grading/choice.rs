//! Deterministic grading for quiz, fill-blank and drag-drop components.

use std::collections::{HashMap, HashSet};

use super::percent;
use crate::types::{DragDropSpec, FillBlankSpec, GradingVerdict, QuizSpec};

/// The selected set must equal the correct set exactly; subsets earn nothing.
pub(crate) fn grade_quiz(spec: &QuizSpec, selected: &[String]) -> GradingVerdict {
    let correct: HashSet<&str> = spec
        .options
        .iter()
        .filter(|o| o.is_correct)
        .map(|o| o.id.as_str())
        .collect();
    let chosen: HashSet<&str> = selected.iter().map(String::as_str).collect();

    let verdict = if chosen == correct {
        GradingVerdict::passed("Correct!")
    } else if spec.multiple_choice {
        GradingVerdict::failed(0, "Not quite. Select every correct option and nothing else.")
    } else {
        GradingVerdict::failed(0, "Not quite. Try again.")
    };
    verdict.with_explanation(spec.explanation.clone())
}

pub(crate) fn grade_fill_blank(
    spec: &FillBlankSpec,
    answers: &HashMap<String, String>,
) -> GradingVerdict {
    let total = spec.blanks.len();
    if total == 0 {
        return GradingVerdict::passed("Nothing to fill in.").with_explanation(spec.explanation.clone());
    }

    let correct = spec
        .blanks
        .iter()
        .filter(|blank| {
            let Some(answer) = answers.get(&blank.id).map(|a| a.trim()) else {
                return false;
            };
            blank.accepted_answers.iter().map(|a| a.trim()).any(|accepted| {
                if blank.case_sensitive {
                    accepted == answer
                } else {
                    accepted.to_lowercase() == answer.to_lowercase()
                }
            })
        })
        .count();

    let verdict = if correct == total {
        GradingVerdict::passed("All blanks are correct!")
    } else {
        GradingVerdict::failed(
            percent(correct, total),
            format!("{} of {} blanks are correct.", correct, total),
        )
    };
    verdict.with_explanation(spec.explanation.clone())
}

pub(crate) fn grade_drag_drop(
    spec: &DragDropSpec,
    placements: &HashMap<String, Vec<String>>,
) -> GradingVerdict {
    let total = spec.drop_zones.len();
    if total == 0 {
        return GradingVerdict::passed("Nothing to place.");
    }

    let correct = spec
        .drop_zones
        .iter()
        .filter(|zone| {
            let placed: HashSet<&str> = placements
                .get(&zone.id)
                .map(|items| items.iter().map(String::as_str).collect())
                .unwrap_or_default();
            let accepted: HashSet<&str> = zone.accepted_items.iter().map(String::as_str).collect();
            placed == accepted
        })
        .count();

    if correct == total {
        GradingVerdict::passed("Every item is in the right place!")
    } else {
        GradingVerdict::failed(
            percent(correct, total),
            format!("{} of {} zones are correct.", correct, total),
        )
    }
}
