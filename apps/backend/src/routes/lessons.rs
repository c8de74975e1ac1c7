//! Lesson endpoints

use axum::{extract::State, Json};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /api/lessons/parse
pub async fn parse(Json(req): Json<ParseRequest>) -> Result<Json<ParsedDocument>> {
    require_content(&req.content)?;
    let document = lesson_core::parse(&req.content);
    tracing::debug!(components = document.components.len(), "parsed lesson");
    Ok(Json(document))
}

/// POST /api/lessons/grade
///
/// Parses the lesson and grades the submission against the named component.
pub async fn grade(
    State(state): State<AppState>,
    Json(req): Json<LessonGradeRequest>,
) -> Result<Json<GradeResponse>> {
    require_content(&req.content)?;
    let document = lesson_core::parse(&req.content);
    let component = document
        .component(&req.component_id)
        .ok_or_else(|| ApiError::NotFound(format!("component {}", req.component_id)))?;

    let verdict =
        lesson_core::grade(&component.data, &req.submission, state.executor.as_ref()).await?;
    Ok(Json(GradeResponse::now(verdict)))
}

fn require_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(ApiError::BadRequest("lesson content is empty".to_string()));
    }
    Ok(())
}
