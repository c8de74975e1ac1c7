//! Grading endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// POST /api/grade
pub async fn grade(
    State(state): State<AppState>,
    Json(req): Json<GradeRequest>,
) -> Result<Json<GradeResponse>> {
    let verdict =
        lesson_core::grade(&req.component, &req.submission, state.executor.as_ref()).await?;
    tracing::info!(
        kind = %req.component.kind(),
        score = verdict.score,
        valid = verdict.is_valid,
        "graded submission"
    );
    Ok(Json(GradeResponse::now(verdict)))
}
