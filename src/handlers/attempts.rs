//! Per-question answer submission, graded against the stored answer.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::db::{self, try_lock, DbPool};
use crate::domain::AnswerChoice;

use super::{db_error, error_response};

#[derive(Deserialize)]
pub struct SubmitAttemptRequest {
    pub user_id: String,
    pub question_id: i64,
    /// Answer letter A-D
    pub selected_answer: String,
}

/// POST /api/attempts
pub async fn submit(
    State(pool): State<DbPool>,
    Json(req): Json<SubmitAttemptRequest>,
) -> Response {
    let Some(selected) = AnswerChoice::from_str(&req.selected_answer) else {
        return error_response(StatusCode::BAD_REQUEST, "selected_answer must be A, B, C or D");
    };

    let conn = match try_lock(&pool) {
        Ok(conn) => conn,
        Err(_) => return db_error(),
    };

    let question = match db::get_question(&conn, req.question_id) {
        Ok(Some(question)) => question,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Question not found"),
        Err(e) => {
            tracing::warn!("Failed to load question {}: {}", req.question_id, e);
            return db_error();
        }
    };

    let is_correct = question.correct_answer == selected;
    if let Err(e) = db::insert_attempt(&conn, &req.user_id, req.question_id, selected, is_correct)
    {
        tracing::warn!(
            "Failed to record attempt for user {} on question {}: {}",
            req.user_id,
            req.question_id,
            e
        );
        return db_error();
    }

    Json(json!({
        "correct": is_correct,
        "correct_answer": question.correct_answer.as_str(),
        "explanation": question.explanation,
    }))
    .into_response()
}
