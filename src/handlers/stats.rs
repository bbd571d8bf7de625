//! Progress statistics endpoint.
//!
//! Read-only aggregates for the dashboard and profile views. Storage
//! faults degrade to zeroed totals rather than an error page; the numbers
//! simply read as "no activity yet".

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::json;

use crate::db::{self, try_lock, DbPool, LogOnError};

/// GET /api/users/{id}/stats
pub async fn user_stats(
    State(pool): State<DbPool>,
    Path(user_id): Path<String>,
) -> Json<serde_json::Value> {
    let (totals, subjects) = match try_lock(&pool) {
        Ok(conn) => (
            db::get_user_totals(&conn, &user_id).log_warn_default("Failed to load user totals"),
            db::get_subject_stats(&conn, &user_id)
                .log_warn_default("Failed to load subject stats"),
        ),
        Err(_) => Default::default(),
    };
    let (total_attempts, correct_attempts, total_sessions) = totals;

    let accuracy = if total_attempts > 0 {
        correct_attempts as f64 / total_attempts as f64
    } else {
        0.0
    };

    let subjects: Vec<serde_json::Value> = subjects
        .iter()
        .map(|s| {
            json!({
                "subject_id": s.subject_id,
                "name": s.name,
                "grade": s.grade,
                "sessions": s.sessions,
                "questions_answered": s.questions_answered,
                "correct_answers": s.correct_answers,
                "accuracy": s.accuracy(),
            })
        })
        .collect();

    Json(json!({
        "total_attempts": total_attempts,
        "correct_attempts": correct_attempts,
        "total_sessions": total_sessions,
        "accuracy": accuracy,
        "subjects": subjects,
    }))
}
