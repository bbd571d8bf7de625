//! Session logging and the streak calendar feed.
//!
//! `POST /api/sessions` is fire-and-forget: once the payload validates, the
//! caller sees 204 regardless of how the writes fare. A failed streak update
//! shows up only as the number not advancing on the next profile read.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

use crate::db::{DbPool, SqliteStreakStore};
use crate::streak::StreakTracker;
use crate::validation;

use super::error_response;

#[derive(Deserialize)]
pub struct LogSessionRequest {
    pub user_id: String,
    pub subject_id: i64,
    pub score: i64,
    pub total: i64,
}

fn tracker(pool: DbPool) -> StreakTracker<SqliteStreakStore, SqliteStreakStore> {
    let store = SqliteStreakStore::new(pool);
    StreakTracker::new(store.clone(), store)
}

/// POST /api/sessions
pub async fn log_session(
    State(pool): State<DbPool>,
    Json(req): Json<LogSessionRequest>,
) -> Response {
    if let Err(message) = validation::validate_session_score(req.score, req.total) {
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    tracker(pool).log_session(&req.user_id, req.subject_id, req.score, req.total);
    StatusCode::NO_CONTENT.into_response()
}

/// GET /api/users/{id}/session-dates
pub async fn session_dates(
    State(pool): State<DbPool>,
    Path(user_id): Path<String>,
) -> Json<Vec<String>> {
    let dates = tracker(pool)
        .session_dates(&user_id)
        .iter()
        .map(ToString::to_string)
        .collect();
    Json(dates)
}
