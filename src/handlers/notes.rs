//! Study notes endpoints.
//!
//! Content arrives ready-made in the request body; whether it came from an
//! AI provider is recorded but not acted on here.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::db::{self, try_lock, DbPool};
use crate::validation;

use super::{db_error, error_response};

#[derive(Deserialize)]
pub struct CreateNoteRequest {
    pub subject: String,
    pub grade: i64,
    pub topic: String,
    pub content: String,
    #[serde(default)]
    pub is_ai_generated: bool,
}

/// POST /api/notes
pub async fn create(State(pool): State<DbPool>, Json(req): Json<CreateNoteRequest>) -> Response {
    if !validation::is_supported_grade(req.grade) {
        return error_response(StatusCode::BAD_REQUEST, "Grade must be 9, 10, 11, or 12");
    }
    let Some(topic) = validation::normalize_topic(&req.topic) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing subject, grade, or topic");
    };
    if req.content.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Note content is required");
    }

    let conn = match try_lock(&pool) {
        Ok(conn) => conn,
        Err(_) => return db_error(),
    };

    let subject = match db::get_subject_by_name(&conn, &req.subject, req.grade) {
        Ok(Some(subject)) => subject,
        Ok(None) => {
            return error_response(StatusCode::NOT_FOUND, "Subject not found for this grade")
        }
        Err(e) => {
            tracing::warn!("Failed to resolve subject {}: {}", req.subject, e);
            return db_error();
        }
    };

    match db::insert_note(
        &conn,
        subject.id,
        req.grade,
        &topic,
        &req.content,
        req.is_ai_generated,
    ) {
        Ok(id) => Json(json!({ "id": id, "content": req.content })).into_response(),
        Err(e) => {
            tracing::warn!("Failed to save note for subject {}: {}", subject.id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save notes")
        }
    }
}

#[derive(Deserialize)]
pub struct NoteQuery {
    pub subject_id: Option<i64>,
    pub grade: Option<i64>,
    pub topic: Option<String>,
}

/// GET /api/notes
pub async fn list(State(pool): State<DbPool>, Query(query): Query<NoteQuery>) -> Response {
    let conn = match try_lock(&pool) {
        Ok(conn) => conn,
        Err(_) => return db_error(),
    };

    match db::list_notes(&conn, query.subject_id, query.grade, query.topic.as_deref()) {
        Ok(notes) => Json(notes).into_response(),
        Err(e) => {
            tracing::warn!("Failed to list notes: {}", e);
            db_error()
        }
    }
}
