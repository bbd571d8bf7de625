//! Flashcard set endpoints.
//!
//! A chapter's set is generated at most once: posting cards for a chapter
//! that already has rows returns the stored set untouched, so repeated
//! generation requests stay cheap and deterministic.

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
pub struct FlashcardPair {
    pub front: String,
    pub back: String,
}

#[derive(Deserialize)]
pub struct CreateFlashcardsRequest {
    pub subject: String,
    pub grade: i64,
    /// Chapter/topic label the set is filed under
    pub topic: String,
    pub cards: Vec<FlashcardPair>,
    #[serde(default)]
    pub is_ai_generated: bool,
}

/// POST /api/flashcards
pub async fn create(
    State(pool): State<DbPool>,
    Json(req): Json<CreateFlashcardsRequest>,
) -> Response {
    if !validation::is_supported_grade(req.grade) {
        return error_response(StatusCode::BAD_REQUEST, "Grade must be 9, 10, 11, or 12");
    }
    let Some(topic) = validation::normalize_topic(&req.topic) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing subject, grade, or topic");
    };

    // Drop pairs with a blank side rather than storing half a card
    let pairs: Vec<(String, String)> = req
        .cards
        .iter()
        .filter(|c| !c.front.trim().is_empty() && !c.back.trim().is_empty())
        .map(|c| (c.front.trim().to_string(), c.back.trim().to_string()))
        .collect();
    if pairs.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No valid flashcards in request");
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

    // Existing set wins; the request's cards are ignored
    match db::flashcards_for_set(&conn, subject.id, req.grade, &topic) {
        Ok(existing) if !existing.is_empty() => {
            return Json(json!({ "flashcards": existing })).into_response();
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!("Failed to check existing flashcards: {}", e);
            return db_error();
        }
    }

    if let Err(e) = db::insert_flashcards(
        &conn,
        subject.id,
        req.grade,
        &topic,
        &pairs,
        req.is_ai_generated,
    ) {
        tracing::warn!("Failed to save flashcards for subject {}: {}", subject.id, e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save flashcards");
    }

    match db::flashcards_for_set(&conn, subject.id, req.grade, &topic) {
        Ok(cards) => Json(json!({ "flashcards": cards })).into_response(),
        Err(e) => {
            tracing::warn!("Failed to read back flashcards: {}", e);
            db_error()
        }
    }
}

#[derive(Deserialize)]
pub struct FlashcardQuery {
    pub subject_id: i64,
    pub grade: i64,
    pub topic: String,
}

/// GET /api/flashcards
pub async fn list(State(pool): State<DbPool>, Query(query): Query<FlashcardQuery>) -> Response {
    let conn = match try_lock(&pool) {
        Ok(conn) => conn,
        Err(_) => return db_error(),
    };

    match db::flashcards_for_set(&conn, query.subject_id, query.grade, &query.topic) {
        Ok(cards) => Json(json!({ "flashcards": cards })).into_response(),
        Err(e) => {
            tracing::warn!("Failed to list flashcards: {}", e);
            db_error()
        }
    }
}
