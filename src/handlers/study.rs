//! Subject catalog, question sets, and exam sizing.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::json;

use crate::config;
use crate::db::{self, try_lock, DbPool, LogOnError};
use crate::domain::Question;

use super::{db_error, error_response};

/// How a question set will be used; controls pool size and sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    Practice,
    Exam,
    Learn,
}

impl StudyMode {
    /// Exam and learn modes run the full per-subject exam size
    fn is_full(self) -> bool {
        matches!(self, Self::Exam | Self::Learn)
    }
}

/// GET /api/subjects
pub async fn list_subjects(State(pool): State<DbPool>) -> Response {
    let conn = match try_lock(&pool) {
        Ok(conn) => conn,
        Err(_) => return db_error(),
    };

    match db::get_all_subjects(&conn) {
        Ok(subjects) => Json(subjects).into_response(),
        Err(e) => {
            tracing::warn!("Failed to list subjects: {}", e);
            db_error()
        }
    }
}

#[derive(Deserialize)]
pub struct QuestionQuery {
    pub subject_id: i64,
    pub grade: i64,
    pub year: Option<i64>,
    pub mode: Option<StudyMode>,
}

/// GET /api/questions
///
/// Serves a randomized question set. Practice mode samples 10 questions
/// from a 30-question pool; exam and learn modes serve up to the subject's
/// configured exam size. Fewer stored questions than the target means the
/// whole pool is returned.
pub async fn questions(
    State(pool): State<DbPool>,
    Query(query): Query<QuestionQuery>,
) -> Response {
    let mode = query.mode.unwrap_or(StudyMode::Practice);

    let (mut candidates, exam_count) = {
        let conn = match try_lock(&pool) {
            Ok(conn) => conn,
            Err(_) => return db_error(),
        };

        let subject = match db::get_subject(&conn, query.subject_id) {
            Ok(Some(subject)) => subject,
            Ok(None) => return error_response(StatusCode::NOT_FOUND, "Subject not found"),
            Err(e) => {
                tracing::warn!("Failed to load subject {}: {}", query.subject_id, e);
                return db_error();
            }
        };

        let exam_count = config::exam_question_count(&subject.name);
        let pool_size = if mode.is_full() {
            exam_count
        } else {
            config::QUESTIONS_PER_SESSION * config::PRACTICE_POOL_FACTOR
        };

        let candidates = match db::questions_for(
            &conn,
            query.subject_id,
            query.grade,
            query.year,
            pool_size,
        ) {
            Ok(questions) => questions,
            Err(e) => {
                tracing::warn!("Failed to load questions: {}", e);
                return db_error();
            }
        };
        (candidates, exam_count)
    };

    let take = if mode.is_full() {
        exam_count.min(candidates.len())
    } else {
        config::QUESTIONS_PER_SESSION.min(candidates.len())
    };

    let mut rng = rand::rng();
    candidates.shuffle(&mut rng);
    candidates.truncate(take);

    Json::<Vec<Question>>(candidates).into_response()
}

#[derive(Deserialize)]
pub struct YearQuery {
    pub subject_id: i64,
    pub grade: i64,
}

/// GET /api/questions/years
///
/// Degrades to an empty list on storage faults; the year picker simply
/// offers no filter.
pub async fn question_years(
    State(pool): State<DbPool>,
    Query(query): Query<YearQuery>,
) -> Json<Vec<i64>> {
    let years = match try_lock(&pool) {
        Ok(conn) => db::available_years(&conn, query.subject_id, query.grade)
            .log_warn_default("Failed to list question years"),
        Err(_) => Vec::new(),
    };
    Json(years)
}

#[derive(Deserialize)]
pub struct ExamConfigQuery {
    pub subject: String,
}

/// GET /api/exam-config
pub async fn exam_config(Query(query): Query<ExamConfigQuery>) -> Json<serde_json::Value> {
    Json(json!({
        "subject": query.subject,
        "question_count": config::exam_question_count(&query.subject),
        "time_minutes": config::exam_time_minutes(&query.subject),
    }))
}
