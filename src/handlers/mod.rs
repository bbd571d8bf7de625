//! JSON API handlers and the application router.

pub mod attempts;
pub mod flashcards;
pub mod notes;
pub mod profiles;
pub mod sessions;
pub mod stats;
pub mod study;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::db::DbPool;

/// Build the application router over a shared connection pool.
pub fn router(pool: DbPool) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/profiles", post(profiles::create))
        .route("/api/profiles/{id}", get(profiles::show).put(profiles::update))
        .route("/api/sessions", post(sessions::log_session))
        .route("/api/users/{id}/session-dates", get(sessions::session_dates))
        .route("/api/users/{id}/stats", get(stats::user_stats))
        .route("/api/subjects", get(study::list_subjects))
        .route("/api/questions", get(study::questions))
        .route("/api/questions/years", get(study::question_years))
        .route("/api/exam-config", get(study::exam_config))
        .route("/api/attempts", post(attempts::submit))
        .route("/api/notes", get(notes::list).post(notes::create))
        .route("/api/flashcards", get(flashcards::list).post(flashcards::create))
        .layer(TraceLayer::new_for_http())
        .with_state(pool)
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// JSON error body with the given status, mirroring `{"error": ...}`
/// everywhere so clients have one shape to handle.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// 500 response for an unavailable database
pub(crate) fn db_error() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use axum_test::TestServer;
    use serde_json::Value;
    use tempfile::TempDir;

    fn test_server() -> (TempDir, DbPool, TestServer) {
        let temp = TempDir::new().unwrap();
        let pool = db::init_db(&temp.path().join("exam_prep.db")).unwrap();
        {
            let conn = pool.lock().unwrap();
            db::seed_subjects(&conn).unwrap();
        }
        let server = TestServer::new(router(pool.clone())).unwrap();
        (temp, pool, server)
    }

    fn seed_question(pool: &DbPool, subject_id: i64, grade: i64) -> i64 {
        let conn = pool.lock().unwrap();
        db::insert_question(
            &conn,
            &crate::testing::sample_question(subject_id, grade, Some(2015)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_index_reports_service() {
        let (_temp, _pool, server) = test_server();
        let body: Value = server.get("/").await.json();
        assert_eq!(body["name"], "exam_prep");
    }

    #[tokio::test]
    async fn test_session_flow_advances_streak() {
        let (_temp, _pool, server) = test_server();

        server
            .post("/api/profiles")
            .json(&serde_json::json!({ "id": "user-1" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/sessions")
            .json(&serde_json::json!({
                "user_id": "user-1",
                "subject_id": 1,
                "score": 8,
                "total": 10,
            }))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let profile: Value = server.get("/api/profiles/user-1").await.json();
        assert_eq!(profile["current_streak"], 1);
        assert!(profile["last_session_date"].is_string());

        let dates: Value = server.get("/api/users/user-1/session-dates").await.json();
        assert_eq!(dates.as_array().unwrap().len(), 1);

        // Logging again on the same day neither inflates the streak nor
        // adds a calendar date.
        server
            .post("/api/sessions")
            .json(&serde_json::json!({
                "user_id": "user-1",
                "subject_id": 2,
                "score": 5,
                "total": 10,
            }))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let profile: Value = server.get("/api/profiles/user-1").await.json();
        assert_eq!(profile["current_streak"], 1);
        let dates: Value = server.get("/api/users/user-1/session-dates").await.json();
        assert_eq!(dates.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_session_for_unknown_user_still_returns_success() {
        let (_temp, pool, server) = test_server();

        // Silent policy: the caller cannot tell the profile was missing.
        server
            .post("/api/sessions")
            .json(&serde_json::json!({
                "user_id": "ghost",
                "subject_id": 1,
                "score": 8,
                "total": 10,
            }))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let conn = pool.lock().unwrap();
        assert_eq!(db::count_sessions(&conn, "ghost").unwrap(), 0);
    }

    #[tokio::test]
    async fn test_session_rejects_score_above_total() {
        let (_temp, _pool, server) = test_server();
        server
            .post("/api/sessions")
            .json(&serde_json::json!({
                "user_id": "user-1",
                "subject_id": 1,
                "score": 11,
                "total": 10,
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_attempt_is_graded_server_side() {
        let (_temp, pool, server) = test_server();
        let question_id = seed_question(&pool, 1, 9);

        let body: Value = server
            .post("/api/attempts")
            .json(&serde_json::json!({
                "user_id": "user-1",
                "question_id": question_id,
                "selected_answer": "B",
            }))
            .await
            .json();
        assert_eq!(body["correct"], true);
        assert_eq!(body["correct_answer"], "B");

        let body: Value = server
            .post("/api/attempts")
            .json(&serde_json::json!({
                "user_id": "user-1",
                "question_id": question_id,
                "selected_answer": "C",
            }))
            .await
            .json();
        assert_eq!(body["correct"], false);
    }

    #[tokio::test]
    async fn test_questions_endpoint_samples_practice_set() {
        let (_temp, pool, server) = test_server();
        for _ in 0..25 {
            seed_question(&pool, 1, 9);
        }

        let body: Value = server
            .get("/api/questions")
            .add_query_param("subject_id", 1)
            .add_query_param("grade", 9)
            .add_query_param("mode", "practice")
            .await
            .json();
        assert_eq!(body.as_array().unwrap().len(), crate::config::QUESTIONS_PER_SESSION);
    }

    #[tokio::test]
    async fn test_notes_unknown_subject_is_404() {
        let (_temp, _pool, server) = test_server();
        server
            .post("/api/notes")
            .json(&serde_json::json!({
                "subject": "Geography",
                "grade": 9,
                "topic": "Rivers",
                "content": "...",
            }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_flashcards_return_existing_set() {
        let (_temp, _pool, server) = test_server();

        let first: Value = server
            .post("/api/flashcards")
            .json(&serde_json::json!({
                "subject": "Chemistry",
                "grade": 9,
                "topic": "Atomic structure",
                "cards": [
                    { "front": "What is an atom?", "back": "The smallest unit of an element." },
                ],
            }))
            .await
            .json();
        assert_eq!(first["flashcards"].as_array().unwrap().len(), 1);

        // Posting the same set again returns the stored cards untouched.
        let second: Value = server
            .post("/api/flashcards")
            .json(&serde_json::json!({
                "subject": "Chemistry",
                "grade": 9,
                "topic": "Atomic structure",
                "cards": [
                    { "front": "Other", "back": "Cards" },
                    { "front": "Ignored", "back": "Entirely" },
                ],
            }))
            .await
            .json();
        assert_eq!(second["flashcards"].as_array().unwrap().len(), 1);
    }
}
