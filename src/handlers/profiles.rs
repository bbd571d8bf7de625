//! Profile endpoints.
//!
//! Profile rows are created here when the external auth system provisions
//! an account; only the personal fields are writable afterwards. Streak
//! columns change exclusively through the session-logging path.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

use crate::db::{self, try_lock, DbPool};
use crate::validation;

use super::{db_error, error_response};

#[derive(Deserialize)]
pub struct CreateProfileRequest {
    pub id: String,
}

/// POST /api/profiles
pub async fn create(
    State(pool): State<DbPool>,
    Json(req): Json<CreateProfileRequest>,
) -> Response {
    if req.id.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Profile id is required");
    }

    let conn = match try_lock(&pool) {
        Ok(conn) => conn,
        Err(_) => return db_error(),
    };

    match db::create_profile(&conn, &req.id) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            error_response(StatusCode::CONFLICT, "Profile already exists")
        }
        Err(e) => {
            tracing::warn!("Failed to create profile {}: {}", req.id, e);
            db_error()
        }
    }
}

/// GET /api/profiles/{id}
pub async fn show(State(pool): State<DbPool>, Path(user_id): Path<String>) -> Response {
    let conn = match try_lock(&pool) {
        Ok(conn) => conn,
        Err(_) => return db_error(),
    };

    match db::get_profile(&conn, &user_id) {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Profile not found"),
        Err(e) => {
            tracing::warn!("Failed to load profile {}: {}", user_id, e);
            db_error()
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub school_name: Option<String>,
    pub grade: Option<i64>,
}

/// PUT /api/profiles/{id}
pub async fn update(
    State(pool): State<DbPool>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> Response {
    if let Some(grade) = req.grade {
        if !validation::is_supported_grade(grade) {
            return error_response(StatusCode::BAD_REQUEST, "Grade must be 9, 10, 11, or 12");
        }
    }

    let conn = match try_lock(&pool) {
        Ok(conn) => conn,
        Err(_) => return db_error(),
    };

    match db::update_personal_info(
        &conn,
        &user_id,
        req.full_name.as_deref().filter(|s| !s.trim().is_empty()),
        req.school_name.as_deref().filter(|s| !s.trim().is_empty()),
        req.grade,
    ) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Profile not found"),
        Err(e) => {
            tracing::warn!("Failed to update profile {}: {}", user_id, e);
            db_error()
        }
    }
}
