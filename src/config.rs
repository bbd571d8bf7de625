//! Application configuration constants.
//!
//! This module centralizes all configurable values that were previously
//! hardcoded throughout the codebase.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Database Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml
    if let Ok(contents) = std::fs::read_to_string("config.toml") {
        if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
            if let Some(db) = config.database {
                if let Some(path) = db.path {
                    tracing::info!("Using database from config.toml: {}", path);
                    return PathBuf::from(path);
                }
            }
        }
    }

    // Priority 2: .env DATABASE_PATH
    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    // Default
    let default = PathBuf::from(crate::paths::db_path());
    tracing::info!("Using default database path: {}", default.display());
    default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port (override with PORT env var)
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Get the server port (PORT env var or default)
pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_SERVER_PORT)
}

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, server_port())
}

// ==================== Exam Configuration ====================

/// Per-subject exam sizing: question count and time limit for full exam
/// mode. Subjects with fewer stored questions than the target get all
/// available.
pub struct ExamProfile {
    pub subject: &'static str,
    pub question_count: usize,
    pub time_minutes: i64,
}

/// All exam profile definitions
pub const EXAM_PROFILES: [ExamProfile; 5] = [
    ExamProfile {
        subject: "Biology",
        question_count: 100,
        time_minutes: 120,
    },
    ExamProfile {
        subject: "Chemistry",
        question_count: 80,
        time_minutes: 120,
    },
    ExamProfile {
        subject: "Mathematics",
        question_count: 60,
        time_minutes: 180,
    },
    ExamProfile {
        subject: "Physics",
        question_count: 60,
        time_minutes: 120,
    },
    ExamProfile {
        subject: "English",
        question_count: 100,
        time_minutes: 120,
    },
];

/// Fallback exam size for subjects without a profile
pub const DEFAULT_EXAM_QUESTION_COUNT: usize = 60;

/// Fallback exam time limit in minutes
pub const DEFAULT_EXAM_TIME_MINUTES: i64 = 120;

/// Get exam profile by subject name (case-insensitive)
pub fn get_exam_profile(subject: &str) -> Option<&'static ExamProfile> {
    EXAM_PROFILES
        .iter()
        .find(|p| p.subject.eq_ignore_ascii_case(subject.trim()))
}

/// Get exam question count for a subject
pub fn exam_question_count(subject: &str) -> usize {
    get_exam_profile(subject)
        .map(|p| p.question_count)
        .unwrap_or(DEFAULT_EXAM_QUESTION_COUNT)
}

/// Get exam time limit in minutes for a subject
pub fn exam_time_minutes(subject: &str) -> i64 {
    get_exam_profile(subject)
        .map(|p| p.time_minutes)
        .unwrap_or(DEFAULT_EXAM_TIME_MINUTES)
}

// ==================== Practice Configuration ====================

/// Questions served per quick practice session
pub const QUESTIONS_PER_SESSION: usize = 10;

/// Practice draws a candidate pool this many times the session size,
/// then samples down to QUESTIONS_PER_SESSION
pub const PRACTICE_POOL_FACTOR: usize = 3;

/// Grades the service accepts
pub const GRADES: [i64; 4] = [9, 10, 11, 12];

// ==================== Streak Configuration ====================

/// Session dates returned for the streak calendar (distinct dates drawn
/// from this many most-recent session rows)
pub const SESSION_DATES_LIMIT: usize = 28;

/// Bounded retries for the conditional streak update when concurrent
/// logs for the same user collide
pub const STREAK_WRITE_ATTEMPTS: usize = 3;
