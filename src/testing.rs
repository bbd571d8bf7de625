//! Test utilities for database setup.
//!
//! Provides helpers that reuse authoritative schema initialization,
//! eliminating schema duplication in test code.

use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

/// Test environment with a database initialized through the authoritative
/// migrations. The temporary directory is kept alive for the lifetime of
/// the environment and cleaned up on drop.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Database connection with the full schema applied
    pub conn: Connection,
}

impl TestEnv {
    /// Create a test environment with an empty, fully migrated database.
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let db_path = temp.path().join("exam_prep.db");
        let conn = Connection::open(&db_path)?;
        crate::db::schema::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }

    /// Like [`new`](Self::new) with the subject catalog seeded, for tests
    /// that reference subject rows.
    pub fn with_subjects() -> rusqlite::Result<Self> {
        let env = Self::new()?;
        crate::db::seed_subjects(&env.conn)?;
        Ok(env)
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }
}

/// A plausible multiple-choice question for seeding test databases.
pub fn sample_question(subject_id: i64, grade: i64, year: Option<i64>) -> crate::db::NewQuestion {
    crate::db::NewQuestion {
        subject_id,
        grade,
        year,
        question_text: "Which organelle produces ATP?".to_string(),
        option_a: "Nucleus".to_string(),
        option_b: "Mitochondrion".to_string(),
        option_c: "Ribosome".to_string(),
        option_d: "Golgi body".to_string(),
        correct_answer: crate::domain::AnswerChoice::B,
        explanation: Some("Cellular respiration happens in mitochondria.".to_string()),
    }
}
