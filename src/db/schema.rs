//! Database schema with version-gated migrations.
//!
//! Each migration:
//! 1. Checks if the current schema version is less than the target version
//! 2. Runs the migration SQL
//! 3. Records the new version in the `db_version` table
//!
//! Migrations only run once - the version check ensures idempotency. New
//! databases run all migrations in order and land on the latest version.

use chrono::Utc;
use rusqlite::{params, Connection, Result};

/// Current schema version
/// Increment this when adding a new migration
pub const DB_VERSION: i32 = 3;

/// Initialize the database schema with version-gated migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Bootstrap: ensure db_version table exists (needed to check version)
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS db_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL,
            description TEXT
        );
        "#,
    )?;

    let current_version = get_schema_version(conn)?;
    tracing::debug!("Schema version: {}", current_version);

    // Run migrations in order, each checks version before executing
    if current_version < 1 {
        migrate_v0_to_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v1_to_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v2_to_v3(conn)?;
    }

    Ok(())
}

// ============================================================
// VERSION-GATED MIGRATIONS
// Each migration runs exactly once based on version check
// ============================================================

/// v0→v1: Create base tables (profiles, subjects, questions, attempts, sessions)
fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v0→v1: Create base tables");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            full_name TEXT,
            school_name TEXT,
            grade INTEGER,
            current_streak INTEGER NOT NULL DEFAULT 0,
            last_session_date TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS subjects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            grade INTEGER NOT NULL,
            UNIQUE (name, grade)
        );

        CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id INTEGER NOT NULL,
            grade INTEGER NOT NULL,
            year INTEGER,
            question_text TEXT NOT NULL,
            option_a TEXT NOT NULL,
            option_b TEXT NOT NULL,
            option_c TEXT NOT NULL,
            option_d TEXT NOT NULL,
            correct_answer TEXT NOT NULL,
            FOREIGN KEY (subject_id) REFERENCES subjects(id)
        );

        CREATE TABLE IF NOT EXISTS attempts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            question_id INTEGER NOT NULL,
            selected_answer TEXT NOT NULL,
            is_correct INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (question_id) REFERENCES questions(id)
        );

        CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            subject_id INTEGER NOT NULL,
            score INTEGER NOT NULL,
            total INTEGER NOT NULL,
            session_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (subject_id) REFERENCES subjects(id)
        );

        CREATE INDEX IF NOT EXISTS idx_questions_subject_grade ON questions(subject_id, grade);
        CREATE INDEX IF NOT EXISTS idx_attempts_user_id ON attempts(user_id);
        CREATE INDEX IF NOT EXISTS idx_sessions_user_date ON sessions(user_id, session_date);
        "#,
    )?;

    record_version(conn, 1, "Create base tables (profiles, subjects, questions, attempts, sessions)")?;
    Ok(())
}

/// v1→v2: Add study material tables (notes, flashcards)
fn migrate_v1_to_v2(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v1→v2: Add notes and flashcards");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id INTEGER NOT NULL,
            grade INTEGER NOT NULL,
            topic TEXT NOT NULL,
            content TEXT NOT NULL,
            is_ai_generated INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            FOREIGN KEY (subject_id) REFERENCES subjects(id)
        );

        CREATE TABLE IF NOT EXISTS flashcards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id INTEGER NOT NULL,
            grade INTEGER NOT NULL,
            chapter TEXT NOT NULL,
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            is_ai_generated INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            FOREIGN KEY (subject_id) REFERENCES subjects(id)
        );

        CREATE INDEX IF NOT EXISTS idx_notes_subject_grade ON notes(subject_id, grade);
        CREATE INDEX IF NOT EXISTS idx_flashcards_set ON flashcards(subject_id, grade, chapter);
        "#,
    )?;

    record_version(conn, 2, "Add study material tables (notes, flashcards)")?;
    Ok(())
}

/// v2→v3: Add question explanations and a year filter index
fn migrate_v2_to_v3(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v2→v3: Add question explanations");

    add_column_if_missing(conn, "questions", "explanation", "TEXT")?;

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_questions_year ON questions(subject_id, grade, year);",
    )?;

    record_version(conn, 3, "Add question explanations and year index")?;
    Ok(())
}

// ============================================================
// MIGRATION HELPERS
// ============================================================

/// Record a schema version after successful migration
fn record_version(conn: &Connection, version: i32, description: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO db_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        params![version, now, description],
    )?;
    tracing::info!("Recorded schema version {} - {}", version, description);
    Ok(())
}

/// Get current schema version (0 if no versions recorded)
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM db_version",
        [],
        |row| row.get(0),
    )
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    conn.prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
        .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    column_def: &str,
) -> Result<()> {
    if !column_exists(conn, table, column) {
        conn.execute(
            &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
            [],
        )?;
    }
    Ok(())
}
