//! Per-question attempt logging

use chrono::Utc;
use rusqlite::{params, Connection, Result};

use crate::domain::AnswerChoice;

pub fn insert_attempt(
    conn: &Connection,
    user_id: &str,
    question_id: i64,
    selected_answer: AnswerChoice,
    is_correct: bool,
) -> Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        r#"
    INSERT INTO attempts (user_id, question_id, selected_answer, is_correct, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
        params![
            user_id,
            question_id,
            selected_answer.as_str(),
            if is_correct { 1 } else { 0 },
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Lifetime (total, correct) attempt counts for a user
pub fn attempt_totals(conn: &Connection, user_id: &str) -> Result<(i64, i64)> {
    conn.query_row(
        r#"
    SELECT COUNT(*), COALESCE(SUM(is_correct), 0)
    FROM attempts
    WHERE user_id = ?1
    "#,
        params![user_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
}
