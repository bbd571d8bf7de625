//! Append-only session log

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::NewSession;

pub fn insert_session(conn: &Connection, session: &NewSession) -> Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        r#"
    INSERT INTO sessions (user_id, subject_id, score, total, session_date, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
        params![
            session.user_id,
            session.subject_id,
            session.score,
            session.total,
            session.session_date.to_string(),
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Distinct session dates drawn from the `limit` most recent rows for a
/// user, newest first. Multiple sessions on one day collapse to one date.
pub fn recent_session_dates(
    conn: &Connection,
    user_id: &str,
    limit: usize,
) -> Result<Vec<NaiveDate>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT DISTINCT session_date FROM (
        SELECT session_date FROM sessions
        WHERE user_id = ?1
        ORDER BY session_date DESC, id DESC
        LIMIT ?2
    )
    ORDER BY session_date DESC
    "#,
    )?;

    let dates = stmt
        .query_map(params![user_id, limit as i64], |row| {
            row.get::<_, String>(0)
        })?
        .filter_map(|r| r.ok())
        .filter_map(|s| super::profiles::parse_iso_date(&s))
        .collect();

    Ok(dates)
}

/// Count of session rows for a user
pub fn count_sessions(conn: &Connection, user_id: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM sessions WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
}
