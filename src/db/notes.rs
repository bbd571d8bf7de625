//! Study notes storage

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::Note;

pub fn insert_note(
    conn: &Connection,
    subject_id: i64,
    grade: i64,
    topic: &str,
    content: &str,
    is_ai_generated: bool,
) -> Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        r#"
    INSERT INTO notes (subject_id, grade, topic, content, is_ai_generated, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
        params![
            subject_id,
            grade,
            topic,
            content,
            if is_ai_generated { 1 } else { 0 },
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Notes matching the given filters (any may be absent), newest first
pub fn list_notes(
    conn: &Connection,
    subject_id: Option<i64>,
    grade: Option<i64>,
    topic: Option<&str>,
) -> Result<Vec<Note>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, subject_id, grade, topic, content, is_ai_generated, created_at
    FROM notes
    WHERE (?1 IS NULL OR subject_id = ?1)
      AND (?2 IS NULL OR grade = ?2)
      AND (?3 IS NULL OR topic = ?3)
    ORDER BY created_at DESC, id DESC
    "#,
    )?;

    let notes = stmt
        .query_map(params![subject_id, grade, topic], row_to_note)?
        .filter_map(|r| r.ok())
        .collect();
    Ok(notes)
}

fn row_to_note(row: &rusqlite::Row) -> Result<Note> {
    let is_ai: i64 = row.get(5)?;
    let created_at_str: String = row.get(6)?;

    Ok(Note {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        grade: row.get(2)?,
        topic: row.get(3)?,
        content: row.get(4)?,
        is_ai_generated: is_ai != 0,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
