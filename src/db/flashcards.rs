//! Flashcard storage. Cards belong to a (subject, grade, chapter) set.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::Flashcard;

/// Existing cards for a chapter set, newest first. An empty result means
/// the set has never been generated.
pub fn flashcards_for_set(
    conn: &Connection,
    subject_id: i64,
    grade: i64,
    chapter: &str,
) -> Result<Vec<Flashcard>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, subject_id, grade, chapter, front, back, is_ai_generated, created_at
    FROM flashcards
    WHERE subject_id = ?1 AND grade = ?2 AND chapter = ?3
    ORDER BY created_at DESC, id DESC
    "#,
    )?;

    let cards = stmt
        .query_map(params![subject_id, grade, chapter], row_to_flashcard)?
        .filter_map(|r| r.ok())
        .collect();
    Ok(cards)
}

/// Insert a batch of front/back pairs into a chapter set, returning how many
/// rows were written.
pub fn insert_flashcards(
    conn: &Connection,
    subject_id: i64,
    grade: i64,
    chapter: &str,
    pairs: &[(String, String)],
    is_ai_generated: bool,
) -> Result<usize> {
    let now = Utc::now().to_rfc3339();
    let mut stmt = conn.prepare(
        r#"
    INSERT INTO flashcards (subject_id, grade, chapter, front, back, is_ai_generated, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#,
    )?;

    let mut inserted = 0;
    for (front, back) in pairs {
        stmt.execute(params![
            subject_id,
            grade,
            chapter,
            front,
            back,
            if is_ai_generated { 1 } else { 0 },
            now,
        ])?;
        inserted += 1;
    }
    Ok(inserted)
}

fn row_to_flashcard(row: &rusqlite::Row) -> Result<Flashcard> {
    let is_ai: i64 = row.get(6)?;
    let created_at_str: String = row.get(7)?;

    Ok(Flashcard {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        grade: row.get(2)?,
        chapter: row.get(3)?,
        front: row.get(4)?,
        back: row.get(5)?,
        is_ai_generated: is_ai != 0,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
