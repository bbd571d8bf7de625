//! Subject catalog queries

use rusqlite::{params, Connection, Result};

use crate::domain::Subject;

pub fn insert_subject(conn: &Connection, name: &str, grade: i64) -> Result<i64> {
    conn.execute(
        "INSERT INTO subjects (name, grade) VALUES (?1, ?2)",
        params![name, grade],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All subjects, ordered for display
pub fn get_all_subjects(conn: &Connection) -> Result<Vec<Subject>> {
    let mut stmt = conn.prepare("SELECT id, name, grade FROM subjects ORDER BY grade, name")?;
    let subjects = stmt
        .query_map([], row_to_subject)?
        .filter_map(|r| r.ok())
        .collect();
    Ok(subjects)
}

pub fn get_subject(conn: &Connection, subject_id: i64) -> Result<Option<Subject>> {
    let result = conn.query_row(
        "SELECT id, name, grade FROM subjects WHERE id = ?1",
        params![subject_id],
        row_to_subject,
    );
    match result {
        Ok(subject) => Ok(Some(subject)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Resolve a subject by display name and grade (name match is
/// case-insensitive, the way clients send it)
pub fn get_subject_by_name(conn: &Connection, name: &str, grade: i64) -> Result<Option<Subject>> {
    let result = conn.query_row(
        "SELECT id, name, grade FROM subjects WHERE LOWER(name) = LOWER(?1) AND grade = ?2",
        params![name.trim(), grade],
        row_to_subject,
    );
    match result {
        Ok(subject) => Ok(Some(subject)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

fn row_to_subject(row: &rusqlite::Row) -> Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        name: row.get(1)?,
        grade: row.get(2)?,
    })
}
