//! Per-user progress statistics

use rusqlite::{params, Connection, Result};
use serde::Serialize;

/// Accuracy and volume for one subject
#[derive(Debug, Clone, Serialize)]
pub struct SubjectStats {
    pub subject_id: i64,
    pub name: String,
    pub grade: i64,
    pub sessions: i64,
    pub questions_answered: i64,
    pub correct_answers: i64,
}

impl SubjectStats {
    pub fn accuracy(&self) -> f64 {
        if self.questions_answered > 0 {
            self.correct_answers as f64 / self.questions_answered as f64
        } else {
            0.0
        }
    }
}

/// Lifetime (attempts, correct, sessions) counts for a user
pub fn get_user_totals(conn: &Connection, user_id: &str) -> Result<(i64, i64, i64)> {
    let (attempts, correct) = super::attempts::attempt_totals(conn, user_id)?;
    let sessions = super::sessions::count_sessions(conn, user_id)?;
    Ok((attempts, correct, sessions))
}

/// Per-subject activity for a user, covering every subject the user has
/// touched through sessions or attempts.
pub fn get_subject_stats(conn: &Connection, user_id: &str) -> Result<Vec<SubjectStats>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT s.id, s.name, s.grade,
           (SELECT COUNT(*) FROM sessions se
            WHERE se.user_id = ?1 AND se.subject_id = s.id),
           (SELECT COUNT(*) FROM attempts a
            JOIN questions q ON a.question_id = q.id
            WHERE a.user_id = ?1 AND q.subject_id = s.id),
           (SELECT COUNT(*) FROM attempts a
            JOIN questions q ON a.question_id = q.id
            WHERE a.user_id = ?1 AND q.subject_id = s.id AND a.is_correct = 1)
    FROM subjects s
    ORDER BY s.grade, s.name
    "#,
    )?;

    let stats = stmt
        .query_map(params![user_id], |row| {
            Ok(SubjectStats {
                subject_id: row.get(0)?,
                name: row.get(1)?,
                grade: row.get(2)?,
                sessions: row.get(3)?,
                questions_answered: row.get(4)?,
                correct_answers: row.get(5)?,
            })
        })?
        .filter_map(|r| r.ok())
        .filter(|s: &SubjectStats| s.sessions > 0 || s.questions_answered > 0)
        .collect();

    Ok(stats)
}
