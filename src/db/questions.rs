//! Question bank queries

use rusqlite::{params, Connection, Result};

use crate::domain::{AnswerChoice, Question};

/// A question ready to be stored (id assigned by the database)
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub subject_id: i64,
    pub grade: i64,
    pub year: Option<i64>,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: AnswerChoice,
    pub explanation: Option<String>,
}

pub fn insert_question(conn: &Connection, question: &NewQuestion) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO questions
        (subject_id, grade, year, question_text, option_a, option_b, option_c, option_d,
         correct_answer, explanation)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
    "#,
        params![
            question.subject_id,
            question.grade,
            question.year,
            question.question_text,
            question.option_a,
            question.option_b,
            question.option_c,
            question.option_d,
            question.correct_answer.as_str(),
            question.explanation,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_question(conn: &Connection, question_id: i64) -> Result<Option<Question>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, subject_id, grade, year, question_text, option_a, option_b, option_c, option_d,
           correct_answer, explanation
    FROM questions
    WHERE id = ?1
    "#,
    )?;

    let result = stmt.query_row(params![question_id], row_to_question);
    match result {
        Ok(question) => Ok(Some(question)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Candidate questions for a subject and grade, optionally restricted to one
/// exam year. The caller samples from this pool; no ordering is promised.
pub fn questions_for(
    conn: &Connection,
    subject_id: i64,
    grade: i64,
    year: Option<i64>,
    limit: usize,
) -> Result<Vec<Question>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, subject_id, grade, year, question_text, option_a, option_b, option_c, option_d,
           correct_answer, explanation
    FROM questions
    WHERE subject_id = ?1 AND grade = ?2 AND (?3 IS NULL OR year = ?3)
    LIMIT ?4
    "#,
    )?;

    let questions = stmt
        .query_map(params![subject_id, grade, year, limit as i64], row_to_question)?
        .filter_map(|r| r.ok())
        .collect();
    Ok(questions)
}

/// Distinct exam years available for a subject and grade, newest first
pub fn available_years(conn: &Connection, subject_id: i64, grade: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT DISTINCT year FROM questions
    WHERE subject_id = ?1 AND grade = ?2 AND year IS NOT NULL
    ORDER BY year DESC
    "#,
    )?;

    let years = stmt
        .query_map(params![subject_id, grade], |row| row.get(0))?
        .filter_map(|r| r.ok())
        .collect();
    Ok(years)
}

fn row_to_question(row: &rusqlite::Row) -> Result<Question> {
    let answer_str: String = row.get(9)?;

    Ok(Question {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        grade: row.get(2)?,
        year: row.get(3)?,
        question_text: row.get(4)?,
        option_a: row.get(5)?,
        option_b: row.get(6)?,
        option_c: row.get(7)?,
        option_d: row.get(8)?,
        correct_answer: AnswerChoice::from_str(&answer_str).unwrap_or(AnswerChoice::A),
        explanation: row.get(10)?,
    })
}
