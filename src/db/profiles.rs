//! Profile rows: personal fields plus the streak columns.
//!
//! The streak columns are written only through `apply_streak_update`, which
//! is conditional on the previously observed `last_session_date` so that two
//! concurrent session logs cannot overwrite each other blindly.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::Profile;
use crate::streak::{StreakState, StreakUpdate};

/// Create a profile row at account creation time (streak 0, no last date).
pub fn create_profile(conn: &Connection, user_id: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO profiles (id, current_streak, created_at) VALUES (?1, 0, ?2)",
        params![user_id, now],
    )?;
    Ok(())
}

/// Get a profile by id
pub fn get_profile(conn: &Connection, user_id: &str) -> Result<Option<Profile>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, full_name, school_name, grade, current_streak, last_session_date, created_at
        FROM profiles
        WHERE id = ?1
        "#,
    )?;

    let result = stmt.query_row(params![user_id], row_to_profile);
    match result {
        Ok(profile) => Ok(Some(profile)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Update the personal fields only; streak columns are never touched here.
/// Returns false when the profile does not exist.
pub fn update_personal_info(
    conn: &Connection,
    user_id: &str,
    full_name: Option<&str>,
    school_name: Option<&str>,
    grade: Option<i64>,
) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE profiles SET full_name = ?1, school_name = ?2, grade = ?3 WHERE id = ?4",
        params![full_name, school_name, grade, user_id],
    )?;
    Ok(changed > 0)
}

/// Read just the streak-bearing columns
pub fn streak_state(conn: &Connection, user_id: &str) -> Result<Option<StreakState>> {
    let mut stmt =
        conn.prepare("SELECT current_streak, last_session_date FROM profiles WHERE id = ?1")?;

    let result = stmt.query_row(params![user_id], |row| {
        let last: Option<String> = row.get(1)?;
        Ok(StreakState {
            current_streak: row.get(0)?,
            last_session_date: last.and_then(|s| parse_iso_date(&s)),
        })
    });
    match result {
        Ok(state) => Ok(Some(state)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Persist a streak update, guarded on the `last_session_date` the caller
/// observed when it read the state. Returns false when the guard fails,
/// i.e. a concurrent writer updated the row in between.
pub fn apply_streak_update(
    conn: &Connection,
    user_id: &str,
    observed: Option<NaiveDate>,
    update: &StreakUpdate,
) -> Result<bool> {
    let changed = match observed {
        Some(date) => conn.execute(
            r#"
            UPDATE profiles
            SET current_streak = ?1, last_session_date = ?2
            WHERE id = ?3 AND last_session_date = ?4
            "#,
            params![
                update.current_streak,
                update.last_session_date.to_string(),
                user_id,
                date.to_string(),
            ],
        )?,
        None => conn.execute(
            r#"
            UPDATE profiles
            SET current_streak = ?1, last_session_date = ?2
            WHERE id = ?3 AND last_session_date IS NULL
            "#,
            params![
                update.current_streak,
                update.last_session_date.to_string(),
                user_id,
            ],
        )?,
    };
    Ok(changed > 0)
}

pub(crate) fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn row_to_profile(row: &rusqlite::Row) -> Result<Profile> {
    let last_date_str: Option<String> = row.get(5)?;
    let created_at_str: String = row.get(6)?;

    Ok(Profile {
        id: row.get(0)?,
        full_name: row.get(1)?,
        school_name: row.get(2)?,
        grade: row.get(3)?,
        current_streak: row.get(4)?,
        last_session_date: last_date_str.and_then(|s| parse_iso_date(&s)),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
