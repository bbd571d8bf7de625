use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Per-user persisted record holding streak state and personal fields.
///
/// The `id` is issued by the external authentication system; this service
/// references it but never mints one. Personal fields (`full_name`,
/// `school_name`, `grade`) are owned by the profile-editing flow; the streak
/// columns are owned exclusively by the streak tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub id: String,
  pub full_name: Option<String>,
  pub school_name: Option<String>,
  pub grade: Option<i64>,
  /// Consecutive UTC calendar days with at least one logged session.
  /// Zero only before the first ever session.
  pub current_streak: i64,
  /// Date of the most recent logged session, absent until the first one.
  pub last_session_date: Option<NaiveDate>,
  pub created_at: DateTime<Utc>,
}
