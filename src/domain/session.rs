use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A completed practice set waiting to be recorded. The stored row is
/// append-only; nothing in the service mutates or deletes it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
  pub user_id: String,
  pub subject_id: i64,
  /// Questions answered correctly. Recorded as-is; range checks happen at
  /// the API boundary, not here.
  pub score: i64,
  pub total: i64,
  /// UTC calendar date the session was logged on.
  pub session_date: NaiveDate,
}
