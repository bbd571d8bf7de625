//! SQLite adapters for the streak tracker's storage traits.
//!
//! `StreakTracker` only knows the `ProfileStore`/`SessionLog` traits; this
//! adapter binds them to the shared connection pool. Lock poisoning and
//! SQLite faults both surface as `StoreError` so the tracker treats them
//! uniformly.

use chrono::NaiveDate;

use crate::domain::NewSession;
use crate::streak::{ProfileStore, SessionLog, StoreError, StreakState, StreakUpdate};

use super::{profiles, sessions, try_lock, DbPool};

#[derive(Clone)]
pub struct SqliteStreakStore {
    pool: DbPool,
}

impl SqliteStreakStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProfileStore for SqliteStreakStore {
    fn streak_state(&self, user_id: &str) -> Result<Option<StreakState>, StoreError> {
        let conn = try_lock(&self.pool).map_err(|e| StoreError::new(e.to_string()))?;
        profiles::streak_state(&conn, user_id).map_err(|e| StoreError::new(e.to_string()))
    }

    fn apply_streak_update(
        &self,
        user_id: &str,
        observed: Option<NaiveDate>,
        update: &StreakUpdate,
    ) -> Result<bool, StoreError> {
        let conn = try_lock(&self.pool).map_err(|e| StoreError::new(e.to_string()))?;
        profiles::apply_streak_update(&conn, user_id, observed, update)
            .map_err(|e| StoreError::new(e.to_string()))
    }
}

impl SessionLog for SqliteStreakStore {
    fn append(&self, session: &NewSession) -> Result<(), StoreError> {
        let conn = try_lock(&self.pool).map_err(|e| StoreError::new(e.to_string()))?;
        sessions::insert_session(&conn, session)
            .map(|_| ())
            .map_err(|e| StoreError::new(e.to_string()))
    }

    fn recent_dates(&self, user_id: &str, limit: usize) -> Result<Vec<NaiveDate>, StoreError> {
        let conn = try_lock(&self.pool).map_err(|e| StoreError::new(e.to_string()))?;
        sessions::recent_session_dates(&conn, user_id, limit)
            .map_err(|e| StoreError::new(e.to_string()))
    }
}
