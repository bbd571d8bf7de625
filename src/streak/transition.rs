//! The streak-transition rule, kept pure so it can be tested exhaustively
//! without a database.

use chrono::NaiveDate;

/// The streak-bearing slice of a profile, as observed before logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    pub current_streak: i64,
    pub last_session_date: Option<NaiveDate>,
}

/// The values to persist after logging a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub current_streak: i64,
    pub last_session_date: NaiveDate,
}

/// Decide the streak value after logging a session on `today`.
///
/// - Studied yesterday: the streak continues and grows by one.
/// - Already studied today: repeat sessions on the same day change nothing.
/// - Anything else (gap of two or more days, first ever session, or a
///   last date in the future from clock skew): the streak restarts at 1.
///
/// A broken streak is not stored as a separate state; it is
/// indistinguishable from a first session once the next log happens.
pub fn advance(state: &StreakState, today: NaiveDate) -> StreakUpdate {
    let yesterday = today.pred_opt();

    let current_streak = match state.last_session_date {
        Some(last) if Some(last) == yesterday => state.current_streak + 1,
        Some(last) if last == today => state.current_streak,
        _ => 1,
    };

    StreakUpdate {
        current_streak,
        last_session_date: today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn state(streak: i64, last: Option<NaiveDate>) -> StreakState {
        StreakState {
            current_streak: streak,
            last_session_date: last,
        }
    }

    #[test]
    fn test_consecutive_day_increments() {
        let today = date(2024, 3, 10);
        let update = advance(&state(5, Some(date(2024, 3, 9))), today);
        assert_eq!(update.current_streak, 6);
        assert_eq!(update.last_session_date, today);
    }

    #[test]
    fn test_same_day_repeat_does_not_inflate() {
        let today = date(2024, 3, 10);
        let update = advance(&state(5, Some(today)), today);
        assert_eq!(update.current_streak, 5);
        assert_eq!(update.last_session_date, today);
    }

    #[test]
    fn test_gap_resets_to_one() {
        let today = date(2024, 3, 10);
        let update = advance(&state(5, Some(date(2024, 3, 5))), today);
        assert_eq!(update.current_streak, 1);
        assert_eq!(update.last_session_date, today);
    }

    #[test]
    fn test_two_day_gap_resets() {
        let today = date(2024, 3, 10);
        let update = advance(&state(12, Some(date(2024, 3, 8))), today);
        assert_eq!(update.current_streak, 1);
    }

    #[test]
    fn test_first_ever_session_starts_at_one() {
        let today = date(2024, 3, 10);
        let update = advance(&state(0, None), today);
        assert_eq!(update.current_streak, 1);
        assert_eq!(update.last_session_date, today);
    }

    #[test]
    fn test_future_last_date_resets() {
        // Clock skew can leave a stored date ahead of "today".
        let today = date(2024, 3, 10);
        let update = advance(&state(7, Some(date(2024, 3, 12))), today);
        assert_eq!(update.current_streak, 1);
    }

    #[test]
    fn test_increment_across_month_boundary() {
        let update = advance(&state(3, Some(date(2024, 2, 29))), date(2024, 3, 1));
        assert_eq!(update.current_streak, 4);
    }

    #[test]
    fn test_increment_across_year_boundary() {
        let update = advance(&state(9, Some(date(2023, 12, 31))), date(2024, 1, 1));
        assert_eq!(update.current_streak, 10);
    }

    #[test]
    fn test_non_leap_february_gap() {
        // Feb 28 -> Mar 1 in a non-leap year is a one-day gap, not consecutive.
        let update = advance(&state(3, Some(date(2023, 2, 28))), date(2023, 3, 2));
        assert_eq!(update.current_streak, 1);

        let update = advance(&state(3, Some(date(2023, 2, 28))), date(2023, 3, 1));
        assert_eq!(update.current_streak, 4);
    }

    #[test]
    fn test_update_always_stamps_today() {
        let today = date(2024, 3, 10);
        for last in [None, Some(date(2024, 3, 9)), Some(today), Some(date(2024, 1, 1))] {
            let update = advance(&state(2, last), today);
            assert_eq!(update.last_session_date, today);
        }
    }
}
