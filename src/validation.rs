//! Request validation at the API boundary.
//!
//! The streak core records inputs as-is; range and shape checks live here,
//! applied by the handlers before anything reaches storage.

/// Whether the service offers content for this grade.
pub fn is_supported_grade(grade: i64) -> bool {
    crate::config::GRADES.contains(&grade)
}

/// Check a session result: both values non-negative and score within total.
pub fn validate_session_score(score: i64, total: i64) -> Result<(), &'static str> {
    if score < 0 || total < 0 {
        return Err("Score and total must be non-negative");
    }
    if score > total {
        return Err("Score cannot exceed total");
    }
    Ok(())
}

/// Trim a user-supplied topic, rejecting empty or whitespace-only input.
pub fn normalize_topic(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
