//! Study notes and flashcards attached to a subject, grade and topic.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A block of study notes for one topic. `is_ai_generated` records where the
/// content came from; this service stores it either way.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
  pub id: i64,
  pub subject_id: i64,
  pub grade: i64,
  pub topic: String,
  pub content: String,
  pub is_ai_generated: bool,
  pub created_at: DateTime<Utc>,
}

/// One front/back flashcard within a chapter's set.
#[derive(Debug, Clone, Serialize)]
pub struct Flashcard {
  pub id: i64,
  pub subject_id: i64,
  pub grade: i64,
  pub chapter: String,
  pub front: String,
  pub back: String,
  pub is_ai_generated: bool,
  pub created_at: DateTime<Utc>,
}
