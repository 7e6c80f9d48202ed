use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{LessonId, MaterialId, ReadingId};

/// Completion entry for a single lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonRecord {
  pub completed: bool,
  pub score: u8,
  pub completed_at: DateTime<Utc>,
}

/// Per-user, per-course completion state.
///
/// `completed_lessons` only ever grows and stays in step with the number of
/// distinct completed entries in `lessons`. `total_lessons` is a snapshot
/// taken at record creation; percentage derivations prefer the live course
/// count and fall back to the snapshot when the course is unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseProgress {
  pub completed_lessons: u32,
  pub total_lessons: u32,
  #[serde(default)]
  pub completed_weeks: BTreeSet<u32>,
  #[serde(default = "default_current_week")]
  pub current_week: u32,
  #[serde(default)]
  pub downloaded_materials: BTreeSet<MaterialId>,
  #[serde(default)]
  pub completed_readings: BTreeSet<ReadingId>,
  #[serde(default)]
  pub lessons: BTreeMap<LessonId, LessonRecord>,
}

fn default_current_week() -> u32 {
  1
}

impl CourseProgress {
  pub fn new(total_lessons: u32) -> Self {
    Self {
      completed_lessons: 0,
      total_lessons,
      completed_weeks: BTreeSet::new(),
      current_week: 1,
      downloaded_materials: BTreeSet::new(),
      completed_readings: BTreeSet::new(),
      lessons: BTreeMap::new(),
    }
  }

  /// Lesson completion against the given course lesson count, as a rounded
  /// percentage clamped to [0, 100]
  pub fn percentage_of(&self, total_lessons: u32) -> u8 {
    if total_lessons == 0 {
      return 0;
    }
    let pct = (self.completed_lessons as f64 / total_lessons as f64) * 100.0;
    pct.round().min(100.0) as u8
  }

  /// Completion against the lesson count snapshot taken at record creation;
  /// use `percentage_of` with the live count when the course is known
  pub fn percentage(&self) -> u8 {
    self.percentage_of(self.total_lessons)
  }

  pub fn is_complete(&self, total_lessons: u32) -> bool {
    self.percentage_of(total_lessons) == 100
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_percentage_half_complete() {
    let mut progress = CourseProgress::new(12);
    progress.completed_lessons = 6;
    assert_eq!(progress.percentage(), 50);
  }

  #[test]
  fn test_percentage_zero_lessons_course() {
    let progress = CourseProgress::new(0);
    assert_eq!(progress.percentage(), 0);
  }

  #[test]
  fn test_percentage_clamped_at_100() {
    // Over-counted legacy records still display sanely
    let mut progress = CourseProgress::new(4);
    progress.completed_lessons = 7;
    assert_eq!(progress.percentage(), 100);
  }

  #[test]
  fn test_percentage_of_prefers_given_count_over_snapshot() {
    let mut progress = CourseProgress::new(12);
    progress.completed_lessons = 3;
    assert_eq!(progress.percentage(), 25);
    assert_eq!(progress.percentage_of(3), 100);
    assert_eq!(progress.percentage_of(0), 0);
    assert!(progress.is_complete(3));
    assert!(!progress.is_complete(12));
  }

  #[test]
  fn test_percentage_rounds() {
    let mut progress = CourseProgress::new(3);
    progress.completed_lessons = 1;
    assert_eq!(progress.percentage(), 33);
    progress.completed_lessons = 2;
    assert_eq!(progress.percentage(), 67);
  }
}
