//! Per-user course progress tracking and derivation.
//!
//! Mutations load the user's full progress document, update one course entry
//! and persist the whole document back under `progress_{user_id}`. Derived
//! percentages are pure functions over loaded records.

use chrono::Utc;
use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::config;
use crate::domain::{
  Course, CourseId, CourseProgress, LessonId, LessonRecord, MaterialId, ReadingId, UserId,
};
use crate::store::{keys, KeyValueStore, LogOnError, StoreError};

pub struct ProgressModel<'a, S: KeyValueStore> {
  store: &'a S,
}

impl<'a, S: KeyValueStore> ProgressModel<'a, S> {
  pub fn new(store: &'a S) -> Self {
    Self { store }
  }

  /// Load all progress records for a user. Store failures log and yield an
  /// empty map so dashboards render with zeroed stats instead of failing.
  pub fn progress_for(&self, user_id: UserId) -> BTreeMap<CourseId, CourseProgress> {
    self
      .store
      .get_as(&keys::progress(user_id))
      .log_warn_default("Failed to load progress")
      .unwrap_or_default()
  }

  /// Record a completed lesson with its score.
  ///
  /// Re-submitting an already-completed lesson refreshes its record (latest
  /// score and timestamp win) without bumping `completed_lessons`, so the
  /// counter never drifts past the number of distinct lessons.
  pub fn mark_lesson_complete(
    &self,
    user_id: UserId,
    course_id: CourseId,
    lesson_id: LessonId,
    score: u8,
  ) -> Result<(), StoreError> {
    self.update(user_id, course_id, |entry| {
      let already_completed = entry
        .lessons
        .get(&lesson_id)
        .map(|r| r.completed)
        .unwrap_or(false);
      if !already_completed {
        entry.completed_lessons += 1;
      }
      entry.lessons.insert(
        lesson_id,
        LessonRecord {
          completed: true,
          score,
          completed_at: Utc::now(),
        },
      );
    })
  }

  pub fn mark_week_complete(
    &self,
    user_id: UserId,
    course_id: CourseId,
    week: u32,
  ) -> Result<(), StoreError> {
    self.update(user_id, course_id, |entry| {
      entry.completed_weeks.insert(week);
    })
  }

  pub fn set_current_week(
    &self,
    user_id: UserId,
    course_id: CourseId,
    week: u32,
  ) -> Result<(), StoreError> {
    self.update(user_id, course_id, |entry| {
      entry.current_week = week;
    })
  }

  pub fn record_material_download(
    &self,
    user_id: UserId,
    course_id: CourseId,
    material_id: MaterialId,
  ) -> Result<(), StoreError> {
    self.update(user_id, course_id, |entry| {
      entry.downloaded_materials.insert(material_id);
    })
  }

  pub fn mark_reading_complete(
    &self,
    user_id: UserId,
    course_id: CourseId,
    reading_id: ReadingId,
  ) -> Result<(), StoreError> {
    self.update(user_id, course_id, |entry| {
      entry.completed_readings.insert(reading_id);
    })
  }

  /// Load-modify-save cycle shared by every mutation
  fn update<F>(&self, user_id: UserId, course_id: CourseId, apply: F) -> Result<(), StoreError>
  where
    F: FnOnce(&mut CourseProgress),
  {
    let key = keys::progress(user_id);
    let mut all: BTreeMap<CourseId, CourseProgress> =
      self.store.get_as(&key)?.unwrap_or_default();
    let entry = all
      .entry(course_id)
      .or_insert_with(|| CourseProgress::new(self.total_lessons_for(course_id)));
    apply(entry);
    self.store.set_as(&key, &all)
  }

  /// Total lessons for a new progress record: catalog value when the course
  /// is known, otherwise the platform default.
  fn total_lessons_for(&self, course_id: CourseId) -> u32 {
    Catalog::new(self.store)
      .course(course_id)
      .log_warn("Failed to look up course")
      .flatten()
      .map(|c| c.total_lessons)
      .unwrap_or(config::DEFAULT_TOTAL_LESSONS)
  }
}

/// Lesson completion percentage against the live course lesson count;
/// 0 without a progress record. Falls back to the count snapshotted into the
/// record when the course is unknown.
pub fn completion_percentage(progress: Option<&CourseProgress>, course: Option<&Course>) -> u8 {
  let Some(progress) = progress else { return 0 };
  match course {
    Some(course) => progress.percentage_of(course.total_lessons),
    None => progress.percentage(),
  }
}

/// Syllabus completion as a rounded percentage of weeks done
pub fn week_completion_percentage(progress: Option<&CourseProgress>, syllabus_len: usize) -> u8 {
  let Some(progress) = progress else { return 0 };
  if syllabus_len == 0 {
    return 0;
  }
  let pct = (progress.completed_weeks.len() as f64 / syllabus_len as f64) * 100.0;
  pct.round().min(100.0) as u8
}

/// Share of courses the user has fully completed, rounded; 0 for no courses
pub fn overall_progress(
  progress: &BTreeMap<CourseId, CourseProgress>,
  courses: &[Course],
) -> u8 {
  if courses.is_empty() {
    return 0;
  }
  let completed = courses
    .iter()
    .filter(|course| {
      progress
        .get(&course.id)
        .map(|p| p.is_complete(course.total_lessons))
        .unwrap_or(false)
    })
    .count();
  ((completed as f64 / courses.len() as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Level;
  use crate::store::MemoryStore;

  fn course(id: CourseId, total_lessons: u32) -> Course {
    Course::new(
      id,
      "Course",
      "desc",
      "Testing",
      Level::Beginner,
      10.0,
      10,
      total_lessons,
    )
  }

  #[test]
  fn test_first_completion_creates_record() {
    let store = MemoryStore::new();
    let model = ProgressModel::new(&store);

    model.mark_lesson_complete(1, 42, 1, 90).unwrap();

    let progress = model.progress_for(1);
    let entry = progress.get(&42).unwrap();
    assert_eq!(entry.completed_lessons, 1);
    // Course 42 is unknown to the catalog, so the default applies
    assert_eq!(entry.total_lessons, config::DEFAULT_TOTAL_LESSONS);
    assert_eq!(entry.lessons.get(&1).unwrap().score, 90);
    assert!(entry.lessons.get(&1).unwrap().completed);
  }

  #[test]
  fn test_known_course_total_lessons() {
    let store = MemoryStore::new();
    Catalog::new(&store).courses().unwrap(); // seed demo catalog
    let model = ProgressModel::new(&store);

    model.mark_lesson_complete(1, 2, 3, 80).unwrap();

    let progress = model.progress_for(1);
    assert_eq!(progress.get(&2).unwrap().total_lessons, 15);
  }

  #[test]
  fn test_repeat_completion_does_not_overcount() {
    let store = MemoryStore::new();
    let model = ProgressModel::new(&store);

    model.mark_lesson_complete(1, 42, 7, 60).unwrap();
    model.mark_lesson_complete(1, 42, 7, 95).unwrap();

    let progress = model.progress_for(1);
    let entry = progress.get(&42).unwrap();
    assert_eq!(entry.completed_lessons, 1);
    // Latest score wins on the per-lesson record
    assert_eq!(entry.lessons.get(&7).unwrap().score, 95);
  }

  #[test]
  fn test_completed_lessons_is_monotonic() {
    let store = MemoryStore::new();
    let model = ProgressModel::new(&store);

    let mut previous = 0;
    for lesson_id in [1, 2, 2, 3, 1] {
      model.mark_lesson_complete(1, 42, lesson_id, 100).unwrap();
      let current = model.progress_for(1).get(&42).unwrap().completed_lessons;
      assert!(current >= previous);
      previous = current;
    }
    assert_eq!(previous, 3);
  }

  #[test]
  fn test_completion_percentage_without_record() {
    assert_eq!(completion_percentage(None, Some(&course(1, 12))), 0);
    assert_eq!(completion_percentage(None, None), 0);
  }

  #[test]
  fn test_completion_percentage_scenario() {
    let mut progress = CourseProgress::new(12);
    progress.completed_lessons = 6;
    assert_eq!(completion_percentage(Some(&progress), Some(&course(1, 12))), 50);
  }

  #[test]
  fn test_completion_percentage_follows_edited_course() {
    let store = MemoryStore::new();
    let model = ProgressModel::new(&store);

    // Course 42 is unknown at completion time, so the record snapshots the
    // default lesson count
    model.mark_lesson_complete(1, 42, 1, 100).unwrap();
    let progress = model.progress_for(1);
    let entry = progress.get(&42);

    // Once the course is published with a single lesson, the live count wins
    let published = course(42, 1);
    assert_eq!(completion_percentage(entry, Some(&published)), 100);
    // Without the course, the snapshot still applies
    assert_eq!(completion_percentage(entry, None), 8);
  }

  #[test]
  fn test_overall_progress_half_completed() {
    let courses = vec![course(1, 2), course(2, 2), course(3, 2), course(4, 2)];
    let mut progress = BTreeMap::new();
    for id in [1, 2] {
      let mut p = CourseProgress::new(2);
      p.completed_lessons = 2;
      progress.insert(id, p);
    }
    progress.insert(3, CourseProgress::new(2));

    assert_eq!(overall_progress(&progress, &courses), 50);
  }

  #[test]
  fn test_overall_progress_uses_live_lesson_counts() {
    // Record was completed when the course had 2 lessons; the course has
    // since grown to 4, so it no longer counts as finished
    let mut record = CourseProgress::new(2);
    record.completed_lessons = 2;
    let mut progress = BTreeMap::new();
    progress.insert(1, record);

    assert_eq!(overall_progress(&progress, &[course(1, 2)]), 100);
    assert_eq!(overall_progress(&progress, &[course(1, 4)]), 0);
  }

  #[test]
  fn test_overall_progress_empty_course_list() {
    assert_eq!(overall_progress(&BTreeMap::new(), &[]), 0);
  }

  #[test]
  fn test_week_and_reading_updates() {
    let store = MemoryStore::new();
    let model = ProgressModel::new(&store);

    model.mark_week_complete(1, 42, 1).unwrap();
    model.mark_week_complete(1, 42, 1).unwrap();
    model.mark_week_complete(1, 42, 2).unwrap();
    model.set_current_week(1, 42, 3).unwrap();
    model.record_material_download(1, 42, 10).unwrap();
    model.mark_reading_complete(1, 42, 20).unwrap();

    let progress = model.progress_for(1);
    let entry = progress.get(&42).unwrap();
    assert_eq!(entry.completed_weeks.len(), 2);
    assert_eq!(entry.current_week, 3);
    assert!(entry.downloaded_materials.contains(&10));
    assert!(entry.completed_readings.contains(&20));

    assert_eq!(week_completion_percentage(Some(entry), 4), 50);
    assert_eq!(week_completion_percentage(Some(entry), 0), 0);
    assert_eq!(week_completion_percentage(None, 4), 0);
  }
}
