//! Enrollment ledger: which users hold access to which courses.
//!
//! The ledger document under `enrollments` is authoritative; every enroll is
//! mirrored into the user's own `enrolled_courses` set so profile screens and
//! analytics see the same relation. There is no un-enroll.

use std::collections::BTreeMap;

use crate::domain::{CourseId, User, UserId};
use crate::store::{keys, KeyValueStore, LogOnError, StoreError};

pub struct EnrollmentLedger<'a, S: KeyValueStore> {
  store: &'a S,
}

impl<'a, S: KeyValueStore> EnrollmentLedger<'a, S> {
  pub fn new(store: &'a S) -> Self {
    Self { store }
  }

  /// Enroll a user in a course. Idempotent: an existing enrollment is left
  /// untouched and nothing is written.
  pub fn enroll(&self, user_id: UserId, course_id: CourseId) -> Result<(), StoreError> {
    let mut ledger: BTreeMap<UserId, Vec<CourseId>> =
      self.store.get_as(keys::ENROLLMENTS)?.unwrap_or_default();
    let entry = ledger.entry(user_id).or_default();
    if entry.contains(&course_id) {
      return Ok(());
    }
    entry.push(course_id);
    self.store.set_as(keys::ENROLLMENTS, &ledger)?;
    self.mirror_into_user(user_id, course_id)
  }

  pub fn is_enrolled(&self, user_id: UserId, course_id: CourseId) -> bool {
    self.enrolled_courses(user_id).contains(&course_id)
  }

  /// Courses the user is enrolled in, in enrollment order.
  /// Store failures log and yield an empty list.
  pub fn enrolled_courses(&self, user_id: UserId) -> Vec<CourseId> {
    let ledger: BTreeMap<UserId, Vec<CourseId>> = self
      .store
      .get_as(keys::ENROLLMENTS)
      .log_warn_default("Failed to load enrollments")
      .unwrap_or_default();
    ledger.get(&user_id).cloned().unwrap_or_default()
  }

  /// Keep the user record's enrollment set in step with the ledger.
  /// An unknown user id leaves the collection as-is.
  fn mirror_into_user(&self, user_id: UserId, course_id: CourseId) -> Result<(), StoreError> {
    let mut users: Vec<User> = self.store.get_as(keys::USERS)?.unwrap_or_default();
    let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
      tracing::warn!("Enrollment for unknown user {}", user_id);
      return Ok(());
    };
    user.enrolled_courses.insert(course_id);
    self.store.set_as(keys::USERS, &users)
  }
}
