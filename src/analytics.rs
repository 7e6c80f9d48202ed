//! Platform-wide statistics derived from the course and user collections.
//!
//! Everything here is a pure function over snapshots of the collections;
//! nothing is persisted. Empty-collection cases are defined explicitly
//! instead of leaking NaN into the dashboard.

use serde::Serialize;

use crate::config;
use crate::domain::{Course, User, UserStatus};

/// One category's share of the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
  pub name: String,
  pub count: usize,
  pub percentage: f64,
}

/// Ephemeral dashboard snapshot, recomputed on demand
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSnapshot {
  pub total_revenue: f64,
  pub total_courses: usize,
  pub total_students: usize,
  pub active_students: usize,
  pub completion_rate: f64,
  pub average_rating: Option<f64>,
  pub popular_courses: Vec<Course>,
  pub recent_enrollments: Vec<User>,
  pub category_distribution: Vec<CategoryShare>,
}

/// Revenue across the catalog: price × enrolled headcount per course
pub fn total_revenue(courses: &[Course]) -> f64 {
  courses
    .iter()
    .map(|c| c.price * c.students_enrolled as f64)
    .sum()
}

/// Completed enrollments as a percentage of all enrollments; 0 when nobody
/// is enrolled in anything
pub fn completion_rate(users: &[User]) -> f64 {
  let total_enrollments: usize = users.iter().map(|u| u.enrolled_courses.len()).sum();
  if total_enrollments == 0 {
    return 0.0;
  }
  let total_completions: usize = users.iter().map(|u| u.completed_courses.len()).sum();
  (total_completions as f64 / total_enrollments as f64) * 100.0
}

/// Top courses by enrolled headcount; ties keep catalog order
pub fn popular_courses(courses: &[Course]) -> Vec<Course> {
  let mut ranked = courses.to_vec();
  ranked.sort_by(|a, b| b.students_enrolled.cmp(&a.students_enrolled));
  ranked.truncate(config::POPULAR_COURSES_LIMIT);
  ranked
}

/// Mean course rating; None for an empty catalog
pub fn average_rating(courses: &[Course]) -> Option<f64> {
  if courses.is_empty() {
    return None;
  }
  let sum: f64 = courses.iter().map(|c| c.rating).sum();
  Some(sum / courses.len() as f64)
}

pub fn active_students(users: &[User]) -> usize {
  users.iter().filter(|u| u.status == UserStatus::Active).count()
}

/// Most recently added users, newest first
pub fn recent_enrollments(users: &[User]) -> Vec<User> {
  users
    .iter()
    .rev()
    .take(config::RECENT_ENROLLMENTS_LIMIT)
    .cloned()
    .collect()
}

/// Category shares in first-seen catalog order; empty catalog yields no rows
pub fn category_distribution(courses: &[Course]) -> Vec<CategoryShare> {
  let mut shares: Vec<CategoryShare> = Vec::new();
  for course in courses {
    match shares.iter_mut().find(|s| s.name == course.category) {
      Some(share) => share.count += 1,
      None => shares.push(CategoryShare {
        name: course.category.clone(),
        count: 1,
        percentage: 0.0,
      }),
    }
  }
  let total = courses.len();
  if total > 0 {
    for share in &mut shares {
      share.percentage = (share.count as f64 / total as f64) * 100.0;
    }
  }
  shares
}

pub fn snapshot(courses: &[Course], users: &[User]) -> AnalyticsSnapshot {
  AnalyticsSnapshot {
    total_revenue: total_revenue(courses),
    total_courses: courses.len(),
    total_students: users.len(),
    active_students: active_students(users),
    completion_rate: completion_rate(users),
    average_rating: average_rating(courses),
    popular_courses: popular_courses(courses),
    recent_enrollments: recent_enrollments(users),
    category_distribution: category_distribution(courses),
  }
}
