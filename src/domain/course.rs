use serde::{Deserialize, Serialize};

use crate::domain::{CourseId, LessonId, MaterialId, ReadingId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Level {
  #[default]
  Beginner,
  Intermediate,
  Advanced,
}

impl Level {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "Beginner" | "beginner" => Some(Self::Beginner),
      "Intermediate" | "intermediate" => Some(Self::Intermediate),
      "Advanced" | "advanced" => Some(Self::Advanced),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Beginner => "Beginner",
      Self::Intermediate => "Intermediate",
      Self::Advanced => "Advanced",
    }
  }
}

/// One week of the course syllabus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Week {
  pub week: u32,
  pub title: String,
  #[serde(default)]
  pub topics: Vec<String>,
  /// Catalog lessons covered by this week
  #[serde(default)]
  pub lessons: Vec<LessonId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
  pub id: MaterialId,
  pub title: String,
  pub kind: String,
  pub downloadable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
  pub id: ReadingId,
  pub title: String,
  pub week: u32,
  pub kind: String,
}

/// A catalog lesson entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
  pub id: LessonId,
  pub title: String,
  pub content: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub code_example: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
  pub id: CourseId,
  pub title: String,
  pub description: String,
  pub category: String,
  pub level: Level,
  pub price: f64,
  pub duration_hours: u32,
  pub total_lessons: u32,
  #[serde(default)]
  pub students_enrolled: u32,
  /// Always within [0, 5]
  #[serde(default)]
  pub rating: f64,
  #[serde(default)]
  pub syllabus: Vec<Week>,
  #[serde(default)]
  pub materials: Vec<Material>,
  #[serde(default)]
  pub readings: Vec<Reading>,
}

impl Course {
  pub fn new(
    id: CourseId,
    title: &str,
    description: &str,
    category: &str,
    level: Level,
    price: f64,
    duration_hours: u32,
    total_lessons: u32,
  ) -> Self {
    Self {
      id,
      title: title.to_string(),
      description: description.to_string(),
      category: category.to_string(),
      level,
      price,
      duration_hours,
      total_lessons,
      students_enrolled: 0,
      rating: 0.0,
      syllabus: Vec::new(),
      materials: Vec::new(),
      readings: Vec::new(),
    }
  }

  pub fn set_rating(&mut self, rating: f64) {
    self.rating = rating.clamp(0.0, 5.0);
  }

  pub fn with_rating(mut self, rating: f64) -> Self {
    self.set_rating(rating);
    self
  }

  pub fn with_students(mut self, students_enrolled: u32) -> Self {
    self.students_enrolled = students_enrolled;
    self
  }

  pub fn with_syllabus(mut self, syllabus: Vec<Week>) -> Self {
    self.syllabus = syllabus;
    self
  }

  pub fn with_materials(mut self, materials: Vec<Material>) -> Self {
    self.materials = materials;
    self
  }

  pub fn with_readings(mut self, readings: Vec<Reading>) -> Self {
    self.readings = readings;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rating_clamped_to_valid_range() {
    let mut course = Course::new(1, "Rust", "desc", "Systems", Level::Beginner, 10.0, 5, 8);
    course.set_rating(7.3);
    assert_eq!(course.rating, 5.0);
    course.set_rating(-1.0);
    assert_eq!(course.rating, 0.0);
    course.set_rating(4.5);
    assert_eq!(course.rating, 4.5);
  }

  #[test]
  fn test_level_round_trip() {
    for level in [Level::Beginner, Level::Intermediate, Level::Advanced] {
      assert_eq!(Level::from_str(level.as_str()), Some(level));
    }
    assert_eq!(Level::from_str("Expert"), None);
  }
}
