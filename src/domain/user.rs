use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{CourseId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserStatus {
  #[default]
  Active,
  Inactive,
  Suspended,
}

impl UserStatus {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "active" => Some(Self::Active),
      "inactive" => Some(Self::Inactive),
      "suspended" => Some(Self::Suspended),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Inactive => "inactive",
      Self::Suspended => "suspended",
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id: UserId,
  pub name: String,
  pub email: String,
  /// Plaintext on the stored record (demo-grade auth); stripped from every
  /// profile that leaves the auth session.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub password: Option<String>,
  #[serde(default)]
  pub enrolled_courses: BTreeSet<CourseId>,
  #[serde(default)]
  pub completed_courses: BTreeSet<CourseId>,
  #[serde(default)]
  pub status: UserStatus,
  pub join_date: DateTime<Utc>,
}

impl User {
  pub fn new(id: UserId, name: &str, email: &str, password: &str) -> Self {
    Self {
      id,
      name: name.to_string(),
      email: email.to_string(),
      password: Some(password.to_string()),
      enrolled_courses: BTreeSet::new(),
      completed_courses: BTreeSet::new(),
      status: UserStatus::Active,
      join_date: Utc::now(),
    }
  }

  /// Copy of this user with the password removed
  pub fn sanitized(&self) -> Self {
    Self {
      password: None,
      ..self.clone()
    }
  }
}
