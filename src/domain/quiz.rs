use serde::{Deserialize, Serialize};

use crate::config;
use crate::domain::CourseId;

/// Rejection reasons for quiz authoring input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizFormError {
  EmptyQuestionText,
  EmptyOption(usize),
  AnswerOutOfRange(usize),
}

impl std::fmt::Display for QuizFormError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::EmptyQuestionText => write!(f, "Question text is required"),
      Self::EmptyOption(i) => write!(f, "Option {} is empty", i + 1),
      Self::AnswerOutOfRange(i) => write!(f, "Correct answer index {} is out of range", i),
    }
  }
}

impl std::error::Error for QuizFormError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
  pub text: String,
  pub options: [String; config::QUIZ_OPTION_COUNT],
  pub correct_answer: usize,
  pub points: u32,
}

impl Question {
  /// Validate authoring input: text and all options must be non-empty and
  /// the answer index must point at one of the options.
  pub fn new(
    text: &str,
    options: [&str; config::QUIZ_OPTION_COUNT],
    correct_answer: usize,
    points: u32,
  ) -> Result<Self, QuizFormError> {
    if text.trim().is_empty() {
      return Err(QuizFormError::EmptyQuestionText);
    }
    for (i, option) in options.iter().enumerate() {
      if option.trim().is_empty() {
        return Err(QuizFormError::EmptyOption(i));
      }
    }
    if correct_answer >= options.len() {
      return Err(QuizFormError::AnswerOutOfRange(correct_answer));
    }
    Ok(Self {
      text: text.to_string(),
      options: options.map(|o| o.to_string()),
      correct_answer,
      points,
    })
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
  pub id: i64,
  pub course_id: CourseId,
  pub week: u32,
  pub duration_minutes: u32,
  /// Minimum percentage required to pass
  pub passing_score: u8,
  questions: Vec<Question>,
  /// Kept equal to the sum of question points
  total_points: u32,
}

impl Quiz {
  pub fn new(id: i64, course_id: CourseId, week: u32, passing_score: u8) -> Self {
    Self {
      id,
      course_id,
      week,
      duration_minutes: config::DEFAULT_QUIZ_DURATION_MINUTES,
      passing_score,
      questions: Vec::new(),
      total_points: 0,
    }
  }

  pub fn questions(&self) -> &[Question] {
    &self.questions
  }

  pub fn total_points(&self) -> u32 {
    self.total_points
  }

  pub fn push_question(&mut self, question: Question) {
    self.questions.push(question);
    self.recompute_total_points();
  }

  pub fn remove_question(&mut self, index: usize) -> Option<Question> {
    if index >= self.questions.len() {
      return None;
    }
    let removed = self.questions.remove(index);
    self.recompute_total_points();
    Some(removed)
  }

  fn recompute_total_points(&mut self) {
    self.total_points = self.questions.iter().map(|q| q.points).sum();
  }
}
