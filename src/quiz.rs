//! Quiz scoring and pass/fail evaluation.
//!
//! Answers arrive as a question-index → option-index map. Unanswered
//! questions count as wrong; the submission form is expected to require an
//! answer per question before it lets the student submit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{LessonId, Quiz, UserId};
use crate::progress::ProgressModel;
use crate::store::{KeyValueStore, StoreError};

/// Result of scoring one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
  pub correct_count: usize,
  pub score_percent: u8,
}

/// Score a submission against the quiz answer key
pub fn score(quiz: &Quiz, answers: &BTreeMap<usize, usize>) -> QuizOutcome {
  let total = quiz.questions().len();
  if total == 0 {
    return QuizOutcome {
      correct_count: 0,
      score_percent: 0,
    };
  }
  let correct_count = quiz
    .questions()
    .iter()
    .enumerate()
    .filter(|(index, question)| answers.get(index) == Some(&question.correct_answer))
    .count();
  let score_percent = ((correct_count as f64 / total as f64) * 100.0).round() as u8;
  QuizOutcome {
    correct_count,
    score_percent,
  }
}

pub fn passed(score_percent: u8, passing_score: u8) -> bool {
  score_percent >= passing_score
}

/// Score a submission and, on pass, mark the associated lesson complete
/// with the achieved score.
pub fn submit<S: KeyValueStore>(
  progress: &ProgressModel<'_, S>,
  quiz: &Quiz,
  answers: &BTreeMap<usize, usize>,
  user_id: UserId,
  lesson_id: LessonId,
) -> Result<QuizOutcome, StoreError> {
  let outcome = score(quiz, answers);
  if passed(outcome.score_percent, quiz.passing_score) {
    progress.mark_lesson_complete(user_id, quiz.course_id, lesson_id, outcome.score_percent)?;
  } else {
    tracing::debug!(
      "Quiz {} failed at {}% (needs {}%)",
      quiz.id,
      outcome.score_percent,
      quiz.passing_score
    );
  }
  Ok(outcome)
}
