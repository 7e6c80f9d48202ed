use std::collections::BTreeMap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codelearn::auth::{AuthSession, NewUser};
use codelearn::catalog::Catalog;
use codelearn::domain::{Question, Quiz};
use codelearn::enrollment::EnrollmentLedger;
use codelearn::progress::{self, ProgressModel};
use codelearn::store::{keys, KeyValueStore, SqliteStore};
use codelearn::{analytics, auth, config, quiz};

fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "codelearn=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let store_path = config::load_store_path();
  let store = SqliteStore::open(&store_path).expect("Failed to open store");

  let catalog = Catalog::new(&store);
  let courses = catalog.courses().expect("Failed to load course catalog");
  tracing::info!("Catalog ready with {} courses", courses.len());

  let mut session = AuthSession::init(&store);
  if session.current_user().is_none() {
    match session.register(NewUser {
      name: "Demo Student".to_string(),
      email: "demo@codelearn.dev".to_string(),
      password: "demo".to_string(),
    }) {
      Ok(user) => tracing::info!("Registered demo account {}", user.email),
      Err(auth::AuthError::DuplicateEmail) => {
        session
          .login("demo@codelearn.dev", "demo")
          .expect("Demo login failed");
      }
      Err(e) => {
        tracing::error!("Could not establish demo session: {}", e);
        return;
      }
    }
  }
  let user = session
    .current_user()
    .expect("Session should be authenticated")
    .clone();
  tracing::info!("Signed in as {} ({})", user.name, user.email);

  let ledger = EnrollmentLedger::new(&store);
  if let Some(course) = courses.first() {
    ledger
      .enroll(user.id, course.id)
      .expect("Failed to enroll demo user");
    tracing::info!("Enrolled in '{}'", course.title);
  }

  let model = ProgressModel::new(&store);
  run_demo_quiz(&model, user.id);

  let user_progress = model.progress_for(user.id);
  tracing::info!(
    "Overall progress: {}%",
    progress::overall_progress(&user_progress, &courses)
  );

  let users: Vec<codelearn::domain::User> = store
    .get_as(keys::USERS)
    .expect("Failed to load users")
    .unwrap_or_default();
  let snapshot = analytics::snapshot(&courses, &users);
  tracing::info!(
    "Platform: {} courses, {} students ({} active), ${:.2} revenue, {:.1}% completion",
    snapshot.total_courses,
    snapshot.total_students,
    snapshot.active_students,
    snapshot.total_revenue,
    snapshot.completion_rate
  );
  if let Some(rating) = snapshot.average_rating {
    tracing::info!("Average course rating: {:.1}", rating);
  }
  for course in &snapshot.popular_courses {
    tracing::info!("  {}: {} students", course.title, course.students_enrolled);
  }
}

/// Score a canned week-1 quiz for the demo account
fn run_demo_quiz(model: &ProgressModel<'_, SqliteStore>, user_id: i64) {
  let mut demo_quiz = Quiz::new(1, 1, 1, config::DEFAULT_PASSING_SCORE);
  demo_quiz.push_question(
    Question::new(
      "Which keyword declares a block-scoped variable?",
      ["var", "let", "function", "with"],
      1,
      config::DEFAULT_QUESTION_POINTS,
    )
    .expect("Demo question is valid"),
  );
  demo_quiz.push_question(
    Question::new(
      "What does console.log do?",
      ["Prints output", "Declares a type", "Starts a loop", "Throws"],
      0,
      config::DEFAULT_QUESTION_POINTS,
    )
    .expect("Demo question is valid"),
  );

  let answers = BTreeMap::from([(0, 1), (1, 0)]);
  match quiz::submit(model, &demo_quiz, &answers, user_id, 1) {
    Ok(outcome) => tracing::info!(
      "Demo quiz scored {}% ({} correct)",
      outcome.score_percent,
      outcome.correct_count
    ),
    Err(e) => tracing::warn!("Demo quiz submission failed: {}", e),
  }
}
