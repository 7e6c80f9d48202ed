//! Application configuration constants.
//!
//! Centralizes the tunable values used across the core, plus resolution
//! of the backing store path.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Store Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    store: Option<StoreConfig>,
}

#[derive(Debug, Deserialize)]
struct StoreConfig {
    path: Option<String>,
}

/// Load store path with priority: config.toml > .env > default
pub fn load_store_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml
    if let Ok(contents) = std::fs::read_to_string("config.toml") {
        if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
            if let Some(store) = config.store {
                if let Some(path) = store.path {
                    tracing::info!("Using store from config.toml: {}", path);
                    return PathBuf::from(path);
                }
            }
        }
    }

    // Priority 2: .env STORE_PATH
    if let Ok(path) = std::env::var("STORE_PATH") {
        tracing::info!("Using store from STORE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    // Default
    let default = PathBuf::from("data/codelearn.db");
    tracing::info!("Using default store path: {}", default.display());
    default
}

// ==================== Progress Configuration ====================

/// Lesson count assumed for a course the catalog doesn't know about
pub const DEFAULT_TOTAL_LESSONS: u32 = 12;

// ==================== Quiz Configuration ====================

/// Default quiz pass threshold (percent)
pub const DEFAULT_PASSING_SCORE: u8 = 70;

/// Point value assigned to a question unless the author overrides it
pub const DEFAULT_QUESTION_POINTS: u32 = 10;

/// Default quiz time limit in minutes
pub const DEFAULT_QUIZ_DURATION_MINUTES: u32 = 30;

/// Every question carries exactly this many answer options
pub const QUIZ_OPTION_COUNT: usize = 4;

// ==================== Analytics Configuration ====================

/// Number of courses shown in the popularity ranking
pub const POPULAR_COURSES_LIMIT: usize = 5;

/// Number of users shown in the recent-enrollments feed
pub const RECENT_ENROLLMENTS_LIMIT: usize = 5;
