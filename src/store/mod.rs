//! Key-value document storage behind the computation core.
//!
//! Every collection the core touches is a JSON document under a well-known
//! key. The durable implementation is sqlite-backed; tests use the in-memory
//! variant. Writes are last-write-wins with no versioning.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Keys used by the core
pub mod keys {
    use crate::domain::UserId;

    pub const CURRENT_USER: &str = "user";
    pub const USERS: &str = "users";
    pub const COURSES: &str = "courses";
    pub const LESSONS: &str = "lessons";
    pub const ENROLLMENTS: &str = "enrollments";

    pub fn progress(user_id: UserId) -> String {
        format!("progress_{}", user_id)
    }
}

/// Transport-level store failure
#[derive(Debug)]
pub enum StoreError {
    /// The backing store could not serve the request
    Backend(String),
    /// The stored document under `key` does not decode into the expected shape
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(msg) => write!(f, "Store unavailable: {}", msg),
            Self::Corrupt { key, source } => {
                write!(f, "Corrupt document under key '{}': {}", key, source)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend(_) => None,
            Self::Corrupt { source, .. } => Some(source),
        }
    }
}

/// Durable key → JSON-document storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Read and decode the document under `key`
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key)? {
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                StoreError::Corrupt {
                    key: key.to_string(),
                    source: e,
                }
            }),
            None => Ok(None),
        }
    }

    /// Encode `value` and write it under `key`
    fn set_as<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            source: e,
        })?;
        self.set(key, &value)
    }
}

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                T::default()
            }
        }
    }
}
