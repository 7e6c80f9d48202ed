//! In-memory key-value store for tests and throwaway sessions.
//!
//! Same contract as the durable store, nothing survives the process.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{KeyValueStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
  entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
    let entries = self
      .entries
      .lock()
      .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;
    Ok(entries.get(key).cloned())
  }

  fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;
    entries.insert(key.to_string(), value.clone());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), StoreError> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;
    entries.remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_typed_helpers_round_trip() {
    let store = MemoryStore::new();
    store.set_as("numbers", &vec![1, 2, 3]).unwrap();
    let numbers: Option<Vec<i64>> = store.get_as("numbers").unwrap();
    assert_eq!(numbers, Some(vec![1, 2, 3]));
  }

  #[test]
  fn test_remove_missing_key_is_noop() {
    let store = MemoryStore::new();
    store.remove("nothing").unwrap();
    assert_eq!(store.get("nothing").unwrap(), None);
    store.set("k", &json!(1)).unwrap();
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
  }
}
