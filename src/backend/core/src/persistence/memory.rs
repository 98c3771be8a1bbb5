//! In-memory collection store.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};

use super::{CollectionKey, CollectionStore};
use crate::error::{Result, TutorError};

/// Keeps each collection as a JSON value, so records go through the same
/// serialization as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RefCell<HashMap<CollectionKey, serde_json::Value>>,
    saves: RefCell<HashMap<CollectionKey, usize>>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose saves always fail, for exercising fire-and-forget saves.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// How many times `key` has been saved.
    pub fn save_count(&self, key: CollectionKey) -> usize {
        self.saves.borrow().get(&key).copied().unwrap_or(0)
    }

    /// Raw stored value of a collection.
    pub fn raw(&self, key: CollectionKey) -> Option<serde_json::Value> {
        self.collections.borrow().get(&key).cloned()
    }
}

impl CollectionStore for MemoryStore {
    fn load<T: DeserializeOwned>(&self, key: CollectionKey) -> Result<Vec<T>> {
        match self.collections.borrow().get(&key) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(Vec::new()),
        }
    }

    fn save<T: Serialize>(&self, key: CollectionKey, records: &[T]) -> Result<()> {
        if self.fail_saves {
            return Err(TutorError::storage(format!("{} is read-only", key)));
        }
        let value = serde_json::to_value(records)?;
        self.collections.borrow_mut().insert(key, value);
        *self.saves.borrow_mut().entry(key).or_insert(0) += 1;
        Ok(())
    }
}
