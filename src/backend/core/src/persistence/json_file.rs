//! One pretty-printed JSON file per collection.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{CollectionKey, CollectionStore};
use crate::error::{ErrorCode, ErrorContext, Result, TutorError};

/// Stores each collection as `<data_dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, key: CollectionKey) -> PathBuf {
        self.data_dir.join(format!("{}.json", key.name()))
    }
}

impl CollectionStore for JsonFileStore {
    fn load<T: DeserializeOwned>(&self, key: CollectionKey) -> Result<Vec<T>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| TutorError::from(e).with_internal_message(format!("reading {}", path.display())))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<T> = serde_json::from_str(&content)?;
        debug!(collection = %key, records = records.len(), "Collection loaded");
        Ok(records)
    }

    fn save<T: Serialize>(&self, key: CollectionKey, records: &[T]) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(records)?;
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path).with_error_code(ErrorCode::StorageError)?;
        debug!(collection = %key, records = records.len(), "Collection saved");
        Ok(())
    }
}
