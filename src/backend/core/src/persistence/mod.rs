//! Wholesale persistence of the ledger collections.
//!
//! Each ledger maps to one flat collection that is loaded in full at startup
//! and rewritten in full after a mutation. There is no patch format.

pub mod json_file;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// The persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionKey {
    /// Students with nested logs and homework
    Students,
    /// The global grading log
    GradingLogs,
    /// Stamp and penalty events
    RewardLogs,
}

impl CollectionKey {
    /// Storage name of the collection.
    pub const fn name(&self) -> &'static str {
        match self {
            CollectionKey::Students => "tutor-students",
            CollectionKey::GradingLogs => "tutor-logs",
            CollectionKey::RewardLogs => "tutor-rewards",
        }
    }
}

impl std::fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Loads and saves whole collections.
pub trait CollectionStore {
    /// Load a collection. A collection that was never saved is empty.
    fn load<T: DeserializeOwned>(&self, key: CollectionKey) -> Result<Vec<T>>;

    /// Replace a collection with `records`.
    fn save<T: Serialize>(&self, key: CollectionKey, records: &[T]) -> Result<()>;
}

impl<S: CollectionStore + ?Sized> CollectionStore for &S {
    fn load<T: DeserializeOwned>(&self, key: CollectionKey) -> Result<Vec<T>> {
        (**self).load(key)
    }

    fn save<T: Serialize>(&self, key: CollectionKey, records: &[T]) -> Result<()> {
        (**self).save(key, records)
    }
}
