//! In-memory store for tests and headless runs

use std::collections::HashMap;

use serde_json::Value;

use super::{Key, Store, StoreError};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<Key, Value>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl Store for MemoryStore {
    fn read(&self, key: Key) -> Result<Option<Value>, StoreError> {
        Ok(self.documents.get(&key).cloned())
    }

    fn write(&mut self, key: Key, value: Value) -> Result<(), StoreError> {
        self.documents.insert(key, value);
        self.writes += 1;
        Ok(())
    }
}
