use std::collections::HashMap;
use std::sync::RwLock;

use crate::backend::interface::{AccountStore, BackendError, Result};

/// Volatile store. Every update holds the write lock for its whole
/// read-modify-write, so updates are serialised across all keys.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Vec<u8>>>
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl AccountStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Vec<u8>> {
        let records = self.records.read().map_err(|_| BackendError::Poisoned)?;
        records.get(key)
            .cloned()
            .ok_or_else(|| BackendError::KeyNotFound(key.to_owned()))
    }

    fn update<T, E, F>(&self, key: &str, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&[u8]) -> std::result::Result<(Vec<u8>, T), E>,
        E: From<BackendError>
    {
        let mut records = self.records.write().map_err(|_| BackendError::Poisoned)?;
        let current = records.get_mut(key)
            .ok_or_else(|| BackendError::KeyNotFound(key.to_owned()))?;
        let (value, output) = f(current.as_slice())?;
        *current = value;
        return Ok(output);
    }

    fn insert(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut records = self.records.write().map_err(|_| BackendError::Poisoned)?;
        if records.contains_key(key) {
            return Err(BackendError::KeyExists(key.to_owned()));
        }
        records.insert(key.to_owned(), value);
        return Ok(());
    }

    fn keys(&self) -> Result<Vec<String>> {
        let records = self.records.read().map_err(|_| BackendError::Poisoned)?;
        let mut keys: Vec<String> = records.keys().cloned().collect();
        keys.sort();
        return Ok(keys);
    }
}
