use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::debug;

use crate::backend::interface::{AccountStore, BackendError, Result};

type Records = BTreeMap<String, serde_json::Value>;

/// Account records kept as one JSON object on disk, keyed by account id.
///
/// The file is rewritten through a temporary sibling and renamed into place,
/// so a reader never sees a half-written document. The in-process lock
/// serialises updates; the file is assumed to belong to a single process.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    lock: RwLock<()>
}

impl JsonStore {
    /// Opens the store at `path`, creating an empty one if the file is missing.
    pub fn open(path: impl AsRef<Path>) -> Result<JsonStore> {
        let store = JsonStore { path: path.as_ref().to_path_buf(), lock: RwLock::new(()) };
        if store.path.exists() {
            store.load()?;
        } else {
            debug!("creating empty store at {}", store.path.display());
            store.save(&Records::new())?;
        }
        return Ok(store);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Records> {
        let file = fs::File::open(&self.path)?;
        let records = serde_json::from_reader(BufReader::new(file))?;
        return Ok(records);
    }

    /// Sibling the document is written to before being renamed over `path`.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn save(&self, records: &Records) -> Result<()> {
        let staging = self.staging_path();
        {
            let mut file = fs::File::create(&staging)?;
            serde_json::to_writer_pretty(&mut file, records)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&staging, &self.path)?;
        return Ok(());
    }
}

impl AccountStore for JsonStore {
    fn read(&self, key: &str) -> Result<Vec<u8>> {
        let _guard = self.lock.read().map_err(|_| BackendError::Poisoned)?;
        let records = self.load()?;
        let value = records.get(key)
            .ok_or_else(|| BackendError::KeyNotFound(key.to_owned()))?;
        return Ok(serde_json::to_vec(value)?);
    }

    fn update<T, E, F>(&self, key: &str, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&[u8]) -> std::result::Result<(Vec<u8>, T), E>,
        E: From<BackendError>
    {
        let _guard = self.lock.write().map_err(|_| BackendError::Poisoned)?;
        let mut records = self.load()?;
        let current = records.get(key)
            .ok_or_else(|| BackendError::KeyNotFound(key.to_owned()))?;
        let current = serde_json::to_vec(current).map_err(BackendError::from)?;

        let (value, output) = f(&current)?;
        let value = serde_json::from_slice(&value).map_err(BackendError::from)?;
        records.insert(key.to_owned(), value);
        self.save(&records)?;
        return Ok(output);
    }

    fn insert(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let _guard = self.lock.write().map_err(|_| BackendError::Poisoned)?;
        let mut records = self.load()?;
        if records.contains_key(key) {
            return Err(BackendError::KeyExists(key.to_owned()));
        }
        records.insert(key.to_owned(), serde_json::from_slice(&value)?);
        return self.save(&records);
    }

    fn keys(&self) -> Result<Vec<String>> {
        let _guard = self.lock.read().map_err(|_| BackendError::Poisoned)?;
        Ok(self.load()?.into_keys().collect())
    }
}
