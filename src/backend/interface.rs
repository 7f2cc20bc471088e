use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("key not found: {0}")]
    KeyNotFound(String),
    #[error("key already exists: {0}")]
    KeyExists(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage format error: {0}")]
    Format(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// Key-value store of encoded account records.
pub trait AccountStore: Send + Sync {
    /// Reads the value under `key` from a consistent snapshot.
    fn read(&self, key: &str) -> Result<Vec<u8>>;

    /// Runs `f` on the current value of `key` and stores the bytes it
    /// returns. The read and the write are isolated from every other
    /// `update` on the same key, and nothing is written when `f` fails.
    fn update<T, E, F>(&self, key: &str, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&[u8]) -> std::result::Result<(Vec<u8>, T), E>,
        E: From<BackendError>;

    /// Stores a value under a key that must not exist yet.
    fn insert(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// All keys, sorted.
    fn keys(&self) -> Result<Vec<String>>;
}
