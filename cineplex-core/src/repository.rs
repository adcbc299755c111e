/// String key-value storage scoped to one client, the persistence seam of the
/// booking core.
///
/// Implementations are synchronous. Writes may be rejected (quota, I/O) and callers
/// must not assume a value was stored when `set` returns an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key; returns whether it existed.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Storage quota exceeded: requested {requested} bytes, limit {limit}")]
    QuotaExceeded {
        requested: usize,
        limit: usize,
    },

    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Storage serialization error: {0}")]
    Serialization(String),

    #[error("Storage lock poisoned")]
    Poisoned,
}
