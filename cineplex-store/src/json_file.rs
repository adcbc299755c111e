use cineplex_core::{KeyValueStore, StorageError};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{info, warn};

/// JSON file-backed backend: one object of `key -> value`, rewritten on every write.
///
/// A write that fails to reach disk leaves the in-memory map unchanged.
#[derive(Debug)]
pub struct JsonFileStore {
    inner: RwLock<HashMap<String, String>>,
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Open the store, creating the file (and parent directories) if missing.
    /// A document that is not valid JSON starts the store empty; any other read
    /// failure is an error and leaves the file alone.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
            }
        }

        let map: HashMap<String, String> = match fs::read(&file_path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("Ignoring unreadable store {}: {}", file_path.display(), e);
                HashMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty = HashMap::new();
                write_map(&file_path, &empty)?;
                info!("Created booking store at {}", file_path.display());
                empty
            }
            Err(e) => {
                return Err(StorageError::Io(format!("{}: {}", file_path.display(), e)));
            }
        };

        Ok(Self {
            inner: RwLock::new(map),
            file_path,
        })
    }

    fn update<F>(&self, f: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&mut HashMap<String, String>) -> bool,
    {
        let mut map = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        let mut next = map.clone();
        let changed = f(&mut next);
        write_map(&self.file_path, &next)?;
        *map = next;
        Ok(changed)
    }
}

fn write_map(path: &Path, map: &HashMap<String, String>) -> Result<(), StorageError> {
    let data = serde_json::to_vec_pretty(map).map_err(|e| StorageError::Serialization(e.to_string()))?;
    // Write beside the target and rename so a crash never leaves half a document
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).map_err(|e| StorageError::Io(e.to_string()))?;
    fs::rename(&tmp, path).map_err(|e| StorageError::Io(e.to_string()))
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.inner.read().map_err(|_| StorageError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
            true
        })
        .map(|_| ())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.update(|map| map.remove(key).is_some())
    }
}
