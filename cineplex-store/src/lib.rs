pub mod app_config;
pub mod memory;
pub mod json_file;
pub mod seat_inventory;

use std::sync::Arc;

use cineplex_core::{KeyValueStore, StorageError};

pub use memory::MemoryStore;
pub use json_file::JsonFileStore;
pub use seat_inventory::{BookedSeatSet, SeatInventoryStore};

/// Build the configured backend. Called once at startup; the result is shared
/// by handle with everything that persists seats.
pub fn open_backend(config: &app_config::StorageConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match config.backend {
        app_config::StorageBackend::Memory => {
            let store = match config.quota_bytes {
                Some(limit) => MemoryStore::with_quota(limit),
                None => MemoryStore::new(),
            };
            Ok(Arc::new(store))
        }
        app_config::StorageBackend::File => Ok(Arc::new(JsonFileStore::open(&config.path)?)),
    }
}
