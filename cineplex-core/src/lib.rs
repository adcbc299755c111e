pub mod repository;

pub use repository::{KeyValueStore, StorageError};

/// Errors the booking core reports to its host. Every variant is recoverable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Unparseable timestamp: {0}")]
    Parse(String),
    #[error("No seats selected")]
    EmptySelection,
    #[error("Persistence failed: {0}")]
    Persistence(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_maps_to_persistence() {
        let err: CoreError = StorageError::QuotaExceeded { requested: 120, limit: 100 }.into();
        assert!(matches!(err, CoreError::Persistence(ref msg) if msg.contains("quota")));
    }
}
