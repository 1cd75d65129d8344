//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::StoreResult;
use parking_lot::RwLock;

/// An in-memory storage backend.
///
/// Holds the image in memory; suitable for unit tests, integration tests,
/// and ephemeral stores that don't need persistence.
///
/// # Example
///
/// ```rust
/// use snipsync_store::{MemoryBackend, StorageBackend};
///
/// let backend = MemoryBackend::new();
/// assert!(backend.load().unwrap().is_none());
/// backend.store(b"{}").unwrap();
/// assert_eq!(backend.load().unwrap(), Some(b"{}".to_vec()));
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    image: RwLock<Option<Vec<u8>>>,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-seeded with an image.
    ///
    /// Useful for testing open-from-existing-data scenarios.
    #[must_use]
    pub fn with_image(image: Vec<u8>) -> Self {
        Self {
            image: RwLock::new(Some(image)),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.image.read().clone())
    }

    fn store(&self, data: &[u8]) -> StoreResult<()> {
        *self.image.write() = Some(data.to_vec());
        Ok(())
    }
}
