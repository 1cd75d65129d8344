//! Storage backend trait definition.

use crate::error::StoreResult;

/// A whole-image storage backend for the snippet store.
///
/// Backends are **opaque byte stores**: they persist and return a single
/// image without interpreting it. The store owns the image format
/// (versioned JSON); backends do not understand snippets or settings.
///
/// # Invariants
///
/// - `load` returns exactly the bytes most recently passed to `store`,
///   or `None` if nothing has been stored yet
/// - `store` replaces the image atomically: a crash mid-write must leave
///   either the old image or the new one, never a torn mix
/// - Backends must be `Send + Sync` for shared access
///
/// # Implementors
///
/// - [`crate::MemoryBackend`] - for testing
/// - [`crate::FileBackend`] - for persistent storage
pub trait StorageBackend: Send + Sync {
    /// Loads the current image, or `None` if the store is new.
    fn load(&self) -> StoreResult<Option<Vec<u8>>>;

    /// Atomically replaces the image with `data`.
    fn store(&self, data: &[u8]) -> StoreResult<()>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<B> {
    fn load(&self) -> StoreResult<Option<Vec<u8>>> {
        (**self).load()
    }

    fn store(&self, data: &[u8]) -> StoreResult<()> {
        (**self).store(data)
    }
}
