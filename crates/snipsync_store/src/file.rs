//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StoreError, StoreResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const IMAGE_FILE: &str = "store.json";
const TEMP_FILE: &str = "store.json.tmp";
const LOCK_FILE: &str = "store.lock";

/// A file-based storage backend.
///
/// Persists the store image as a JSON file inside a directory, replacing
/// it atomically on every write (temp file + fsync + rename). An
/// exclusive lock file prevents two processes from opening the same
/// store directory concurrently.
///
/// # Example
///
/// ```no_run
/// use snipsync_store::FileBackend;
/// use std::path::Path;
///
/// let backend = FileBackend::open(Path::new("my_snippets")).unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
    /// Held for the lifetime of the backend; dropping releases the lock.
    _lock: File,
}

impl FileBackend {
    /// Opens or creates a store directory and acquires its lock.
    ///
    /// # Errors
    ///
    /// Returns `StoreLocked` if another process holds the lock, or an
    /// I/O error if the directory cannot be created.
    pub fn open(dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(dir)?;

        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))?;
        lock.try_lock_exclusive().map_err(|_| StoreError::StoreLocked)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            _lock: lock,
        })
    }

    /// Returns the store directory path.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StorageBackend for FileBackend {
    fn load(&self) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(self.dir.join(IMAGE_FILE)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, data: &[u8]) -> StoreResult<()> {
        let temp_path = self.dir.join(TEMP_FILE);

        let mut temp = File::create(&temp_path)?;
        temp.write_all(data)?;
        temp.sync_all()?;
        drop(temp);

        fs::rename(&temp_path, self.dir.join(IMAGE_FILE))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("store");

        let backend = FileBackend::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn store_then_load_roundtrips() {
        let tmp = TempDir::new().unwrap();
        let backend = FileBackend::open(tmp.path()).unwrap();

        backend.store(br#"{"schema_version":3}"#).unwrap();
        assert_eq!(
            backend.load().unwrap(),
            Some(br#"{"schema_version":3}"#.to_vec())
        );
    }

    #[test]
    fn store_replaces_previous_image() {
        let tmp = TempDir::new().unwrap();
        let backend = FileBackend::open(tmp.path()).unwrap();

        backend.store(b"old").unwrap();
        backend.store(b"new").unwrap();
        assert_eq!(backend.load().unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn second_open_is_rejected_while_locked() {
        let tmp = TempDir::new().unwrap();
        let _first = FileBackend::open(tmp.path()).unwrap();

        let second = FileBackend::open(tmp.path());
        assert!(matches!(second, Err(StoreError::StoreLocked)));
    }

    #[test]
    fn lock_released_on_drop() {
        let tmp = TempDir::new().unwrap();
        {
            let _backend = FileBackend::open(tmp.path()).unwrap();
        }
        assert!(FileBackend::open(tmp.path()).is_ok());
    }

    #[test]
    fn survives_reopen() {
        let tmp = TempDir::new().unwrap();
        {
            let backend = FileBackend::open(tmp.path()).unwrap();
            backend.store(b"persisted").unwrap();
        }
        let backend = FileBackend::open(tmp.path()).unwrap();
        assert_eq!(backend.load().unwrap(), Some(b"persisted".to_vec()));
    }
}
