//! CLI command implementations.

pub mod add;
pub mod backend;
pub mod list;
pub mod status;
pub mod sync;
pub mod trash;

use snipsync_store::{FileBackend, SnippetStore};
use std::path::Path;

/// Opens the file-backed store at the given directory.
pub fn open_store(path: &Path) -> Result<SnippetStore, Box<dyn std::error::Error>> {
    let backend = FileBackend::open(path)?;
    Ok(SnippetStore::open(backend)?)
}
