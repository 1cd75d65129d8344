//! # Snipsync Store
//!
//! Durable keyed snippet storage with a soft-delete/purge lifecycle and
//! settings key-value storage.
//!
//! This crate provides:
//! - [`SnippetStore`], the explicitly constructed store facade
//! - A whole-image [`StorageBackend`] trait with in-memory and file
//!   implementations
//! - A change feed for observing committed mutations
//! - The tagged [`StoreRequest`] surface consumed by UI layers
//!
//! ## Key Invariants
//!
//! - Every mutation goes through the store's single upsert path, bumps
//!   `updated_at`, persists the full image, then emits a change event
//! - Soft-deleted and purged records are retained as tombstones until the
//!   retention sweep removes them; sync relies on this
//! - The store is never global state: callers construct it with a backend
//!   and inject it where needed

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod clock;
mod error;
mod feed;
mod file;
mod image;
mod memory;
mod requests;
mod store;

pub mod keys;

pub use backend::StorageBackend;
pub use clock::{Clock, SystemClock};
pub use error::{StoreError, StoreResult};
pub use feed::{ChangeEvent, ChangeFeed, ChangeKind};
pub use file::FileBackend;
pub use image::SCHEMA_VERSION;
pub use memory::MemoryBackend;
pub use requests::{handle_request, StoreRequest, StoreResponse};
pub use store::{
    NewSnippet, SnippetFilter, SnippetPatch, SnippetStore, RETENTION_WINDOW_MS,
};
