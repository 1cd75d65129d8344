//! # Snipsync Protocol
//!
//! Pure data types and algorithms for snippet synchronization.
//!
//! This crate provides:
//! - The [`Snippet`] record shared by local storage and the sync wire format
//! - The last-writer-wins [`merge`] engine
//! - The [`SyncBundle`] envelope exchanged with remote stores
//!
//! ## Key Invariants
//!
//! - `merge` is a pure function: no I/O, no mutation of its inputs
//! - Bundles carry the *complete* snippet universe, tombstones included,
//!   so deletions propagate instead of resurrecting on peers
//! - A malformed bundle document is an error; a malformed record inside an
//!   otherwise valid document is dropped, never a crash

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bundle;
mod error;
mod merge;
mod snippet;

pub use bundle::{SyncBundle, BUNDLE_VERSION};
pub use error::{ProtocolError, ProtocolResult};
pub use merge::{merge, MergeOptions};
pub use snippet::{Snippet, SnippetId, SnippetKind, MAX_TEXT_LEN};
