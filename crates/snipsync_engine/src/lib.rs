//! # Snipsync Engine
//!
//! Sync orchestration for the snippet store.
//!
//! This crate drives the end-to-end protocol per backend: ensure the
//! remote location exists, download, merge, detect
//! remote-changed-during-merge races via the change token, re-merge if
//! needed, upload, and persist the new change token and last-sync
//! timestamp.
//!
//! ## Key Invariants
//!
//! - Fetch-before-merge-before-upload is strict within one cycle
//! - A failed cycle never deletes local data; each step's failure
//!   short-circuits the rest and is reported with the step name
//! - Callers serialize cycles; the engine never runs two concurrently
//!   for the same backend

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod orchestrator;

pub use config::{SyncBackend, SyncConfig, SyncOptions};
pub use error::{SyncError, SyncResult, SyncStep};
pub use orchestrator::{SyncOrchestrator, SyncReport};

use snipsync_store::SnippetStore;
use snipsync_transport::{
    DriveRemote, HttpClient, TokenProvider, WebDavConfig, WebDavRemote,
};

/// Runs one sync cycle against a WebDAV share.
pub fn sync_webdav<C: HttpClient>(
    store: &SnippetStore,
    client: C,
    config: &WebDavConfig,
    options: SyncOptions,
) -> SyncReport {
    let remote = WebDavRemote::new(client, config);
    SyncOrchestrator::new(store, &remote, options).run()
}

/// Runs one sync cycle against Google Drive.
pub fn sync_google_drive<C: HttpClient, T: TokenProvider>(
    store: &SnippetStore,
    client: C,
    tokens: T,
    options: SyncOptions,
) -> SyncReport {
    let remote = DriveRemote::new(client, tokens);
    SyncOrchestrator::new(store, &remote, options).run()
}
