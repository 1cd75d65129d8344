//! Tagged request surface for UI layers.
//!
//! UI processes talk to the store through a message channel. Rather than
//! a string-keyed action switch, the surface is a closed enum with an
//! exhaustive handler, so adding an operation without handling it is a
//! compile error.

use crate::error::StoreResult;
use crate::store::{NewSnippet, SnippetFilter, SnippetPatch, SnippetStore};
use snipsync_protocol::{Snippet, SnippetId};

/// A request against the store.
#[derive(Debug, Clone)]
pub enum StoreRequest {
    /// List active snippets.
    GetSnippets {
        /// Search filter for the listing.
        filter: SnippetFilter,
    },
    /// List trashed snippets.
    GetTrash,
    /// Create a snippet.
    SaveSnippet {
        /// The snippet content.
        data: NewSnippet,
    },
    /// Edit a snippet.
    UpdateSnippet {
        /// Target id.
        id: SnippetId,
        /// Fields to change.
        patch: SnippetPatch,
    },
    /// Move a snippet to the trash.
    SoftDeleteSnippet {
        /// Target id.
        id: SnippetId,
    },
    /// Restore a trashed snippet.
    RestoreSnippet {
        /// Target id.
        id: SnippetId,
    },
    /// Schedule a snippet for permanent removal.
    PurgeSnippet {
        /// Target id.
        id: SnippetId,
    },
    /// Purge everything currently in the trash.
    EmptyTrash,
    /// Read a setting.
    GetSetting {
        /// Setting key.
        key: String,
    },
    /// Write a setting.
    SetSetting {
        /// Setting key.
        key: String,
        /// New value.
        value: serde_json::Value,
    },
}

/// A successful response to a [`StoreRequest`].
#[derive(Debug, Clone)]
pub enum StoreResponse {
    /// A snippet listing.
    Snippets(Vec<Snippet>),
    /// A single affected snippet.
    Snippet(Snippet),
    /// A setting value, if present.
    Setting(Option<serde_json::Value>),
    /// Number of records affected.
    Count(usize),
    /// Acknowledgement with no payload.
    Done,
}

/// Handles one request. Every variant is matched explicitly.
pub fn handle_request(store: &SnippetStore, request: StoreRequest) -> StoreResult<StoreResponse> {
    match request {
        StoreRequest::GetSnippets { filter } => {
            Ok(StoreResponse::Snippets(store.active(&filter)))
        }
        StoreRequest::GetTrash => Ok(StoreResponse::Snippets(store.trashed())),
        StoreRequest::SaveSnippet { data } => Ok(StoreResponse::Snippet(store.save(data)?)),
        StoreRequest::UpdateSnippet { id, patch } => {
            Ok(StoreResponse::Snippet(store.update(&id, patch)?))
        }
        StoreRequest::SoftDeleteSnippet { id } => {
            Ok(StoreResponse::Snippet(store.soft_delete(&id)?))
        }
        StoreRequest::RestoreSnippet { id } => Ok(StoreResponse::Snippet(store.restore(&id)?)),
        StoreRequest::PurgeSnippet { id } => Ok(StoreResponse::Snippet(store.purge(&id)?)),
        StoreRequest::EmptyTrash => Ok(StoreResponse::Count(store.purge_trashed()?)),
        StoreRequest::GetSetting { key } => {
            Ok(StoreResponse::Setting(store.get_setting(&key)))
        }
        StoreRequest::SetSetting { key, value } => {
            store.set_setting(&key, value)?;
            Ok(StoreResponse::Done)
        }
    }
}
