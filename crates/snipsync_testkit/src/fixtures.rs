//! Snippet builders and store helpers.

use crate::clock::FixedClock;
use snipsync_protocol::{Snippet, SnippetId, SnippetKind};
use snipsync_store::{Clock, MemoryBackend, SnippetStore};
use std::sync::Arc;

/// Builder for snippet fixtures.
///
/// Starts from an active note and lets tests override exactly what they
/// care about.
#[derive(Debug, Clone)]
pub struct SnippetBuilder {
    snippet: Snippet,
}

impl SnippetBuilder {
    /// Starts a builder for the given id.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            snippet: Snippet {
                id: SnippetId::from(id),
                kind: SnippetKind::Note,
                text: format!("snippet {id}"),
                url: None,
                domain: None,
                created_at: 0,
                updated_at: 0,
                deleted_at: None,
                purged_at: None,
            },
        }
    }

    /// Sets the text.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.snippet.text = text.to_owned();
        self
    }

    /// Sets both timestamps.
    #[must_use]
    pub fn at(mut self, ms: i64) -> Self {
        self.snippet.created_at = ms;
        self.snippet.updated_at = ms;
        self
    }

    /// Sets only `updated_at`.
    #[must_use]
    pub fn updated_at(mut self, ms: i64) -> Self {
        self.snippet.updated_at = ms;
        self
    }

    /// Makes it a web clip with a source URL and derived domain.
    #[must_use]
    pub fn from_url(mut self, url: &str) -> Self {
        self.snippet.kind = SnippetKind::Web;
        self.snippet.domain = Snippet::domain_of(url);
        self.snippet.url = Some(url.to_owned());
        self
    }

    /// Moves it to the trash at the given time.
    #[must_use]
    pub fn trashed_at(mut self, ms: i64) -> Self {
        self.snippet.deleted_at = Some(ms);
        self.snippet.updated_at = ms;
        self
    }

    /// Purges it at the given time (also setting `deleted_at`).
    #[must_use]
    pub fn purged_at(mut self, ms: i64) -> Self {
        if self.snippet.deleted_at.is_none() {
            self.snippet.deleted_at = Some(ms);
        }
        self.snippet.purged_at = Some(ms);
        self.snippet.updated_at = ms;
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> Snippet {
        self.snippet
    }
}

/// An active note with matching timestamps.
#[must_use]
pub fn note(id: &str, text: &str, updated_at: i64) -> Snippet {
    SnippetBuilder::new(id).text(text).at(updated_at).build()
}

/// An active web clip.
#[must_use]
pub fn web_clip(id: &str, text: &str, url: &str, updated_at: i64) -> Snippet {
    SnippetBuilder::new(id)
        .text(text)
        .at(updated_at)
        .from_url(url)
        .build()
}

/// A trashed note.
#[must_use]
pub fn trashed(id: &str, deleted_at: i64) -> Snippet {
    SnippetBuilder::new(id).trashed_at(deleted_at).build()
}

/// A purged note.
#[must_use]
pub fn purged(id: &str, purged_at: i64) -> Snippet {
    SnippetBuilder::new(id).purged_at(purged_at).build()
}

/// An in-memory store on a [`FixedClock`] starting at `now_ms`.
#[must_use]
pub fn memory_store(now_ms: i64) -> (SnippetStore, Arc<FixedClock>) {
    let clock = FixedClock::at(now_ms);
    let store =
        SnippetStore::open_with_clock(MemoryBackend::new(), Arc::clone(&clock) as Arc<dyn Clock>)
            .expect("in-memory store cannot fail to open");
    (store, clock)
}
