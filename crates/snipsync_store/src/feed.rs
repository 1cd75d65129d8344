//! Change feed for observing committed store mutations.
//!
//! The feed emits an event after every committed mutation, letting UI
//! surfaces refresh without polling. Events are emitted only after the
//! image has been persisted.

use parking_lot::RwLock;
use snipsync_protocol::{Snippet, SnippetId};
use std::sync::mpsc::{self, Receiver, Sender};

/// Type of change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A record was written (created, edited, or upserted by sync).
    Upserted,
    /// A record was physically removed by the retention sweep.
    Removed,
}

/// A single change event.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Type of change.
    pub kind: ChangeKind,
    /// The affected snippet id.
    pub id: SnippetId,
    /// New record state. `None` for removals.
    pub snippet: Option<Snippet>,
}

impl ChangeEvent {
    /// Creates an upsert event.
    #[must_use]
    pub fn upserted(snippet: Snippet) -> Self {
        Self {
            kind: ChangeKind::Upserted,
            id: snippet.id.clone(),
            snippet: Some(snippet),
        }
    }

    /// Creates a removal event.
    #[must_use]
    pub fn removed(id: SnippetId) -> Self {
        Self {
            kind: ChangeKind::Removed,
            id,
            snippet: None,
        }
    }
}

/// Distributes change events to subscribers.
#[derive(Debug, Default)]
pub struct ChangeFeed {
    subscribers: RwLock<Vec<Sender<ChangeEvent>>>,
}

impl ChangeFeed {
    /// Creates a new change feed with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to the feed.
    ///
    /// Returns a receiver that will see all future events in commit order.
    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Emits an event to all live subscribers, dropping closed ones.
    pub fn emit(&self, event: ChangeEvent) {
        self.subscribers
            .write()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}
