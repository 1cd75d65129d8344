//! The snippet store facade.

use crate::backend::StorageBackend;
use crate::clock::{Clock, SystemClock};
use crate::error::{StoreError, StoreResult};
use crate::feed::{ChangeEvent, ChangeFeed};
use crate::image::StoreImage;
use crate::keys;
use parking_lot::RwLock;
use snipsync_protocol::{Snippet, SnippetId, SnippetKind};
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// How long a purged snippet is retained before the sweep may remove it.
pub const RETENTION_WINDOW_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Input for creating a snippet.
#[derive(Debug, Clone)]
pub struct NewSnippet {
    /// Web clip or freeform note.
    pub kind: SnippetKind,
    /// Snippet text; clamped to the maximum length on save.
    pub text: String,
    /// Optional source URL; the domain is derived from it.
    pub url: Option<String>,
}

/// A partial edit to an existing snippet.
///
/// `None` fields are left unchanged. The outer/inner `Option` on `url`
/// distinguishes "leave the url alone" from "clear the url".
#[derive(Debug, Clone, Default)]
pub struct SnippetPatch {
    /// Replacement text, clamped on apply.
    pub text: Option<String>,
    /// Replacement source URL (`Some(None)` clears it).
    pub url: Option<Option<String>>,
}

impl SnippetPatch {
    /// A patch that replaces the text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Sets the url replacement on this patch.
    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = Some(url);
        self
    }
}

/// Filter for active-view listings.
#[derive(Debug, Clone, Default)]
pub struct SnippetFilter {
    /// Case-insensitive substring matched against text, domain, and url.
    pub search: Option<String>,
}

impl SnippetFilter {
    /// A filter matching everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter matching a search term.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
        }
    }

    fn matches(&self, snippet: &Snippet) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        let term = term.to_lowercase();
        snippet.text.to_lowercase().contains(&term)
            || snippet
                .domain
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
            || snippet
                .url
                .as_deref()
                .is_some_and(|u| u.to_lowercase().contains(&term))
    }
}

struct State {
    snippets: HashMap<SnippetId, Snippet>,
    settings: BTreeMap<String, serde_json::Value>,
}

/// Durable snippet storage with a soft-delete/purge lifecycle.
///
/// The store keeps the full record universe in memory, persists the whole
/// image through its [`StorageBackend`] after every committed mutation,
/// and emits a change event per affected record. All writes, foreground
/// edits and the sync layer's merge application alike, go through the
/// same overwrite-by-id upsert path, so a local edit concurrent with a
/// sync cycle is never silently lost: it simply becomes the newest
/// version for the next cycle to pick up.
pub struct SnippetStore {
    state: RwLock<State>,
    backend: Box<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    feed: ChangeFeed,
}

impl SnippetStore {
    /// Opens a store over a backend with the wall clock.
    pub fn open<B: StorageBackend + 'static>(backend: B) -> StoreResult<Self> {
        Self::open_with_clock(backend, Arc::new(SystemClock))
    }

    /// Opens a store over a backend with an injected clock.
    ///
    /// Loads and upgrades the persisted image, or starts empty if the
    /// backend holds nothing yet.
    pub fn open_with_clock<B: StorageBackend + 'static>(
        backend: B,
        clock: Arc<dyn Clock>,
    ) -> StoreResult<Self> {
        let image = match backend.load()? {
            Some(bytes) => StoreImage::decode(&bytes)?,
            None => StoreImage::new(),
        };

        tracing::info!(snippets = image.snippets.len(), "store opened");

        let snippets = image
            .snippets
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        Ok(Self {
            state: RwLock::new(State {
                snippets,
                settings: image.settings,
            }),
            backend: Box::new(backend),
            clock,
            feed: ChangeFeed::new(),
        })
    }

    /// Subscribes to the store's change feed.
    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        self.feed.subscribe()
    }

    /// Returns the current time from the store's clock.
    #[must_use]
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    // ------------------------------------------------------------------
    // Creation and editing
    // ------------------------------------------------------------------

    /// Creates a snippet: assigns an id, clamps the text, derives the
    /// domain, and stamps both timestamps.
    pub fn save(&self, new: NewSnippet) -> StoreResult<Snippet> {
        let now = self.clock.now_ms();
        let snippet = Snippet {
            id: SnippetId::new(),
            kind: new.kind,
            text: Snippet::clamp_text(&new.text),
            domain: new.url.as_deref().and_then(Snippet::domain_of),
            url: new.url,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            purged_at: None,
        };
        self.write_one(snippet)
    }

    /// Applies a partial edit; bumps `updated_at`.
    pub fn update(&self, id: &SnippetId, patch: SnippetPatch) -> StoreResult<Snippet> {
        self.mutate(id, |snippet, _now| {
            if let Some(text) = patch.text {
                snippet.text = Snippet::clamp_text(&text);
            }
            if let Some(url) = patch.url {
                snippet.domain = url.as_deref().and_then(Snippet::domain_of);
                snippet.url = url;
            }
        })
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Moves a snippet to the trash.
    pub fn soft_delete(&self, id: &SnippetId) -> StoreResult<Snippet> {
        self.mutate(id, |snippet, now| {
            snippet.deleted_at = Some(now);
        })
    }

    /// Restores a trashed snippet to the active view.
    ///
    /// Purged snippets are hidden everywhere and cannot be restored; they
    /// report as not found, preserving the purge-implies-deleted
    /// invariant.
    pub fn restore(&self, id: &SnippetId) -> StoreResult<Snippet> {
        if self.get(id).is_some_and(|s| s.is_purged()) {
            return Err(StoreError::not_found(id.as_str()));
        }
        self.mutate(id, |snippet, _now| {
            snippet.deleted_at = None;
        })
    }

    /// Schedules a snippet for permanent removal.
    ///
    /// Sets `purged_at` and, if the record was still active, `deleted_at`
    /// as well. The record stays in the store as a tombstone until the
    /// retention sweep removes it.
    pub fn purge(&self, id: &SnippetId) -> StoreResult<Snippet> {
        self.mutate(id, |snippet, now| {
            snippet.purged_at = Some(now);
            if snippet.deleted_at.is_none() {
                snippet.deleted_at = Some(now);
            }
        })
    }

    /// Purges every snippet currently in the trash. Returns the count.
    pub fn purge_trashed(&self) -> StoreResult<usize> {
        let now = self.clock.now_ms();
        let mut state = self.state.write();

        let backup = state.snippets.clone();
        let mut changed = Vec::new();
        for snippet in state.snippets.values_mut() {
            if snippet.is_trashed() {
                snippet.purged_at = Some(now);
                snippet.updated_at = now;
                changed.push(snippet.clone());
            }
        }
        if changed.is_empty() {
            return Ok(0);
        }

        if let Err(e) = self.persist(&state) {
            state.snippets = backup;
            return Err(e);
        }
        drop(state);

        for snippet in &changed {
            self.feed.emit(ChangeEvent::upserted(snippet.clone()));
        }
        Ok(changed.len())
    }

    /// Hard-deletes purged snippets past the retention window.
    ///
    /// A record is removed only once both conditions hold: its purge age
    /// exceeds [`RETENTION_WINDOW_MS`], and a successful sync has
    /// happened since it was purged, so the tombstone has had a chance
    /// to propagate. Returns the number of records removed.
    pub fn sweep_expired(&self, now_ms: i64) -> StoreResult<usize> {
        let mut state = self.state.write();

        let Some(last_synced) = state
            .settings
            .get(keys::LAST_SYNCED_AT)
            .and_then(serde_json::Value::as_i64)
        else {
            return Ok(0);
        };

        let expired: Vec<SnippetId> = state
            .snippets
            .values()
            .filter(|s| {
                s.purged_at.is_some_and(|purged| {
                    now_ms - purged > RETENTION_WINDOW_MS && last_synced >= purged
                })
            })
            .map(|s| s.id.clone())
            .collect();
        if expired.is_empty() {
            return Ok(0);
        }

        let backup = state.snippets.clone();
        for id in &expired {
            state.snippets.remove(id);
        }

        if let Err(e) = self.persist(&state) {
            state.snippets = backup;
            return Err(e);
        }
        drop(state);

        tracing::debug!(removed = expired.len(), "retention sweep");
        for id in expired.iter().cloned() {
            self.feed.emit(ChangeEvent::removed(id));
        }
        Ok(expired.len())
    }

    // ------------------------------------------------------------------
    // Sync primitives
    // ------------------------------------------------------------------

    /// Writes a record as-is, overwriting any record with the same id.
    ///
    /// This is the merge applier's primitive: timestamps are taken from
    /// the record, not bumped. Ids absent from a merged result are never
    /// cleaned up through this path; deletion is always explicit via
    /// tombstones, never via absence.
    pub fn upsert(&self, snippet: Snippet) -> StoreResult<()> {
        self.write_one(snippet)?;
        Ok(())
    }

    /// Writes a batch of records atomically: either the whole batch is
    /// persisted or the in-memory image is rolled back.
    pub fn upsert_many(&self, snippets: Vec<Snippet>) -> StoreResult<usize> {
        if snippets.is_empty() {
            return Ok(0);
        }

        let mut state = self.state.write();
        let backup = state.snippets.clone();
        for snippet in &snippets {
            state.snippets.insert(snippet.id.clone(), snippet.clone());
        }

        if let Err(e) = self.persist(&state) {
            state.snippets = backup;
            return Err(e);
        }
        drop(state);

        let count = snippets.len();
        for snippet in snippets {
            self.feed.emit(ChangeEvent::upserted(snippet));
        }
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Returns a snippet by id, in any lifecycle state.
    #[must_use]
    pub fn get(&self, id: &SnippetId) -> Option<Snippet> {
        self.state.read().snippets.get(id).cloned()
    }

    /// Active snippets matching a filter, newest creation first.
    #[must_use]
    pub fn active(&self, filter: &SnippetFilter) -> Vec<Snippet> {
        let mut out: Vec<Snippet> = self
            .state
            .read()
            .snippets
            .values()
            .filter(|s| s.is_active() && filter.matches(s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// Trashed snippets (purged excluded), most recently deleted first.
    #[must_use]
    pub fn trashed(&self) -> Vec<Snippet> {
        let mut out: Vec<Snippet> = self
            .state
            .read()
            .snippets
            .values()
            .filter(|s| s.is_trashed())
            .cloned()
            .collect();
        out.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        out
    }

    /// The complete snippet universe: active, trashed, and purged.
    ///
    /// This is the only correct input for bundling; a partial read would
    /// drop tombstones and resurrect deletions on peers.
    #[must_use]
    pub fn all_including_deleted(&self) -> Vec<Snippet> {
        self.state.read().snippets.values().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    /// Reads a setting.
    #[must_use]
    pub fn get_setting(&self, key: &str) -> Option<serde_json::Value> {
        self.state.read().settings.get(key).cloned()
    }

    /// Writes a setting.
    pub fn set_setting(&self, key: &str, value: serde_json::Value) -> StoreResult<()> {
        let mut state = self.state.write();
        let previous = state.settings.insert(key.to_owned(), value);

        if let Err(e) = self.persist(&state) {
            match previous {
                Some(p) => state.settings.insert(key.to_owned(), p),
                None => state.settings.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn write_one(&self, snippet: Snippet) -> StoreResult<Snippet> {
        let mut state = self.state.write();
        let previous = state.snippets.insert(snippet.id.clone(), snippet.clone());

        if let Err(e) = self.persist(&state) {
            match previous {
                Some(p) => state.snippets.insert(snippet.id.clone(), p),
                None => state.snippets.remove(&snippet.id),
            };
            return Err(e);
        }
        drop(state);

        self.feed.emit(ChangeEvent::upserted(snippet.clone()));
        Ok(snippet)
    }

    fn mutate(
        &self,
        id: &SnippetId,
        apply: impl FnOnce(&mut Snippet, i64),
    ) -> StoreResult<Snippet> {
        let now = self.clock.now_ms();
        let mut state = self.state.write();

        let mut next = state
            .snippets
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id.as_str()))?;
        apply(&mut next, now);
        next.updated_at = now;

        let previous = state.snippets.insert(id.clone(), next.clone());
        if let Err(e) = self.persist(&state) {
            if let Some(p) = previous {
                state.snippets.insert(id.clone(), p);
            }
            return Err(e);
        }
        drop(state);

        self.feed.emit(ChangeEvent::upserted(next.clone()));
        Ok(next)
    }

    fn persist(&self, state: &State) -> StoreResult<()> {
        let mut snippets: Vec<Snippet> = state.snippets.values().cloned().collect();
        snippets.sort_by(|a, b| a.id.cmp(&b.id));

        let image = StoreImage {
            schema_version: crate::image::SCHEMA_VERSION,
            snippets,
            settings: state.settings.clone(),
        };
        self.backend.store(&image.encode()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use snipsync_protocol::MAX_TEXT_LEN;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

    struct TestClock(AtomicI64);

    impl TestClock {
        fn at(ms: i64) -> Arc<Self> {
            Arc::new(Self(AtomicI64::new(ms)))
        }

        fn set(&self, ms: i64) {
            self.0.store(ms, Ordering::SeqCst);
        }
    }

    impl Clock for TestClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn store_at(ms: i64) -> (SnippetStore, Arc<TestClock>) {
        let clock = TestClock::at(ms);
        let store =
            SnippetStore::open_with_clock(MemoryBackend::new(), Arc::clone(&clock) as Arc<dyn Clock>)
                .unwrap();
        (store, clock)
    }

    fn note(text: &str) -> NewSnippet {
        NewSnippet {
            kind: SnippetKind::Note,
            text: text.into(),
            url: None,
        }
    }

    fn web(text: &str, url: &str) -> NewSnippet {
        NewSnippet {
            kind: SnippetKind::Web,
            text: text.into(),
            url: Some(url.into()),
        }
    }

    #[test]
    fn save_stamps_and_derives() {
        let (store, _) = store_at(1000);
        let s = store.save(web("clip", "https://blog.example.com/post")).unwrap();

        assert_eq!(s.created_at, 1000);
        assert_eq!(s.updated_at, 1000);
        assert_eq!(s.domain.as_deref(), Some("blog.example.com"));
        assert!(s.is_active());
        assert_eq!(store.get(&s.id), Some(s));
    }

    #[test]
    fn save_clamps_text() {
        let (store, _) = store_at(1);
        let long = "x".repeat(500);
        let s = store.save(note(&long)).unwrap();
        assert_eq!(s.text.chars().count(), MAX_TEXT_LEN);
    }

    #[test]
    fn update_bumps_updated_at_only() {
        let (store, clock) = store_at(1000);
        let s = store.save(note("before")).unwrap();

        clock.set(2000);
        let edited = store.update(&s.id, SnippetPatch::text("after")).unwrap();

        assert_eq!(edited.text, "after");
        assert_eq!(edited.created_at, 1000);
        assert_eq!(edited.updated_at, 2000);
    }

    #[test]
    fn update_url_rederives_domain() {
        let (store, _) = store_at(1);
        let s = store.save(web("t", "https://a.example.com/x")).unwrap();

        let moved = store
            .update(
                &s.id,
                SnippetPatch::default().with_url(Some("https://b.example.org/y".into())),
            )
            .unwrap();
        assert_eq!(moved.domain.as_deref(), Some("b.example.org"));

        let cleared = store
            .update(&s.id, SnippetPatch::default().with_url(None))
            .unwrap();
        assert_eq!(cleared.url, None);
        assert_eq!(cleared.domain, None);
    }

    #[test]
    fn update_unknown_id_fails() {
        let (store, _) = store_at(1);
        let err = store
            .update(&SnippetId::from("missing"), SnippetPatch::text("x"))
            .unwrap_err();
        assert!(matches!(err, StoreError::SnippetNotFound { .. }));
    }

    #[test]
    fn trash_restore_lifecycle() {
        let (store, clock) = store_at(1000);
        let s = store.save(note("keep me")).unwrap();

        clock.set(2000);
        let trashed = store.soft_delete(&s.id).unwrap();
        assert_eq!(trashed.deleted_at, Some(2000));
        assert_eq!(trashed.updated_at, 2000);
        assert!(store.active(&SnippetFilter::all()).is_empty());
        assert_eq!(store.trashed().len(), 1);

        clock.set(3000);
        let restored = store.restore(&s.id).unwrap();
        assert_eq!(restored.deleted_at, None);
        assert_eq!(restored.updated_at, 3000);
        assert_eq!(store.active(&SnippetFilter::all()).len(), 1);
        assert!(store.trashed().is_empty());
    }

    #[test]
    fn purge_sets_both_tombstones() {
        let (store, clock) = store_at(1000);
        let s = store.save(note("doomed")).unwrap();

        clock.set(2000);
        let purged = store.purge(&s.id).unwrap();
        assert_eq!(purged.purged_at, Some(2000));
        assert_eq!(purged.deleted_at, Some(2000));

        // Hidden from every view, still present in the universe.
        assert!(store.active(&SnippetFilter::all()).is_empty());
        assert!(store.trashed().is_empty());
        assert_eq!(store.all_including_deleted().len(), 1);
    }

    #[test]
    fn purged_snippet_cannot_be_restored() {
        let (store, _) = store_at(1000);
        let s = store.save(note("gone")).unwrap();
        store.purge(&s.id).unwrap();

        let err = store.restore(&s.id).unwrap_err();
        assert!(matches!(err, StoreError::SnippetNotFound { .. }));
    }

    #[test]
    fn empty_trash_purges_only_trashed() {
        let (store, _) = store_at(1000);
        let active = store.save(note("stay")).unwrap();
        let t1 = store.save(note("trash1")).unwrap();
        let t2 = store.save(note("trash2")).unwrap();
        store.soft_delete(&t1.id).unwrap();
        store.soft_delete(&t2.id).unwrap();

        assert_eq!(store.purge_trashed().unwrap(), 2);
        assert!(store.get(&active.id).unwrap().is_active());
        assert!(store.get(&t1.id).unwrap().is_purged());
        assert!(store.get(&t2.id).unwrap().is_purged());
        assert_eq!(store.purge_trashed().unwrap(), 0);
    }

    #[test]
    fn search_filter_matches_text_domain_url() {
        let (store, _) = store_at(1);
        store.save(note("Rust ownership")).unwrap();
        store.save(web("borrow checker", "https://doc.rust-lang.org/book")).unwrap();
        store.save(note("unrelated")).unwrap();

        assert_eq!(store.active(&SnippetFilter::search("rust")).len(), 2);
        assert_eq!(store.active(&SnippetFilter::search("doc.rust-lang")).len(), 1);
        assert_eq!(store.active(&SnippetFilter::search("nothing")).len(), 0);
        assert_eq!(store.active(&SnippetFilter::all()).len(), 3);
    }

    #[test]
    fn active_sorted_newest_first() {
        let (store, clock) = store_at(100);
        store.save(note("old")).unwrap();
        clock.set(300);
        store.save(note("new")).unwrap();
        clock.set(200);
        store.save(note("mid")).unwrap();

        let texts: Vec<_> = store
            .active(&SnippetFilter::all())
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(texts, vec!["new", "mid", "old"]);
    }

    #[test]
    fn upsert_preserves_record_timestamps() {
        let (store, _) = store_at(9999);
        let incoming = Snippet {
            id: SnippetId::from("remote-1"),
            kind: SnippetKind::Web,
            text: "from the peer".into(),
            url: None,
            domain: None,
            created_at: 10,
            updated_at: 20,
            deleted_at: None,
            purged_at: None,
        };

        store.upsert(incoming.clone()).unwrap();
        assert_eq!(store.get(&incoming.id), Some(incoming));
    }

    #[test]
    fn upsert_many_writes_all() {
        let (store, _) = store_at(1);
        let batch: Vec<Snippet> = (0..5)
            .map(|i| Snippet {
                id: SnippetId::from(format!("id-{i}").as_str()),
                kind: SnippetKind::Note,
                text: format!("t{i}"),
                url: None,
                domain: None,
                created_at: i,
                updated_at: i,
                deleted_at: None,
                purged_at: None,
            })
            .collect();

        assert_eq!(store.upsert_many(batch).unwrap(), 5);
        assert_eq!(store.all_including_deleted().len(), 5);
        assert_eq!(store.upsert_many(Vec::new()).unwrap(), 0);
    }

    #[test]
    fn settings_roundtrip() {
        let (store, _) = store_at(1);
        assert_eq!(store.get_setting(keys::LANGUAGE), None);

        store
            .set_setting(keys::LANGUAGE, serde_json::json!("en"))
            .unwrap();
        assert_eq!(
            store.get_setting(keys::LANGUAGE),
            Some(serde_json::json!("en"))
        );
    }

    #[test]
    fn state_survives_reopen() {
        let backend = Arc::new(MemoryBackend::new());
        let clock = TestClock::at(42);
        let id = {
            let store = SnippetStore::open_with_clock(
                Arc::clone(&backend),
                Arc::clone(&clock) as Arc<dyn Clock>,
            )
            .unwrap();
            store
                .set_setting(keys::LANGUAGE, serde_json::json!("ja"))
                .unwrap();
            store.save(note("durable")).unwrap().id
        };

        let reopened = SnippetStore::open(Arc::clone(&backend)).unwrap();
        assert_eq!(reopened.get(&id).unwrap().text, "durable");
        assert_eq!(
            reopened.get_setting(keys::LANGUAGE),
            Some(serde_json::json!("ja"))
        );
    }

    #[test]
    fn sweep_requires_sync_and_age() {
        let (store, clock) = store_at(1000);
        let s = store.save(note("expired")).unwrap();
        store.purge(&s.id).unwrap(); // purged_at = 1000

        let past_window = 1000 + RETENTION_WINDOW_MS + 1;

        // Never synced: nothing is removed no matter the age.
        assert_eq!(store.sweep_expired(past_window).unwrap(), 0);

        // Synced before the purge: tombstone has not propagated yet.
        store
            .set_setting(keys::LAST_SYNCED_AT, serde_json::json!(500))
            .unwrap();
        assert_eq!(store.sweep_expired(past_window).unwrap(), 0);

        // Synced after the purge but still inside the window.
        store
            .set_setting(keys::LAST_SYNCED_AT, serde_json::json!(2000))
            .unwrap();
        assert_eq!(store.sweep_expired(1000 + RETENTION_WINDOW_MS).unwrap(), 0);

        // Both conditions hold.
        assert_eq!(store.sweep_expired(past_window).unwrap(), 1);
        assert_eq!(store.all_including_deleted().len(), 0);

        let _ = clock;
    }

    #[test]
    fn change_feed_reports_mutations() {
        let (store, _) = store_at(1);
        let rx = store.subscribe();

        let s = store.save(note("watched")).unwrap();
        let event = rx.recv().unwrap();
        assert_eq!(event.kind, crate::feed::ChangeKind::Upserted);
        assert_eq!(event.id, s.id);

        store.soft_delete(&s.id).unwrap();
        assert!(rx.recv().unwrap().snippet.unwrap().is_trashed());
    }

    struct FlakyBackend {
        inner: MemoryBackend,
        fail: AtomicBool,
    }

    impl StorageBackend for FlakyBackend {
        fn load(&self) -> StoreResult<Option<Vec<u8>>> {
            self.inner.load()
        }

        fn store(&self, data: &[u8]) -> StoreResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Io(std::io::Error::other("disk on fire")));
            }
            self.inner.store(data)
        }
    }

    #[test]
    fn failed_persist_rolls_back_memory() {
        let backend = Arc::new(FlakyBackend {
            inner: MemoryBackend::new(),
            fail: AtomicBool::new(false),
        });
        let store = SnippetStore::open(Arc::clone(&backend)).unwrap();
        let kept = store.save(note("kept")).unwrap();

        backend.fail.store(true, Ordering::SeqCst);
        assert!(store.save(note("lost")).is_err());
        assert!(store
            .update(&kept.id, SnippetPatch::text("changed"))
            .is_err());

        // The in-memory image still matches the last durable state.
        assert_eq!(store.all_including_deleted().len(), 1);
        assert_eq!(store.get(&kept.id).unwrap().text, "kept");
    }
}
