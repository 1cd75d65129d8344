//! The sync cycle state machine.
//!
//! One cycle is linear (ensure-location, fetch, merge, race-check,
//! bundle, upload, finalize) with a single bounded re-merge when the
//! race check observes a concurrent remote write. Cycles are never run
//! concurrently for one backend; the caller serializes invocations.

use crate::config::{SyncConfig, SyncOptions};
use crate::error::{SyncError, SyncResult, SyncStep};
use snipsync_protocol::{merge, MergeOptions, SyncBundle};
use snipsync_store::{keys, SnippetStore};
use snipsync_transport::RemoteStore;

/// Outcome of a sync cycle, shaped for the UI action surface.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Whether the cycle completed.
    pub success: bool,
    /// Records written back to the store by merge passes.
    pub merged_records: usize,
    /// Records removed by the post-cycle retention sweep.
    pub swept_records: usize,
    /// Human-readable failure description when `success` is false.
    pub error: Option<String>,
}

impl SyncReport {
    fn completed(merged_records: usize, swept_records: usize) -> Self {
        Self {
            success: true,
            merged_records,
            swept_records,
            error: None,
        }
    }

    fn failed(error: &SyncError) -> Self {
        Self {
            success: false,
            merged_records: 0,
            swept_records: 0,
            error: Some(error.to_string()),
        }
    }
}

struct CycleStats {
    merged_records: usize,
    swept_records: usize,
}

/// Drives one complete sync cycle against a remote store.
///
/// Local data is never lost: merges operate on snapshot reads and are
/// applied through the store's shared upsert path, so an upload failure
/// leaves the already-merged local state intact, and a local edit made
/// during the cycle simply wins the next one.
pub struct SyncOrchestrator<'a> {
    store: &'a SnippetStore,
    remote: &'a dyn RemoteStore,
    options: SyncOptions,
}

impl<'a> SyncOrchestrator<'a> {
    /// Creates an orchestrator over a store and a remote.
    pub fn new(store: &'a SnippetStore, remote: &'a dyn RemoteStore, options: SyncOptions) -> Self {
        Self {
            store,
            remote,
            options,
        }
    }

    /// Runs one cycle and reports the outcome.
    pub fn run(&self) -> SyncReport {
        match self.cycle() {
            Ok(stats) => {
                tracing::info!(
                    merged = stats.merged_records,
                    swept = stats.swept_records,
                    "sync cycle completed"
                );
                SyncReport::completed(stats.merged_records, stats.swept_records)
            }
            Err(error) => {
                tracing::warn!(step = ?error.step(), %error, "sync cycle failed");
                SyncReport::failed(&error)
            }
        }
    }

    fn cycle(&self) -> SyncResult<CycleStats> {
        // 1. EnsureLocation
        self.remote
            .ensure_location()
            .map_err(SyncError::remote(SyncStep::EnsureLocation))?;

        // 2. InitialFetch: download, merge, persist the observed token.
        // "No remote object yet" leaves the token unset.
        let fetch = self
            .remote
            .fetch_bundle()
            .map_err(SyncError::remote(SyncStep::Fetch))?;

        let mut merged_records = 0;
        if let Some(bundle) = fetch.bundle {
            merged_records += self.merge_bundle(bundle, SyncStep::Merge)?;
        }
        if fetch.change_token.is_some() {
            self.persist_token(fetch.change_token, SyncStep::Merge)?;
        }

        // 3. RaceCheck: if another writer moved the remote since the
        // fetch, re-merge before uploading over it. Bounded; a race past
        // the bound resolves on the next scheduled cycle.
        for _ in 0..self.options.race_check_limit {
            let persisted = SyncConfig::load(self.store).last_remote_etag;
            let Some(persisted) = persisted else {
                break;
            };
            let latest = self
                .remote
                .head_change_token()
                .map_err(SyncError::remote(SyncStep::RaceCheck))?;
            let Some(latest) = latest else {
                break;
            };
            if latest == persisted {
                break;
            }

            tracing::info!("remote changed during merge; refetching");
            let refreshed = self
                .remote
                .fetch_bundle()
                .map_err(SyncError::remote(SyncStep::RaceCheck))?;
            if let Some(bundle) = refreshed.bundle {
                merged_records += self.merge_bundle(bundle, SyncStep::RaceCheck)?;
            }
            if refreshed.change_token.is_some() {
                self.persist_token(refreshed.change_token, SyncStep::RaceCheck)?;
            }
        }

        // 4. Bundle: a fresh snapshot of the now-merged universe.
        let now = self.store.now_ms();
        let bundle = SyncBundle::build(self.store.all_including_deleted(), now);

        // 5. Upload. Local data is already merged and safe regardless of
        // the outcome here.
        let upload_token = self
            .remote
            .put_bundle(&bundle)
            .map_err(SyncError::remote(SyncStep::Upload))?;

        // 6. Finalize: resulting token, last-sync time, retention sweep.
        if upload_token.is_some() {
            self.persist_token(upload_token, SyncStep::Finalize)?;
        }
        self.store
            .set_setting(keys::LAST_SYNCED_AT, serde_json::Value::from(now))
            .map_err(SyncError::store(SyncStep::Finalize))?;

        let swept_records = if self.options.sweep_after_sync {
            self.store
                .sweep_expired(now)
                .map_err(SyncError::store(SyncStep::Finalize))?
        } else {
            0
        };

        Ok(CycleStats {
            merged_records,
            swept_records,
        })
    }

    /// Merges a remote bundle into the store: snapshot read of the full
    /// universe, pure merge, then an atomic upsert of every resulting
    /// record. Overwrite-by-id only: ids never disappear here, deletion
    /// travels as tombstones.
    fn merge_bundle(&self, bundle: SyncBundle, step: SyncStep) -> SyncResult<usize> {
        let local = self.store.all_including_deleted();
        let merged = merge(
            &local,
            &bundle.snippets,
            &MergeOptions {
                prefer_remote_on_tie: self.options.prefer_remote_on_tie,
            },
        );
        tracing::debug!(
            local = local.len(),
            remote = bundle.snippets.len(),
            merged = merged.len(),
            "merging remote bundle"
        );
        self.store
            .upsert_many(merged)
            .map_err(SyncError::store(step))
    }

    fn persist_token(&self, token: Option<String>, step: SyncStep) -> SyncResult<()> {
        let mut config = SyncConfig::load(self.store);
        config.last_remote_etag = token;
        config.save(self.store).map_err(SyncError::store(step))
    }
}
