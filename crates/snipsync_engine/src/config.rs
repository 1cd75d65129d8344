//! Sync configuration and per-cycle options.

use serde::{Deserialize, Serialize};
use snipsync_store::{keys, SnippetStore, StoreResult};
use snipsync_transport::WebDavConfig;

/// The selected sync backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SyncBackend {
    /// Sync disabled.
    #[default]
    None,
    /// Generic WebDAV share.
    Webdav(WebDavConfig),
    /// Google Drive application folder. No credentials are persisted;
    /// the bearer token is fetched on demand from the host environment.
    Googledrive,
}

/// Persisted sync configuration, stored under the `sync_config` setting.
///
/// This setting is local to each device and never merged from a peer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// The active backend.
    #[serde(flatten)]
    pub backend: SyncBackend,
    /// Last-known remote change token, used to detect concurrent remote
    /// writes. Unset until a remote object has been observed.
    #[serde(default)]
    pub last_remote_etag: Option<String>,
}

impl SyncConfig {
    /// Reads the persisted configuration, defaulting to disabled.
    #[must_use]
    pub fn load(store: &SnippetStore) -> Self {
        store
            .get_setting(keys::SYNC_CONFIG)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    /// Persists the configuration.
    pub fn save(&self, store: &SnippetStore) -> StoreResult<()> {
        store.set_setting(keys::SYNC_CONFIG, serde_json::to_value(self)?)
    }
}

/// Options controlling one sync cycle.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Tie-break preference handed to the merge engine.
    pub prefer_remote_on_tie: bool,
    /// How many times the race check may refetch before deferring the
    /// rest to the next scheduled cycle.
    pub race_check_limit: u32,
    /// Run the retention sweep after a successful cycle.
    pub sweep_after_sync: bool,
}

impl SyncOptions {
    /// Sets the tie-break preference.
    #[must_use]
    pub fn with_prefer_remote_on_tie(mut self, prefer: bool) -> Self {
        self.prefer_remote_on_tie = prefer;
        self
    }

    /// Sets the race-check bound.
    #[must_use]
    pub fn with_race_check_limit(mut self, limit: u32) -> Self {
        self.race_check_limit = limit;
        self
    }

    /// Enables or disables the post-cycle retention sweep.
    #[must_use]
    pub fn with_sweep_after_sync(mut self, sweep: bool) -> Self {
        self.sweep_after_sync = sweep;
        self
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            prefer_remote_on_tie: true,
            race_check_limit: 1,
            sweep_after_sync: true,
        }
    }
}
