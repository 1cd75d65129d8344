//! Remote store trait: the contract every transport adapter satisfies.

use crate::error::TransportResult;
use snipsync_protocol::SyncBundle;

/// Fixed folder name for the sync location, shared by every backend.
pub const SYNC_FOLDER_NAME: &str = "snipsync";

/// Fixed bundle file name inside the sync folder.
pub const SYNC_FILE_NAME: &str = "snippets.json";

/// Result of a remote fetch.
#[derive(Debug, Clone)]
pub struct RemoteFetch {
    /// The remote bundle, or `None` if no object exists yet.
    pub bundle: Option<SyncBundle>,
    /// Opaque change token observed with the fetch (ETag, revision id).
    pub change_token: Option<String>,
}

impl RemoteFetch {
    /// The "no remote object yet" result.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            bundle: None,
            change_token: None,
        }
    }
}

/// A remote blob store holding one sync bundle.
///
/// Implementations talk to one backend (WebDAV folder, cloud-drive
/// folder) and expose a change token for staleness detection. They map
/// backend responses onto the shared error taxonomy: absence of the
/// object is never an error, while unreachable backends and rejected
/// credentials are distinct failures.
pub trait RemoteStore: Send + Sync {
    /// Idempotently creates the remote folder/container if missing.
    fn ensure_location(&self) -> TransportResult<()>;

    /// Downloads the bundle and its change token.
    ///
    /// Returns [`RemoteFetch::absent`] when the object does not exist.
    fn fetch_bundle(&self) -> TransportResult<RemoteFetch>;

    /// Reads the current change token without downloading content.
    fn head_change_token(&self) -> TransportResult<Option<String>>;

    /// Uploads (creates or overwrites) the bundle.
    ///
    /// Returns the resulting change token when the backend can supply
    /// one, via a follow-up metadata read if the write response omits it.
    fn put_bundle(&self, bundle: &SyncBundle) -> TransportResult<Option<String>>;
}
