//! Error types for the sync engine.

use snipsync_store::StoreError;
use snipsync_transport::TransportError;
use std::fmt;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// The step of the sync cycle a failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    /// Creating the remote folder/container.
    EnsureLocation,
    /// Downloading the remote bundle.
    Fetch,
    /// Merging remote records into the local store.
    Merge,
    /// Re-reading the change token and re-merging on a race.
    RaceCheck,
    /// Assembling the local bundle.
    Bundle,
    /// Uploading the merged bundle.
    Upload,
    /// Persisting the change token and last-sync time.
    Finalize,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStep::EnsureLocation => "ensure-location",
            SyncStep::Fetch => "fetch",
            SyncStep::Merge => "merge",
            SyncStep::RaceCheck => "race-check",
            SyncStep::Bundle => "bundle",
            SyncStep::Upload => "upload",
            SyncStep::Finalize => "finalize",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during a sync cycle, tagged with the step that
/// failed. No step is retried within one invocation; retry belongs to
/// the caller.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A remote transport operation failed.
    #[error("{step} failed: {source}")]
    Remote {
        /// The failed step.
        step: SyncStep,
        /// Underlying transport error.
        #[source]
        source: TransportError,
    },

    /// A local store operation failed.
    #[error("{step} failed: {source}")]
    Store {
        /// The failed step.
        step: SyncStep,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },

    /// No usable backend configuration is persisted.
    #[error("sync is not configured: {message}")]
    NotConfigured {
        /// Description of what is missing.
        message: String,
    },
}

impl SyncError {
    /// Wraps a transport error with its step.
    pub fn remote(step: SyncStep) -> impl FnOnce(TransportError) -> Self {
        move |source| Self::Remote { step, source }
    }

    /// Wraps a store error with its step.
    pub fn store(step: SyncStep) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { step, source }
    }

    /// Creates a not-configured error.
    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::NotConfigured {
            message: message.into(),
        }
    }

    /// Returns the step this error occurred in, if any.
    #[must_use]
    pub fn step(&self) -> Option<SyncStep> {
        match self {
            SyncError::Remote { step, .. } | SyncError::Store { step, .. } => Some(*step),
            SyncError::NotConfigured { .. } => None,
        }
    }
}
