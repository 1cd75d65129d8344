//! Scripted remote store for orchestrator tests.

use crate::error::{TransportError, TransportResult};
use crate::remote::{RemoteFetch, RemoteStore};
use parking_lot::Mutex;
use snipsync_protocol::SyncBundle;
use std::collections::VecDeque;

/// A scripted failure for a mock operation.
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// Behave as an unreachable backend.
    Unavailable(String),
    /// Behave as rejected credentials.
    Auth(String),
    /// Behave as a reachable backend serving a malformed payload.
    Malformed(String),
}

impl MockFailure {
    fn to_error(&self) -> TransportError {
        match self {
            MockFailure::Unavailable(msg) => TransportError::remote_unavailable(msg.clone()),
            MockFailure::Auth(msg) => TransportError::auth_failure(msg.clone()),
            MockFailure::Malformed(msg) => {
                TransportError::Malformed(snipsync_protocol::ProtocolError::malformed(msg.clone()))
            }
        }
    }
}

#[derive(Default)]
struct Inner {
    bundle: Option<SyncBundle>,
    change_token: Option<String>,
    fetch_queue: VecDeque<(Option<SyncBundle>, Option<String>)>,
    head_queue: VecDeque<Option<String>>,
    put_tokens: VecDeque<Option<String>>,
    uploads: Vec<SyncBundle>,
    fail_ensure: Option<MockFailure>,
    fail_fetch: Option<MockFailure>,
    fail_head: Option<MockFailure>,
    fail_put: Option<MockFailure>,
    ensure_calls: u32,
    fetch_calls: u32,
    head_calls: u32,
    put_calls: u32,
    put_seq: u32,
}

/// A mock remote store for testing.
///
/// Holds "current remote state" (bundle + change token) that fetches and
/// heads observe by default, with optional scripted queues to model a
/// concurrent writer changing the remote mid-cycle, plus per-operation
/// failure injection.
#[derive(Default)]
pub struct MockRemote {
    inner: Mutex<Inner>,
}

impl MockRemote {
    /// Creates an empty mock remote (no object exists yet).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current remote bundle and change token.
    pub fn set_remote_state(&self, bundle: SyncBundle, change_token: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.bundle = Some(bundle);
        inner.change_token = Some(change_token.into());
    }

    /// Queues a one-shot fetch result ahead of the current state.
    pub fn push_fetch(&self, bundle: Option<SyncBundle>, change_token: Option<&str>) {
        self.inner
            .lock()
            .fetch_queue
            .push_back((bundle, change_token.map(str::to_owned)));
    }

    /// Queues a one-shot head result ahead of the current token.
    pub fn push_head(&self, change_token: Option<&str>) {
        self.inner
            .lock()
            .head_queue
            .push_back(change_token.map(str::to_owned));
    }

    /// Queues the token the next upload reports (`None` models a backend
    /// that cannot supply one).
    pub fn push_put_token(&self, change_token: Option<&str>) {
        self.inner
            .lock()
            .put_tokens
            .push_back(change_token.map(str::to_owned));
    }

    /// Makes `ensure_location` fail.
    pub fn fail_ensure(&self, failure: MockFailure) {
        self.inner.lock().fail_ensure = Some(failure);
    }

    /// Makes `fetch_bundle` fail.
    pub fn fail_fetch(&self, failure: MockFailure) {
        self.inner.lock().fail_fetch = Some(failure);
    }

    /// Makes `head_change_token` fail.
    pub fn fail_head(&self, failure: MockFailure) {
        self.inner.lock().fail_head = Some(failure);
    }

    /// Makes `put_bundle` fail.
    pub fn fail_put(&self, failure: MockFailure) {
        self.inner.lock().fail_put = Some(failure);
    }

    /// Returns every bundle uploaded so far, oldest first.
    #[must_use]
    pub fn uploads(&self) -> Vec<SyncBundle> {
        self.inner.lock().uploads.clone()
    }

    /// Returns call counts as (ensure, fetch, head, put).
    #[must_use]
    pub fn call_counts(&self) -> (u32, u32, u32, u32) {
        let inner = self.inner.lock();
        (
            inner.ensure_calls,
            inner.fetch_calls,
            inner.head_calls,
            inner.put_calls,
        )
    }
}

impl RemoteStore for MockRemote {
    fn ensure_location(&self) -> TransportResult<()> {
        let mut inner = self.inner.lock();
        inner.ensure_calls += 1;
        if let Some(failure) = &inner.fail_ensure {
            return Err(failure.to_error());
        }
        Ok(())
    }

    fn fetch_bundle(&self) -> TransportResult<RemoteFetch> {
        let mut inner = self.inner.lock();
        inner.fetch_calls += 1;
        if let Some(failure) = &inner.fail_fetch {
            return Err(failure.to_error());
        }

        if let Some((bundle, change_token)) = inner.fetch_queue.pop_front() {
            // Scripted fetches also become the current remote state.
            inner.bundle = bundle.clone();
            inner.change_token = change_token.clone();
            return Ok(RemoteFetch {
                bundle,
                change_token,
            });
        }

        Ok(RemoteFetch {
            bundle: inner.bundle.clone(),
            change_token: inner.change_token.clone(),
        })
    }

    fn head_change_token(&self) -> TransportResult<Option<String>> {
        let mut inner = self.inner.lock();
        inner.head_calls += 1;
        if let Some(failure) = &inner.fail_head {
            return Err(failure.to_error());
        }

        if let Some(token) = inner.head_queue.pop_front() {
            return Ok(token);
        }
        Ok(inner.change_token.clone())
    }

    fn put_bundle(&self, bundle: &SyncBundle) -> TransportResult<Option<String>> {
        let mut inner = self.inner.lock();
        inner.put_calls += 1;
        if let Some(failure) = &inner.fail_put {
            return Err(failure.to_error());
        }

        inner.uploads.push(bundle.clone());
        inner.bundle = Some(bundle.clone());
        inner.put_seq += 1;

        let token = match inner.put_tokens.pop_front() {
            Some(scripted) => scripted,
            None => Some(format!("put-{}", inner.put_seq)),
        };
        inner.change_token.clone_from(&token);
        Ok(token)
    }
}
