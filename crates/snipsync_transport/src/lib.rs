//! # Snipsync Transport
//!
//! Remote bundle transport adapters.
//!
//! This crate provides:
//! - The [`RemoteStore`] trait: ensure-location, fetch, change-token
//!   probe, and upload of sync bundles
//! - A WebDAV adapter ([`WebDavRemote`]) speaking
//!   PROPFIND/MKCOL/GET/HEAD/PUT with Basic auth and ETag tokens
//! - A Google Drive adapter ([`DriveRemote`]) speaking the files API with
//!   name-scoped discovery and revision-id tokens
//! - An [`HttpClient`] abstraction so adapters stay independent of any
//!   concrete HTTP library (a `reqwest` implementation is available
//!   behind the `reqwest-client` feature)
//! - A scripted [`MockRemote`] for orchestrator tests
//!
//! ## Key Invariants
//!
//! - "The remote object does not exist yet" is a `None` bundle, never an
//!   error; transport and auth failures are distinct error variants
//! - Adapters never interpret bundle contents beyond the codec's shape
//!   validation

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod drive;
mod error;
mod http;
mod mock;
mod remote;
#[cfg(feature = "reqwest-client")]
mod reqwest_client;
mod webdav;

#[cfg(test)]
pub(crate) mod testing;

pub use drive::{DriveRemote, StaticToken, TokenProvider};
pub use error::{TransportError, TransportResult};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use mock::{MockFailure, MockRemote};
pub use remote::{RemoteFetch, RemoteStore, SYNC_FILE_NAME, SYNC_FOLDER_NAME};
#[cfg(feature = "reqwest-client")]
pub use reqwest_client::ReqwestClient;
pub use webdav::{WebDavConfig, WebDavRemote};
