//! WebDAV transport adapter.
//!
//! Stores the bundle as a fixed file inside a fixed subfolder of the
//! configured base URL. Folder existence is probed with `PROPFIND` and
//! established with `MKCOL`; the HTTP `ETag` header is the change token.

use crate::error::{TransportError, TransportResult};
use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::remote::{RemoteFetch, RemoteStore, SYNC_FILE_NAME, SYNC_FOLDER_NAME};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use snipsync_protocol::SyncBundle;

/// WebDAV backend credentials and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebDavConfig {
    /// Base URL of the WebDAV share.
    pub url: String,
    /// Basic auth username.
    pub username: String,
    /// Basic auth password.
    pub password: String,
}

/// A remote store backed by a generic WebDAV server.
pub struct WebDavRemote<C: HttpClient> {
    client: C,
    auth: String,
    folder_url: String,
    file_url: String,
}

impl<C: HttpClient> WebDavRemote<C> {
    /// Creates an adapter for the given share.
    pub fn new(client: C, config: &WebDavConfig) -> Self {
        let folder_url = normalize_folder_url(&config.url);
        let file_url = format!("{folder_url}{SYNC_FILE_NAME}");
        let auth = format!(
            "Basic {}",
            BASE64.encode(format!("{}:{}", config.username, config.password))
        );

        Self {
            client,
            auth,
            folder_url,
            file_url,
        }
    }

    /// Returns the resolved bundle file URL.
    #[must_use]
    pub fn file_url(&self) -> &str {
        &self.file_url
    }

    fn request(&self, method: &'static str, url: &str) -> HttpRequest {
        HttpRequest::new(method, url).with_header("Authorization", self.auth.clone())
    }

    /// Sends a request, mapping connection failures and rejected
    /// credentials. Status handling beyond auth stays with the caller.
    fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        let method = request.method;
        let response = self
            .client
            .send(request)
            .map_err(TransportError::remote_unavailable)?;

        if response.status == 401 || response.status == 403 {
            return Err(TransportError::auth_failure(format!(
                "{method} returned {}",
                response.status
            )));
        }
        Ok(response)
    }
}

/// Appends the fixed sync folder to a base URL, tolerating trailing
/// slashes and an already-suffixed base without double-appending.
fn normalize_folder_url(base: &str) -> String {
    let trimmed = base.strip_suffix('/').unwrap_or(base);
    if trimmed.ends_with(&format!("/{SYNC_FOLDER_NAME}")) {
        format!("{trimmed}/")
    } else {
        format!("{trimmed}/{SYNC_FOLDER_NAME}/")
    }
}

impl<C: HttpClient> RemoteStore for WebDavRemote<C> {
    fn ensure_location(&self) -> TransportResult<()> {
        let probe = self.send(
            self.request("PROPFIND", &self.folder_url)
                .with_header("Depth", "0"),
        )?;
        if probe.is_success() {
            return Ok(());
        }
        if probe.status != 404 {
            return Err(TransportError::remote_unavailable(format!(
                "PROPFIND returned {}",
                probe.status
            )));
        }

        // 405 Method Not Allowed means the collection already exists.
        let created = self.send(self.request("MKCOL", &self.folder_url))?;
        if created.is_success() || created.status == 405 {
            tracing::debug!(folder = %self.folder_url, "sync folder ready");
            Ok(())
        } else {
            Err(TransportError::remote_unavailable(format!(
                "MKCOL returned {}",
                created.status
            )))
        }
    }

    fn fetch_bundle(&self) -> TransportResult<RemoteFetch> {
        let response = self.send(self.request("GET", &self.file_url))?;

        if response.status == 404 {
            return Ok(RemoteFetch::absent());
        }
        if !response.is_success() {
            return Err(TransportError::remote_unavailable(format!(
                "GET returned {}",
                response.status
            )));
        }

        let change_token = response.header("ETag").map(str::to_owned);
        let bundle = SyncBundle::parse(&response.body)?;
        tracing::debug!(
            snippets = bundle.snippets.len(),
            token = change_token.as_deref().unwrap_or("-"),
            "fetched remote bundle"
        );

        Ok(RemoteFetch {
            bundle: Some(bundle),
            change_token,
        })
    }

    fn head_change_token(&self) -> TransportResult<Option<String>> {
        let response = self.send(self.request("HEAD", &self.file_url))?;

        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(TransportError::remote_unavailable(format!(
                "HEAD returned {}",
                response.status
            )));
        }
        Ok(response.header("ETag").map(str::to_owned))
    }

    fn put_bundle(&self, bundle: &SyncBundle) -> TransportResult<Option<String>> {
        let body = bundle.to_bytes()?;
        let response = self.send(
            self.request("PUT", &self.file_url)
                .with_body("application/json", body),
        )?;

        if !response.is_success() {
            return Err(TransportError::remote_unavailable(format!(
                "PUT returned {}",
                response.status
            )));
        }

        match response.header("ETag") {
            Some(etag) => Ok(Some(etag.to_owned())),
            // Some servers omit the ETag on PUT; read it back.
            None => self.head_change_token(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use snipsync_protocol::{Snippet, SnippetId, SnippetKind};

    fn config(url: &str) -> WebDavConfig {
        WebDavConfig {
            url: url.into(),
            username: "alice".into(),
            password: "secret".into(),
        }
    }

    fn bundle() -> SyncBundle {
        SyncBundle::build(
            vec![Snippet {
                id: SnippetId::from("1"),
                kind: SnippetKind::Note,
                text: "t".into(),
                url: None,
                domain: None,
                created_at: 1,
                updated_at: 1,
                deleted_at: None,
                purged_at: None,
            }],
            100,
        )
    }

    #[test]
    fn folder_url_normalization() {
        assert_eq!(
            normalize_folder_url("https://dav.example.com/remote"),
            "https://dav.example.com/remote/snipsync/"
        );
        assert_eq!(
            normalize_folder_url("https://dav.example.com/remote/"),
            "https://dav.example.com/remote/snipsync/"
        );
        assert_eq!(
            normalize_folder_url("https://dav.example.com/remote/snipsync"),
            "https://dav.example.com/remote/snipsync/"
        );
        assert_eq!(
            normalize_folder_url("https://dav.example.com/remote/snipsync/"),
            "https://dav.example.com/remote/snipsync/"
        );
    }

    #[test]
    fn requests_carry_basic_auth() {
        let client = ScriptedClient::new();
        client.push_status(207);
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        remote.ensure_location().unwrap();

        // "alice:secret" in Basic form.
        assert_eq!(remote.auth, "Basic YWxpY2U6c2VjcmV0");
    }

    #[test]
    fn ensure_location_when_folder_exists() {
        let client = ScriptedClient::new();
        client.push_status(207);
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        remote.ensure_location().unwrap();

        let requests = remote.client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "PROPFIND");
        assert_eq!(requests[0].url, "https://dav.example.com/d/snipsync/");
    }

    #[test]
    fn ensure_location_creates_missing_folder() {
        let client = ScriptedClient::new();
        client.push_status(404);
        client.push_status(201);
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        remote.ensure_location().unwrap();

        let requests = remote.client.requests();
        assert_eq!(requests[1].method, "MKCOL");
    }

    #[test]
    fn mkcol_405_counts_as_success() {
        let client = ScriptedClient::new();
        client.push_status(404);
        client.push_status(405);
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        assert!(remote.ensure_location().is_ok());
    }

    #[test]
    fn ensure_location_maps_auth_failure() {
        let client = ScriptedClient::new();
        client.push_status(401);
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        let err = remote.ensure_location().unwrap_err();
        assert!(matches!(err, TransportError::AuthFailure { .. }));
    }

    #[test]
    fn connection_failure_is_remote_unavailable() {
        let client = ScriptedClient::new();
        client.push_error("dns lookup failed");
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        let err = remote.ensure_location().unwrap_err();
        assert!(matches!(err, TransportError::RemoteUnavailable { .. }));
    }

    #[test]
    fn fetch_missing_file_is_absent_not_error() {
        let client = ScriptedClient::new();
        client.push_status(404);
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        let fetch = remote.fetch_bundle().unwrap();
        assert!(fetch.bundle.is_none());
        assert!(fetch.change_token.is_none());
    }

    #[test]
    fn fetch_returns_bundle_and_etag() {
        let client = ScriptedClient::new();
        let body = bundle().to_bytes().unwrap();
        client.push_with_headers(200, &[("ETag", "\"rev-7\"")], &body);
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        let fetch = remote.fetch_bundle().unwrap();
        assert_eq!(fetch.bundle.unwrap().snippets.len(), 1);
        assert_eq!(fetch.change_token.as_deref(), Some("\"rev-7\""));

        let requests = remote.client.requests();
        assert_eq!(
            requests[0].url,
            "https://dav.example.com/d/snipsync/snippets.json"
        );
    }

    #[test]
    fn fetch_malformed_payload_is_distinct_from_absent() {
        let client = ScriptedClient::new();
        client.push_with_headers(200, &[], b"<html>not a bundle</html>");
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        let err = remote.fetch_bundle().unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)));
    }

    #[test]
    fn fetch_server_error_is_remote_unavailable() {
        let client = ScriptedClient::new();
        client.push_status(503);
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        let err = remote.fetch_bundle().unwrap_err();
        assert!(matches!(err, TransportError::RemoteUnavailable { .. }));
    }

    #[test]
    fn head_reads_etag() {
        let client = ScriptedClient::new();
        client.push_with_headers(200, &[("etag", "\"v2\"")], b"");
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        assert_eq!(
            remote.head_change_token().unwrap().as_deref(),
            Some("\"v2\"")
        );
    }

    #[test]
    fn head_missing_file_is_none() {
        let client = ScriptedClient::new();
        client.push_status(404);
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        assert_eq!(remote.head_change_token().unwrap(), None);
    }

    #[test]
    fn put_uses_response_etag() {
        let client = ScriptedClient::new();
        client.push_with_headers(201, &[("ETag", "\"after\"")], b"");
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        let token = remote.put_bundle(&bundle()).unwrap();
        assert_eq!(token.as_deref(), Some("\"after\""));

        let requests = remote.client.requests();
        assert_eq!(requests[0].method, "PUT");
        let uploaded = SyncBundle::parse(requests[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(uploaded.snippets.len(), 1);
    }

    #[test]
    fn put_falls_back_to_head_for_etag() {
        let client = ScriptedClient::new();
        client.push_status(204); // PUT without an ETag
        client.push_with_headers(200, &[("ETag", "\"headed\"")], b"");
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        let token = remote.put_bundle(&bundle()).unwrap();
        assert_eq!(token.as_deref(), Some("\"headed\""));

        let requests = remote.client.requests();
        assert_eq!(requests[1].method, "HEAD");
    }

    #[test]
    fn put_failure_is_reported() {
        let client = ScriptedClient::new();
        client.push_status(507); // insufficient storage
        let remote = WebDavRemote::new(client, &config("https://dav.example.com/d"));

        assert!(matches!(
            remote.put_bundle(&bundle()),
            Err(TransportError::RemoteUnavailable { .. })
        ));
    }
}
