//! Google Drive transport adapter.
//!
//! Locates the sync folder and file by name-scoped queries against the
//! Drive files API, reads content via `alt=media`, writes via the upload
//! endpoints, and uses `headRevisionId` (falling back to `modifiedTime`)
//! as the change token. OAuth itself stays outside this crate: a
//! [`TokenProvider`] hands over whatever bearer token the host
//! environment has negotiated and cached.

use crate::error::{TransportError, TransportResult};
use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::remote::{RemoteFetch, RemoteStore, SYNC_FILE_NAME, SYNC_FOLDER_NAME};
use parking_lot::RwLock;
use serde::Deserialize;
use snipsync_protocol::SyncBundle;

const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const MULTIPART_BOUNDARY: &str = "snipsync-multipart";

/// Supplies a bearer token for Drive API calls.
///
/// The interactive OAuth flow (consent screens, token caching) belongs to
/// the host environment; this trait is the seam between it and the
/// adapter. A refused or expired grant surfaces as an auth failure.
pub trait TokenProvider: Send + Sync {
    /// Returns a bearer token, or a description of why none is available.
    fn token(&self) -> Result<String, String>;
}

/// A fixed token, for tests and pre-authorized environments.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wraps an already-negotiated token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Result<String, String> {
        Ok(self.0.clone())
    }
}

/// File metadata as returned by list/get queries.
///
/// Also used for `fields=`-narrowed responses, where `id` is absent and
/// defaults to empty.
#[derive(Debug, Clone, Deserialize)]
struct FileMeta {
    #[serde(default)]
    id: String,
    #[serde(rename = "headRevisionId", default)]
    head_revision_id: Option<String>,
    #[serde(rename = "modifiedTime", default)]
    modified_time: Option<String>,
}

impl FileMeta {
    fn change_token(&self) -> Option<String> {
        self.head_revision_id
            .clone()
            .or_else(|| self.modified_time.clone())
    }
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileMeta>,
}

#[derive(Debug, Default)]
struct DriveState {
    folder_id: Option<String>,
    file_id: Option<String>,
}

/// A remote store backed by a Google Drive application folder.
pub struct DriveRemote<C: HttpClient, T: TokenProvider> {
    client: C,
    tokens: T,
    state: RwLock<DriveState>,
}

impl<C: HttpClient, T: TokenProvider> DriveRemote<C, T> {
    /// Creates an adapter over a client and token source.
    pub fn new(client: C, tokens: T) -> Self {
        Self {
            client,
            tokens,
            state: RwLock::new(DriveState::default()),
        }
    }

    fn bearer(&self) -> TransportResult<String> {
        self.tokens
            .token()
            .map(|t| format!("Bearer {t}"))
            .map_err(TransportError::auth_failure)
    }

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

    fn parse_json<D: serde::de::DeserializeOwned>(
        response: &HttpResponse,
        what: &str,
    ) -> TransportResult<D> {
        serde_json::from_slice(&response.body).map_err(|e| {
            TransportError::remote_unavailable(format!("unexpected {what} response: {e}"))
        })
    }

    fn require_folder(&self) -> TransportResult<String> {
        if let Some(id) = self.state.read().folder_id.clone() {
            return Ok(id);
        }
        self.ensure_location()?;
        self.state
            .read()
            .folder_id
            .clone()
            .ok_or_else(|| TransportError::remote_unavailable("sync folder could not be resolved"))
    }

    /// Locates the bundle file inside the sync folder, caching its id.
    fn find_file(&self) -> TransportResult<Option<FileMeta>> {
        let folder_id = self.require_folder()?;
        let auth = self.bearer()?;

        let query =
            format!("name='{SYNC_FILE_NAME}' and '{folder_id}' in parents and trashed=false");
        let url = format!(
            "{FILES_URL}?q={}&fields=files(id,headRevisionId,modifiedTime)",
            urlencoding::encode(&query)
        );
        let response = self.send(HttpRequest::new("GET", url).with_header("Authorization", auth))?;
        if !response.is_success() {
            return Err(TransportError::remote_unavailable(format!(
                "file query returned {}",
                response.status
            )));
        }

        let list: FileList = Self::parse_json(&response, "file query")?;
        let meta = list.files.into_iter().next();
        self.state.write().file_id = meta.as_ref().map(|m| m.id.clone());
        Ok(meta)
    }
}

impl<C: HttpClient, T: TokenProvider> RemoteStore for DriveRemote<C, T> {
    fn ensure_location(&self) -> TransportResult<()> {
        if self.state.read().folder_id.is_some() {
            return Ok(());
        }
        let auth = self.bearer()?;

        let query =
            format!("name='{SYNC_FOLDER_NAME}' and mimeType='{FOLDER_MIME}' and trashed=false");
        let url = format!(
            "{FILES_URL}?q={}&fields=files(id,name)",
            urlencoding::encode(&query)
        );
        let response = self.send(
            HttpRequest::new("GET", url).with_header("Authorization", auth.clone()),
        )?;
        if !response.is_success() {
            return Err(TransportError::remote_unavailable(format!(
                "folder query returned {}",
                response.status
            )));
        }

        let list: FileList = Self::parse_json(&response, "folder query")?;
        let folder_id = match list.files.into_iter().next() {
            Some(folder) => folder.id,
            None => {
                let metadata = serde_json::json!({
                    "name": SYNC_FOLDER_NAME,
                    "mimeType": FOLDER_MIME,
                });
                let body = serde_json::to_vec(&metadata)
                    .map_err(|e| TransportError::remote_unavailable(e.to_string()))?;
                let response = self.send(
                    HttpRequest::new("POST", FILES_URL)
                        .with_header("Authorization", auth)
                        .with_body("application/json", body),
                )?;
                if !response.is_success() {
                    return Err(TransportError::remote_unavailable(format!(
                        "folder create returned {}",
                        response.status
                    )));
                }
                let created: FileMeta = Self::parse_json(&response, "folder create")?;
                tracing::debug!(folder_id = %created.id, "created sync folder");
                created.id
            }
        };

        self.state.write().folder_id = Some(folder_id);
        Ok(())
    }

    fn fetch_bundle(&self) -> TransportResult<RemoteFetch> {
        let Some(meta) = self.find_file()? else {
            return Ok(RemoteFetch::absent());
        };

        let auth = self.bearer()?;
        let url = format!("{FILES_URL}/{}?alt=media", meta.id);
        let response = self.send(HttpRequest::new("GET", url).with_header("Authorization", auth))?;

        // Deleted between the query and the read: same as never existing.
        if response.status == 404 {
            return Ok(RemoteFetch::absent());
        }
        if !response.is_success() {
            return Err(TransportError::remote_unavailable(format!(
                "media read returned {}",
                response.status
            )));
        }

        let bundle = SyncBundle::parse(&response.body)?;
        tracing::debug!(snippets = bundle.snippets.len(), "fetched remote bundle");
        Ok(RemoteFetch {
            bundle: Some(bundle),
            change_token: meta.change_token(),
        })
    }

    fn head_change_token(&self) -> TransportResult<Option<String>> {
        let file_id = self.state.read().file_id.clone();
        let Some(file_id) = file_id else {
            return Ok(self.find_file()?.and_then(|m| m.change_token()));
        };

        let auth = self.bearer()?;
        let url = format!("{FILES_URL}/{file_id}?fields=headRevisionId,modifiedTime");
        let response = self.send(HttpRequest::new("GET", url).with_header("Authorization", auth))?;

        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(TransportError::remote_unavailable(format!(
                "metadata read returned {}",
                response.status
            )));
        }

        let meta: FileMeta = Self::parse_json(&response, "metadata read")?;
        Ok(meta.change_token())
    }

    fn put_bundle(&self, bundle: &SyncBundle) -> TransportResult<Option<String>> {
        let media = bundle.to_bytes()?;
        let auth = self.bearer()?;
        let file_id = self.state.read().file_id.clone();

        match file_id {
            Some(id) => {
                let url = format!("{UPLOAD_URL}/{id}?uploadType=media");
                let response = self.send(
                    HttpRequest::new("PATCH", url)
                        .with_header("Authorization", auth)
                        .with_body("application/json", media),
                )?;
                if !response.is_success() {
                    return Err(TransportError::remote_unavailable(format!(
                        "media update returned {}",
                        response.status
                    )));
                }
            }
            None => {
                let folder_id = self.require_folder()?;
                let metadata = serde_json::json!({
                    "name": SYNC_FILE_NAME,
                    "mimeType": "application/json",
                    "parents": [folder_id],
                });
                let body = multipart_body(&metadata, &media)?;
                let url = format!("{UPLOAD_URL}?uploadType=multipart");
                let response = self.send(
                    HttpRequest::new("POST", url)
                        .with_header("Authorization", auth)
                        .with_body(
                            &format!("multipart/related; boundary={MULTIPART_BOUNDARY}"),
                            body,
                        ),
                )?;
                if !response.is_success() {
                    return Err(TransportError::remote_unavailable(format!(
                        "multipart create returned {}",
                        response.status
                    )));
                }
                let created: FileMeta = Self::parse_json(&response, "multipart create")?;
                self.state.write().file_id = Some(created.id);
            }
        }

        // The upload responses don't carry a revision id; read it back.
        self.head_change_token()
    }
}

/// Assembles a two-part `multipart/related` body: JSON metadata followed
/// by the media content.
fn multipart_body(
    metadata: &serde_json::Value,
    media: &[u8],
) -> TransportResult<Vec<u8>> {
    let metadata_bytes = serde_json::to_vec(metadata)
        .map_err(|e| TransportError::remote_unavailable(e.to_string()))?;

    let mut body = Vec::with_capacity(media.len() + metadata_bytes.len() + 256);
    body.extend_from_slice(
        format!("--{MULTIPART_BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(&metadata_bytes);
    body.extend_from_slice(
        format!("\r\n--{MULTIPART_BOUNDARY}\r\nContent-Type: application/json\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(media);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use snipsync_protocol::{Snippet, SnippetId, SnippetKind};

    struct NoToken;

    impl TokenProvider for NoToken {
        fn token(&self) -> Result<String, String> {
            Err("user declined the consent screen".into())
        }
    }

    fn remote(client: ScriptedClient) -> DriveRemote<ScriptedClient, StaticToken> {
        DriveRemote::new(client, StaticToken::new("tok-123"))
    }

    fn bundle() -> SyncBundle {
        SyncBundle::build(
            vec![Snippet {
                id: SnippetId::from("1"),
                kind: SnippetKind::Web,
                text: "clip".into(),
                url: Some("https://example.com".into()),
                domain: Some("example.com".into()),
                created_at: 1,
                updated_at: 1,
                deleted_at: None,
                purged_at: None,
            }],
            50,
        )
    }

    #[test]
    fn ensure_location_finds_existing_folder() {
        let client = ScriptedClient::new();
        client.push_with_headers(200, &[], br#"{"files":[{"id":"folder-1","name":"snipsync"}]}"#);
        let drive = remote(client);

        drive.ensure_location().unwrap();
        assert_eq!(drive.state.read().folder_id.as_deref(), Some("folder-1"));

        let requests = drive.client.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.contains("name%3D%27snipsync%27"));
        assert!(requests[0].url.contains("fields=files(id,name)"));
    }

    #[test]
    fn ensure_location_creates_missing_folder() {
        let client = ScriptedClient::new();
        client.push_with_headers(200, &[], br#"{"files":[]}"#);
        client.push_with_headers(200, &[], br#"{"id":"folder-new"}"#);
        let drive = remote(client);

        drive.ensure_location().unwrap();
        assert_eq!(drive.state.read().folder_id.as_deref(), Some("folder-new"));

        let requests = drive.client.requests();
        assert_eq!(requests[1].method, "POST");
        let metadata: serde_json::Value =
            serde_json::from_slice(requests[1].body.as_ref().unwrap()).unwrap();
        assert_eq!(metadata["name"], "snipsync");
        assert_eq!(metadata["mimeType"], "application/vnd.google-apps.folder");
    }

    #[test]
    fn ensure_location_is_idempotent_once_resolved() {
        let client = ScriptedClient::new();
        client.push_with_headers(200, &[], br#"{"files":[{"id":"folder-1"}]}"#);
        let drive = remote(client);

        drive.ensure_location().unwrap();
        drive.ensure_location().unwrap(); // no second request scripted

        assert_eq!(drive.client.requests().len(), 1);
    }

    #[test]
    fn missing_token_is_auth_failure_before_any_request() {
        let client = ScriptedClient::new();
        let drive = DriveRemote::new(client, NoToken);

        let err = drive.ensure_location().unwrap_err();
        assert!(matches!(err, TransportError::AuthFailure { .. }));
        assert!(drive.client.requests().is_empty());
    }

    #[test]
    fn rejected_token_is_auth_failure() {
        let client = ScriptedClient::new();
        client.push_status(401);
        let drive = remote(client);

        let err = drive.ensure_location().unwrap_err();
        assert!(matches!(err, TransportError::AuthFailure { .. }));
    }

    #[test]
    fn fetch_with_no_file_is_absent() {
        let client = ScriptedClient::new();
        client.push_with_headers(200, &[], br#"{"files":[{"id":"folder-1"}]}"#);
        client.push_with_headers(200, &[], br#"{"files":[]}"#);
        let drive = remote(client);

        let fetch = drive.fetch_bundle().unwrap();
        assert!(fetch.bundle.is_none());
        assert!(fetch.change_token.is_none());
    }

    #[test]
    fn fetch_downloads_media_with_revision_token() {
        let client = ScriptedClient::new();
        client.push_with_headers(200, &[], br#"{"files":[{"id":"folder-1"}]}"#);
        client.push_with_headers(
            200,
            &[],
            br#"{"files":[{"id":"file-1","headRevisionId":"rev-9","modifiedTime":"2026-01-01T00:00:00Z"}]}"#,
        );
        client.push_with_headers(200, &[], &bundle().to_bytes().unwrap());
        let drive = remote(client);

        let fetch = drive.fetch_bundle().unwrap();
        assert_eq!(fetch.bundle.unwrap().snippets.len(), 1);
        assert_eq!(fetch.change_token.as_deref(), Some("rev-9"));

        let requests = drive.client.requests();
        assert!(requests[2].url.ends_with("/files/file-1?alt=media"));
    }

    #[test]
    fn change_token_falls_back_to_modified_time() {
        let client = ScriptedClient::new();
        client.push_with_headers(200, &[], br#"{"files":[{"id":"folder-1"}]}"#);
        client.push_with_headers(
            200,
            &[],
            br#"{"files":[{"id":"file-1","modifiedTime":"2026-02-02T00:00:00Z"}]}"#,
        );
        client.push_with_headers(200, &[], &bundle().to_bytes().unwrap());
        let drive = remote(client);

        let fetch = drive.fetch_bundle().unwrap();
        assert_eq!(
            fetch.change_token.as_deref(),
            Some("2026-02-02T00:00:00Z")
        );
    }

    #[test]
    fn head_uses_cached_file_id() {
        let client = ScriptedClient::new();
        client.push_with_headers(200, &[], br#"{"files":[{"id":"folder-1"}]}"#);
        client.push_with_headers(200, &[], br#"{"files":[{"id":"file-1","headRevisionId":"r1"}]}"#);
        client.push_with_headers(200, &[], &bundle().to_bytes().unwrap());
        client.push_with_headers(200, &[], br#"{"headRevisionId":"r2"}"#);
        let drive = remote(client);

        drive.fetch_bundle().unwrap();
        let token = drive.head_change_token().unwrap();
        assert_eq!(token.as_deref(), Some("r2"));

        let requests = drive.client.requests();
        assert!(requests[3]
            .url
            .ends_with("/files/file-1?fields=headRevisionId,modifiedTime"));
    }

    #[test]
    fn put_creates_via_multipart_when_file_unknown() {
        let client = ScriptedClient::new();
        client.push_with_headers(200, &[], br#"{"files":[{"id":"folder-1"}]}"#);
        client.push_with_headers(200, &[], br#"{"id":"file-new"}"#);
        client.push_with_headers(200, &[], br#"{"headRevisionId":"r1"}"#);
        let drive = remote(client);

        let token = drive.put_bundle(&bundle()).unwrap();
        assert_eq!(token.as_deref(), Some("r1"));
        assert_eq!(drive.state.read().file_id.as_deref(), Some("file-new"));

        let requests = drive.client.requests();
        assert_eq!(requests[1].method, "POST");
        assert!(requests[1].url.ends_with("uploadType=multipart"));

        let body = String::from_utf8(requests[1].body.clone().unwrap()).unwrap();
        assert!(body.contains("--snipsync-multipart"));
        assert!(body.contains(r#""name":"snippets.json""#));
        assert!(body.contains(r#""parents":["folder-1"]"#));
        assert!(body.ends_with("--snipsync-multipart--\r\n"));
    }

    #[test]
    fn put_updates_via_patch_when_file_known() {
        let client = ScriptedClient::new();
        client.push_with_headers(200, &[], br#"{"files":[{"id":"folder-1"}]}"#);
        client.push_with_headers(200, &[], br#"{"files":[{"id":"file-1","headRevisionId":"r1"}]}"#);
        client.push_with_headers(200, &[], &bundle().to_bytes().unwrap());
        client.push_with_headers(200, &[], br#"{"id":"file-1"}"#);
        client.push_with_headers(200, &[], br#"{"headRevisionId":"r2"}"#);
        let drive = remote(client);

        drive.fetch_bundle().unwrap();
        let token = drive.put_bundle(&bundle()).unwrap();
        assert_eq!(token.as_deref(), Some("r2"));

        let requests = drive.client.requests();
        assert_eq!(requests[3].method, "PATCH");
        assert!(requests[3].url.ends_with("/files/file-1?uploadType=media"));
    }

    #[test]
    fn server_errors_are_remote_unavailable() {
        let client = ScriptedClient::new();
        client.push_status(500);
        let drive = remote(client);

        let err = drive.ensure_location().unwrap_err();
        assert!(matches!(err, TransportError::RemoteUnavailable { .. }));
    }
}
