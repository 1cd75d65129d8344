//! `reqwest`-backed HTTP client.

use crate::error::{TransportError, TransportResult};
use crate::http::{HttpClient, HttpRequest, HttpResponse};
use std::time::Duration;

/// An [`HttpClient`] backed by a blocking `reqwest` client.
///
/// One sync cycle issues a handful of small requests, so a plain
/// blocking client with a request timeout is all that is needed here.
pub struct ReqwestClient {
    inner: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Builds a client with a 30-second request timeout.
    pub fn new() -> TransportResult<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Builds a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> TransportResult<Self> {
        let inner = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::remote_unavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        // WebDAV verbs (PROPFIND, MKCOL) are not in the standard set.
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| e.to_string())?;

        let mut builder = self.inner.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();
        let body = response.bytes().map_err(|e| e.to_string())?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
