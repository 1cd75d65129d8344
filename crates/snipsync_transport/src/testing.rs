//! Shared test doubles for adapter unit tests.

use crate::http::{HttpClient, HttpRequest, HttpResponse};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A recorded request: method, URL, and body.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: String,
    pub url: String,
    pub body: Option<Vec<u8>>,
}

/// An HTTP client that replays a scripted queue of responses and records
/// every request it sees.
#[derive(Default)]
pub(crate) struct ScriptedClient {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    recorded: Mutex<Vec<Recorded>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, status: u16) {
        self.push(HttpResponse {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        });
    }

    pub fn push_with_headers(&self, status: u16, headers: &[(&str, &str)], body: &[u8]) {
        self.push(HttpResponse {
            status,
            headers: headers
                .iter()
                .map(|(n, v)| ((*n).to_owned(), (*v).to_owned()))
                .collect(),
            body: body.to_vec(),
        });
    }

    pub fn push(&self, response: HttpResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    pub fn push_error(&self, message: &str) {
        self.responses.lock().push_back(Err(message.to_owned()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.recorded.lock().clone()
    }
}

impl HttpClient for ScriptedClient {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        self.recorded.lock().push(Recorded {
            method: request.method.to_owned(),
            url: request.url.clone(),
            body: request.body.clone(),
        });
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(format!("no scripted response for {} {}", request.method, request.url)))
    }
}
