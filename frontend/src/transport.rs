use std::collections::BTreeMap;

use aula_shared::HttpMethod;

use crate::error::ApiResult;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::{HashMap, VecDeque};

// =========================================================
// HTTP interface
// =========================================================

/// A fully resolved HTTP request: absolute URL, headers and body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests over the wire.
///
/// `?Send` because browser futures are bound to the page's event loop.
#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// Test double: MockTransport
// =========================================================

/// Canned responses keyed by `(method, path)`; records every request it sees.
///
/// Several responses queued for the same key are served in order; the last
/// one keeps being served once the queue is down to it.
#[cfg(test)]
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<HashMap<(String, String), VecDeque<(u16, String)>>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(&self, method: HttpMethod, path: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .entry((method.as_str().to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
    }

    /// Number of requests sent to `path`, ignoring the query string.
    pub fn count(&self, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|req| request_path(&req.url) == path)
            .count()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
fn request_path(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .find('/')
        .map_or("/", |idx| &without_scheme[idx..]);
    path.split('?').next().unwrap_or(path)
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let key = (req.method.as_str().to_string(), request_path(&req.url).to_string());
        self.requests.borrow_mut().push(req);

        let mut responses = self.responses.borrow_mut();
        let response = match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        Ok(match response {
            Some((status, body)) => HttpResponse { status, body },
            None => HttpResponse {
                status: 404,
                body: r#"{"message":"Not Found"}"#.to_string(),
            },
        })
    }
}
