//! Transport boundary between the search client and the network.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// HTTP headers represented as key/value pairs.
///
/// Header names are treated case-insensitively by helper functions.
pub type HttpHeaders = Vec<(String, String)>;

/// An outbound GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HttpHeaders,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A response as seen by the classifier: status, headers and the raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    /// Body decoded as UTF-8, or `None` if it is not valid text.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("http transport error: {0}")]
    Transport(String),

    #[error("no mock response registered for GET {url}")]
    NoMockResponse { url: String },
}

/// Transport boundary for all HTTP I/O.
///
/// Implementations must not block the calling task while waiting on the
/// network.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Get the first header value matching `name` (case-insensitive).
#[must_use]
pub fn header_get<'a>(headers: &'a HttpHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// A real HTTP transport backed by reqwest.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a transport whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.client.get(&request.url);
        for (k, v) in request.headers {
            builder = builder.header(&k, &v);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        let headers: HttpHeaders = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let body = resp
            .bytes()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

// ---------- Test-only mock transport ----------

#[cfg(test)]
pub(crate) use mock::MockTransport;

#[cfg(test)]
mod mock {
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// In-memory mock transport: no sockets, responses served per URL in FIFO order.
    #[derive(Clone, Default)]
    pub(crate) struct MockTransport {
        inner: Arc<Mutex<MockTransportInner>>,
    }

    #[derive(Default)]
    struct MockTransportInner {
        routes: HashMap<String, VecDeque<Result<HttpResponse, String>>>,
        requests: Vec<HttpRequest>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn push_response(&self, url: impl Into<String>, response: HttpResponse) {
            self.push(url.into(), Ok(response));
        }

        /// Make the next GET of `url` fail at the transport level.
        pub(crate) fn push_failure(&self, url: impl Into<String>, message: impl Into<String>) {
            self.push(url.into(), Err(message.into()));
        }

        fn push(&self, url: String, outcome: Result<HttpResponse, String>) {
            let mut inner = self
                .inner
                .lock()
                .expect("mock transport lock should not be poisoned");
            inner.routes.entry(url).or_default().push_back(outcome);
        }

        #[must_use]
        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            let inner = self
                .inner
                .lock()
                .expect("mock transport lock should not be poisoned");
            inner.requests.clone()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn get(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let mut inner = self
                .inner
                .lock()
                .expect("mock transport lock should not be poisoned");

            let url = request.url.clone();
            inner.requests.push(request);

            match inner.routes.get_mut(&url).and_then(|q| q.pop_front()) {
                Some(Ok(resp)) => Ok(resp),
                Some(Err(message)) => Err(HttpError::Transport(message)),
                None => Err(HttpError::NoMockResponse { url }),
            }
        }
    }
}
