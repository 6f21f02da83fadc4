//! Transport-level request assembled by the request builder.

use bytes::Bytes;
use std::time::Duration;
use url::Url;

use crate::endpoint::HttpMethod;
use crate::headers;

/// Timeout a request starts with before the builder applies the configured one.
pub const INITIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully described HTTP request.
///
/// Built incrementally by [`RequestBuilder`](crate::RequestBuilder); treat it
/// as read-only once handed to the router.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub(crate) method: HttpMethod,
    pub(crate) url: Url,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<Bytes>,
    pub(crate) timeout: Duration,
}

impl TransportRequest {
    /// Create a new request with no headers and no body.
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
            timeout: INITIAL_TIMEOUT,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn url_mut(&mut self) -> &mut Url {
        &mut self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_method(&mut self, method: HttpMethod) {
        self.method = method;
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Set a header, replacing any existing value (names compare case-insensitively).
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Look up a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// All headers in insertion order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(headers::CONTENT_TYPE)
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = Some(body.into());
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// The body as UTF-8 text, if present and valid.
    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| std::str::from_utf8(body).ok())
    }

    /// Convert into a reqwest request on the given client.
    pub(crate) fn to_reqwest(&self, client: &reqwest::Client) -> reqwest::RequestBuilder {
        let mut req = client
            .request(self.method.to_reqwest(), self.url.clone())
            .timeout(self.timeout);

        for (name, value) in &self.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = self.body {
            req = req.body(body.clone());
        }

        req
    }
}
