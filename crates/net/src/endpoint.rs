//! Declarative description of API operations.

use std::borrow::Cow;
use std::collections::BTreeMap;
use url::Url;

use crate::config::Environment;
use crate::error::Result;
use crate::task::HttpTask;

/// Static headers attached to a request, keyed by header name.
pub type HttpHeaders = BTreeMap<String, String>;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// The method as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    /// Methods whose parameters travel in the query string.
    pub fn uses_query_parameters(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description of a single API operation.
///
/// Implement this on an enum with one variant per operation; the request
/// builder only ever talks to the trait, so adding a variant never touches
/// the transport code.
///
/// # Example
///
/// ```rust
/// use std::borrow::Cow;
/// use cutter_net::{EndpointDescriptor, HttpMethod, HttpTask, Result};
///
/// enum Health {
///     Ping,
/// }
///
/// impl EndpointDescriptor for Health {
///     fn path(&self) -> Cow<'_, str> {
///         Cow::Borrowed("/ping")
///     }
///
///     fn http_method(&self) -> HttpMethod {
///         HttpMethod::Get
///     }
///
///     fn task(&self) -> Result<HttpTask> {
///         Ok(HttpTask::Request)
///     }
/// }
/// ```
pub trait EndpointDescriptor: Send + Sync {
    /// The server this operation lives on.
    fn base_url(&self, environment: &Environment) -> Url {
        environment.server_url().clone()
    }

    /// Path appended to the base URL.
    fn path(&self) -> Cow<'_, str>;

    fn http_method(&self) -> HttpMethod;

    /// How parameters are attached to the request.
    fn task(&self) -> Result<HttpTask>;

    /// Static headers for this operation.
    fn headers(&self) -> Option<HttpHeaders> {
        None
    }

    /// Whether the request signature covers the parameter string.
    fn signs_parameters(&self) -> bool {
        false
    }
}
