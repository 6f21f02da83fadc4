//! Structured request/response logging.

use tracing::debug;

use crate::endpoint::HttpMethod;
use crate::headers;
use crate::request::TransportRequest;
use crate::response::Response;

/// Log an outgoing request.
///
/// Access token and signature values are redacted.
pub fn log_request(request: &TransportRequest) {
    let url = request.url();
    let headers = request
        .headers()
        .map(|(name, value)| {
            if headers::is_sensitive(name) {
                format!("{}: [REDACTED]", name)
            } else {
                format!("{}: {}", name, value)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    debug!(
        method = %request.method(),
        host = url.host_str().unwrap_or_default(),
        path = url.path(),
        query = url.query().unwrap_or_default(),
        headers = %headers,
        body = request.body_text().unwrap_or_default(),
        "Requesting"
    );
}

/// Log a successful response together with its decoded payload.
pub fn log_response(method: HttpMethod, response: &Response, data: Option<&serde_json::Value>) {
    let url = response.url();
    match data {
        Some(data) => debug!(
            host = url.host_str().unwrap_or("Unknown host"),
            path = url.path(),
            method = %method,
            status = response.status(),
            data = %data,
            "Success"
        ),
        None => debug!(
            host = url.host_str().unwrap_or("Unknown host"),
            path = url.path(),
            method = %method,
            status = response.status(),
            "Success"
        ),
    }
}
