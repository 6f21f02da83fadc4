//! Turns endpoint descriptors into signed transport requests.

use std::sync::Arc;
use url::Url;

use crate::config::{ClientConfig, Environment};
use crate::credentials::CredentialStore;
use crate::endpoint::{EndpointDescriptor, HttpHeaders};
use crate::error::{Error, ErrorKind, Result};
use crate::headers;
use crate::request::TransportRequest;
use crate::signature::{self, SignatureInput};
use crate::task::HttpTask;

/// Builds [`TransportRequest`]s from endpoint descriptors.
///
/// Every request carries the device, platform and locale headers, the
/// access token when one is stored, and an `HMAC` signature computed over
/// the final URL and body.
#[derive(Clone)]
pub struct RequestBuilder {
    environment: Environment,
    config: ClientConfig,
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("environment", &self.environment)
            .field("mocked", &self.config.mocked)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

impl RequestBuilder {
    pub fn new(
        environment: Environment,
        credentials: Arc<dyn CredentialStore>,
        config: ClientConfig,
    ) -> Self {
        Self {
            environment,
            config,
            credentials,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Build the signed request for an endpoint.
    pub fn build<E: EndpointDescriptor + ?Sized>(&self, endpoint: &E) -> Result<TransportRequest> {
        let base_url = if self.config.mocked {
            self.environment.mocked_server_url().clone()
        } else {
            endpoint.base_url(&self.environment)
        };

        let method = endpoint.http_method();
        let url = append_path(&base_url, &endpoint.path())?;

        let mut request = TransportRequest::new(method, url);
        request.set_timeout(self.config.timeout);

        let platform = self.environment.platform();
        let device_id = self.credentials.device_id().unwrap_or_default();

        request.set_header(headers::UUID, device_id.as_str());
        request.set_header(headers::PLATFORM, platform);
        request.set_header(headers::LOCALE, self.environment.locale());

        if let Some(token) = self.credentials.access_token() {
            request.set_header(headers::ACCESS_TOKEN, token);
        }

        if let Some(static_headers) = endpoint.headers() {
            add_headers(&mut request, &static_headers);
        }

        apply_task(&mut request, endpoint.task()?)?;

        // Must run last: the signature covers the final URL and body.
        let parameters = endpoint
            .signs_parameters()
            .then(|| signature::parameter_string(method, &request));
        let url = request.url().to_string();
        let hmac = signature::sign(&SignatureInput {
            url: &url,
            api_key: self.environment.api_key(),
            platform,
            device_id: &device_id,
            parameters: parameters.as_deref(),
        })?;
        request.set_header(headers::HMAC, hmac);

        Ok(request)
    }
}

fn apply_task(request: &mut TransportRequest, task: HttpTask) -> Result<()> {
    match task {
        HttpTask::Request => {
            request.set_header(headers::CONTENT_TYPE, "application/json");
        }
        HttpTask::MultipartData { data, boundary } => {
            request.set_header(
                headers::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            );
            request.set_body(data);
        }
        HttpTask::RequestParameters {
            body_parameters,
            body_encoding,
            url_parameters,
        } => {
            body_encoding.encode(request, body_parameters.as_ref(), url_parameters.as_ref())?;
        }
        HttpTask::RequestParametersAndHeaders {
            body_parameters,
            body_encoding,
            url_parameters,
            additional_headers,
        } => {
            if let Some(ref extra) = additional_headers {
                add_headers(request, extra);
            }
            body_encoding.encode(request, body_parameters.as_ref(), url_parameters.as_ref())?;
        }
    }
    Ok(())
}

fn add_headers(request: &mut TransportRequest, extra: &HttpHeaders) {
    for (name, value) in extra {
        request.set_header(name.as_str(), value.as_str());
    }
}

/// Append `path` to the base URL as path components.
///
/// `https://api.example.com/v1` + `/posts` gives `https://api.example.com/v1/posts`.
pub fn append_path(base: &Url, path: &str) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            Error::new(ErrorKind::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                base
            )))
        })?;
        segments.pop_if_empty();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            segments.push(segment);
        }
    }
    Ok(url)
}
