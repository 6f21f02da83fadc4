//! Typed API client with response classification and 401 refresh-and-retry.
//!
//! ## Security
//!
//! - Refreshed tokens are never logged
//! - Error bodies are sanitized before being surfaced

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{ClientConfig, Environment};
use crate::credentials::{CredentialStore, TokenRefresher};
use crate::endpoint::EndpointDescriptor;
use crate::headers;
use crate::error::{Error, ErrorKind, Result};
use crate::logger;
use crate::response::{Response, ResponseClass};
use crate::retry::AuthRetryPolicy;
use crate::router::Router;

/// A decoded payload plus whether the server has more pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: T,
    /// Set when the server answered 206 Partial Content.
    pub has_more_content_available: bool,
}

/// Sends endpoints through a [`Router`] and turns responses into typed results.
///
/// On 401 the client asks its [`TokenRefresher`] for a new token, stores it
/// in the credential store, then rebuilds and resends the request. The number
/// of resends is bounded by `ClientConfig::auth_retry`; a failed refresh is
/// reported to the caller.
///
/// Clones share one refresh lock. Requests rejected with the same token
/// wait for a single refresh instead of each spending the refresh token.
///
/// # Example
///
/// ```rust,ignore
/// let client = ApiClient::new(environment, keychain, refresher, ClientConfig::default())?;
/// let page: Page<Vec<Post>> = client.perform_paginated(&EndPoint::GetPosts { page: 1, style_id: 5 }).await?;
/// ```
pub struct ApiClient<E> {
    router: Router<E>,
    refresher: Arc<dyn TokenRefresher>,
    refresh_lock: Arc<Mutex<()>>,
}

impl<E> Clone for ApiClient<E> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
            refresher: Arc::clone(&self.refresher),
            refresh_lock: Arc::clone(&self.refresh_lock),
        }
    }
}

impl<E> std::fmt::Debug for ApiClient<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

impl<E: EndpointDescriptor> ApiClient<E> {
    pub fn new(
        environment: Environment,
        credentials: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        config: ClientConfig,
    ) -> Result<Self> {
        let router = Router::new(environment, credentials, config)?;
        Ok(Self::from_router(router, refresher))
    }

    pub fn from_router(router: Router<E>, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            router,
            refresher,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn router(&self) -> &Router<E> {
        &self.router
    }

    /// Send the endpoint and decode the JSON body.
    pub async fn perform<T: DeserializeOwned>(&self, endpoint: &E) -> Result<T> {
        let response = self.execute(endpoint).await?;
        self.decode(endpoint, &response)
    }

    /// Send the endpoint and decode one page of a paginated list.
    pub async fn perform_paginated<T: DeserializeOwned>(&self, endpoint: &E) -> Result<Page<T>> {
        let response = self.execute(endpoint).await?;
        let items = self.decode(endpoint, &response)?;
        Ok(Page {
            items,
            has_more_content_available: response.is_partial_content(),
        })
    }

    /// Send the endpoint, ignoring any body on success.
    pub async fn perform_empty(&self, endpoint: &E) -> Result<()> {
        let response = self.execute(endpoint).await?;
        if self.router.config().enable_tracing {
            logger::log_response(endpoint.http_method(), &response, None);
        }
        Ok(())
    }

    /// Send the endpoint and read one integer counter out of a JSON object body.
    ///
    /// A missing key reads as `0`; any other body shape is `NoData`.
    pub async fn perform_count(&self, endpoint: &E, json_key: &str) -> Result<String> {
        let response = self.execute(endpoint).await?;
        let value = self.parse(endpoint, &response)?;

        let counters: HashMap<String, i64> =
            serde_json::from_value(value).map_err(|_| Error::new(ErrorKind::NoData))?;

        Ok(counters.get(json_key).copied().unwrap_or(0).to_string())
    }

    /// Send with classification and the bounded refresh-and-retry loop.
    ///
    /// Only 2xx responses come back as `Ok`.
    #[instrument(skip(self, endpoint), fields(method = %endpoint.http_method(), path = %endpoint.path()))]
    pub async fn execute(&self, endpoint: &E) -> Result<Response> {
        let mut policy = AuthRetryPolicy::new(self.router.config().auth_retry.clone());

        loop {
            let request = self.router.builder().build(endpoint)?;
            let sent_token = request.header(headers::ACCESS_TOKEN).map(str::to_owned);
            let response = self.router.dispatch(&request).await?;

            match response.class() {
                ResponseClass::Success => return Ok(response),
                ResponseClass::AuthenticationRequired => {
                    let path = response.url().path().to_string();

                    if !policy.next_attempt() {
                        warn!(
                            path = %path,
                            attempts = policy.attempt(),
                            "Authentication still rejected, giving up"
                        );
                        return Err(failure(&response));
                    }

                    error!(path = %path, "Authentication error, renewing access token and retrying request");
                    self.renew_access_token(sent_token.as_deref()).await?;
                    info!(attempt = policy.attempt(), "Retrying with renewed access token");
                }
                _ => return Err(failure(&response)),
            }
        }
    }

    /// Replace the access token that was rejected.
    ///
    /// If the stored token no longer matches `rejected`, another request has
    /// already renewed it and no refresh is made.
    async fn renew_access_token(&self, rejected: Option<&str>) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;

        let current = self.router.credentials().access_token();
        if current.as_deref() != rejected {
            debug!("Access token already renewed by a concurrent request");
            return Ok(());
        }

        let token = self.refresh().await?;
        self.router.credentials().set_access_token(token);
        Ok(())
    }

    async fn refresh(&self) -> Result<String> {
        self.refresher.refresh_token().await.map_err(|err| {
            error!(error = %err, "Error refreshing the access token");
            match err.kind {
                ErrorKind::Refresh(_) => err,
                _ => Error::with_source(ErrorKind::Refresh(err.to_string()), err),
            }
        })
    }

    fn parse(&self, endpoint: &E, response: &Response) -> Result<serde_json::Value> {
        if response.is_empty() {
            return Err(Error::new(ErrorKind::NoData));
        }

        let value: serde_json::Value = response.json().map_err(|err| {
            error!(error = %err, "Response body is not JSON");
            err
        })?;

        if self.router.config().enable_tracing {
            logger::log_response(endpoint.http_method(), response, Some(&value));
        }

        Ok(value)
    }

    fn decode<T: DeserializeOwned>(&self, endpoint: &E, response: &Response) -> Result<T> {
        let value = self.parse(endpoint, response)?;
        serde_json::from_value(value).map_err(|err| {
            error!(error = %err, "Unable to decode response");
            err.into()
        })
    }
}

fn failure(response: &Response) -> Error {
    response.error().unwrap_or_else(|| {
        Error::new(ErrorKind::Failed {
            status: response.status(),
        })
    })
}
