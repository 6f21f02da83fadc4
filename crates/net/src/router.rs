//! Request dispatch over HTTP.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::AbortHandle;
use tracing::{debug, info, instrument};

use crate::builder::RequestBuilder;
use crate::config::{ClientConfig, Environment};
use crate::credentials::CredentialStore;
use crate::endpoint::EndpointDescriptor;
use crate::error::{Error, ErrorKind, Result};
use crate::logger;
use crate::request::TransportRequest;
use crate::response::Response;

/// Builds requests for endpoints of type `E` and sends them.
///
/// The router does not interpret status codes; see
/// [`ApiClient`](crate::ApiClient) for classification and retry.
///
/// A router remembers the last request started with [`Router::request`] so
/// it can be cancelled. Starting another request replaces that reference
/// without cancelling the earlier one.
pub struct Router<E> {
    http: reqwest::Client,
    builder: RequestBuilder,
    in_flight: Arc<Mutex<Option<AbortHandle>>>,
    _endpoint: PhantomData<fn(&E)>,
}

impl<E> Clone for Router<E> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            builder: self.builder.clone(),
            in_flight: Arc::clone(&self.in_flight),
            _endpoint: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for Router<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl<E: EndpointDescriptor> Router<E> {
    /// Create a router for the given environment and credentials.
    pub fn new(
        environment: Environment,
        credentials: Arc<dyn CredentialStore>,
        config: ClientConfig,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self {
            http,
            builder: RequestBuilder::new(environment, credentials, config),
            in_flight: Arc::new(Mutex::new(None)),
            _endpoint: PhantomData,
        })
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    pub fn config(&self) -> &ClientConfig {
        self.builder.config()
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        self.builder.credentials()
    }

    /// Build and send the request for an endpoint.
    #[instrument(skip(self, endpoint), fields(method = %endpoint.http_method(), path = %endpoint.path()))]
    pub async fn send(&self, endpoint: &E) -> Result<Response> {
        let request = self.builder.build(endpoint)?;
        self.dispatch(&request).await
    }

    /// Send an already built request.
    pub async fn dispatch(&self, request: &TransportRequest) -> Result<Response> {
        let tracing_enabled = self.config().enable_tracing;
        if tracing_enabled {
            logger::log_request(request);
        }

        let response = request.to_reqwest(&self.http).send().await?;
        let response = Response::from_reqwest(response).await?;

        if tracing_enabled {
            let status = response.status();
            let content_length = response.body().len();
            if response.is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Ok(response)
    }

    /// Send the request in the background and hand the outcome to `completion`.
    ///
    /// `completion` runs exactly once, unless the request is cancelled first.
    /// Must be called from within a tokio runtime.
    pub fn request<F>(&self, endpoint: E, completion: F)
    where
        E: 'static,
        F: FnOnce(Result<Response>) + Send + 'static,
    {
        let router = self.clone();
        let handle = tokio::spawn(async move {
            let result = router.send(&endpoint).await;
            completion(result);
        });

        *self.lock_in_flight() = Some(handle.abort_handle());
    }

    /// Abort the last request started with [`Router::request`], if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.lock_in_flight().take() {
            debug!("Cancelling in-flight request");
            handle.abort();
        }
    }

    /// Returns true while the last started request has not finished.
    pub fn is_in_flight(&self) -> bool {
        self.lock_in_flight()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
