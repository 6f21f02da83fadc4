//! The application API and its live implementation.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

use cutter_net::{ClientConfig, CredentialStore, Environment, Page, TokenRefresher};

use crate::endpoint::EndPoint;
use crate::error::Result;
use crate::models::{Movie, Post, SearchPostsBody};

/// Operations the app performs against its backend.
///
/// Implemented by [`ApiClient`] for the real server and by
/// [`MockedApiClient`](crate::MockedApiClient) for offline runs.
#[async_trait]
pub trait Api: Send + Sync {
    /// One page of posts for a style.
    async fn get_posts(&self, page: u32, style_id: u64) -> Result<Page<Vec<Post>>>;

    /// One page of posts matching the search criteria.
    async fn search_posts(&self, page: u32, body: SearchPostsBody) -> Result<Page<Vec<Post>>>;

    /// Delete the signed-in user.
    async fn delete_user(&self) -> Result<()>;

    async fn fetch_movies(&self) -> Result<Vec<Movie>>;
}

/// Live API client.
///
/// Wraps [`cutter_net::ApiClient`] for the [`EndPoint`] set.
///
/// # Example
///
/// ```rust,ignore
/// use cutter_rest::{Api, ApiClient};
///
/// let api = ApiClient::new(environment, keychain, refresher, ClientConfig::default())?;
/// let page = api.get_posts(1, 5).await?;
/// if page.has_more_content_available {
///     let next = api.get_posts(2, 5).await?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: cutter_net::ApiClient<EndPoint>,
}

impl ApiClient {
    pub fn new(
        environment: Environment,
        credentials: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = cutter_net::ApiClient::new(environment, credentials, refresher, config)?;
        Ok(Self { client })
    }

    /// Create an API client from an existing network client.
    pub fn from_client(client: cutter_net::ApiClient<EndPoint>) -> Self {
        Self { client }
    }

    /// Get the underlying network client.
    pub fn inner(&self) -> &cutter_net::ApiClient<EndPoint> {
        &self.client
    }

    /// Start `endpoint` in the background and report only its status.
    ///
    /// Replaces the handle of any previous background request; see
    /// [`cutter_net::Router::request`].
    pub fn request_in_background<F>(&self, endpoint: EndPoint, completion: F)
    where
        F: FnOnce(cutter_net::Result<u16>) + Send + 'static,
    {
        self.client
            .router()
            .request(endpoint, move |result| completion(result.map(|r| r.status())));
    }

    /// Cancel the last background request, if still running.
    pub fn cancel(&self) {
        self.client.router().cancel();
    }
}

#[async_trait]
impl Api for ApiClient {
    #[instrument(skip(self))]
    async fn get_posts(&self, page: u32, style_id: u64) -> Result<Page<Vec<Post>>> {
        let endpoint = EndPoint::GetPosts { page, style_id };
        Ok(self.client.perform_paginated(&endpoint).await?)
    }

    #[instrument(skip(self, body))]
    async fn search_posts(&self, page: u32, body: SearchPostsBody) -> Result<Page<Vec<Post>>> {
        let endpoint = EndPoint::SearchPosts { page, body };
        Ok(self.client.perform_paginated(&endpoint).await?)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self) -> Result<()> {
        Ok(self.client.perform_empty(&EndPoint::DeleteUser).await?)
    }

    #[instrument(skip(self))]
    async fn fetch_movies(&self) -> Result<Vec<Movie>> {
        Ok(self.client.perform(&EndPoint::GetMovies).await?)
    }
}
