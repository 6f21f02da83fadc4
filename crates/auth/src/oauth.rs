//! OAuth 2.0 refresh-token grant.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

use cutter_net::TokenRefresher;

use crate::error::{Error, ErrorKind, Result};

/// Where the refresh token lives between refreshes.
pub trait RefreshTokenStore: Send + Sync {
    /// Current refresh token, if any.
    fn refresh_token(&self) -> Option<String>;

    /// Replace the refresh token (when the server rotates it).
    fn set_refresh_token(&self, token: String);
}

/// OAuth client settings for the token endpoint.
#[derive(Clone)]
pub struct OAuthConfig {
    token_url: Url,
    client_id: String,
    client_secret: Option<String>,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl OAuthConfig {
    pub fn new(token_url: &str, client_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            token_url: Url::parse(token_url)?,
            client_id: client_id.into(),
            client_secret: None,
        })
    }

    /// Set the client secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// Token response from the token endpoint.
///
/// Tokens are redacted in Debug output.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Present when the server rotates the refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Renews access tokens with the stored refresh token.
///
/// Plugs into [`cutter_net::ApiClient`] as its [`TokenRefresher`]. The new
/// access token is handed back to the client, which stores it; a rotated
/// refresh token is written to the [`RefreshTokenStore`] here.
#[derive(Clone)]
pub struct RefreshTokenProvider {
    config: OAuthConfig,
    store: Arc<dyn RefreshTokenStore>,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for RefreshTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RefreshTokenProvider {
    pub fn new(config: OAuthConfig, store: Arc<dyn RefreshTokenStore>) -> Self {
        Self {
            config,
            store,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Exchange the stored refresh token for a new access token.
    #[instrument(skip(self), fields(token_url = %self.config.token_url))]
    pub async fn refresh(&self) -> Result<TokenResponse> {
        let refresh_token = self
            .store
            .refresh_token()
            .ok_or_else(|| Error::new(ErrorKind::MissingRefreshToken))?;

        let mut params = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", self.config.client_id.as_str()),
        ];

        if let Some(ref secret) = self.config.client_secret {
            params.push(("client_secret", secret.as_str()));
        }

        let body = serde_urlencoded::to_string(params)?;

        let response = self
            .http_client
            .post(self.config.token_url.clone())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let token = handle_token_response(response).await?;

        if let Some(rotated) = &token.refresh_token {
            debug!("Refresh token rotated");
            self.store.set_refresh_token(rotated.clone());
        }

        Ok(token)
    }
}

#[async_trait]
impl TokenRefresher for RefreshTokenProvider {
    async fn refresh_token(&self) -> cutter_net::Result<String> {
        let token = self.refresh().await?;
        Ok(token.access_token)
    }
}

async fn handle_token_response(response: reqwest::Response) -> Result<TokenResponse> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        let error = serde_json::from_str::<OAuthErrorResponse>(&body).unwrap_or_else(|_| {
            OAuthErrorResponse {
                error: status.as_u16().to_string(),
                error_description: status.canonical_reason().unwrap_or_default().to_string(),
            }
        });
        warn!(status = status.as_u16(), error = %error.error, "Token endpoint rejected refresh");
        return Err(Error::new(ErrorKind::OAuth {
            error: error.error,
            description: error.error_description,
        }));
    }

    let token: TokenResponse = response.json().await?;
    Ok(token)
}
