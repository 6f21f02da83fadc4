//! Credential collaborators consumed by the request builder and typed client.

use async_trait::async_trait;

use crate::error::Result;

/// Source of the device identifier and access token.
///
/// Implementations must be safe to share between concurrent requests.
pub trait CredentialStore: Send + Sync {
    /// Identifier of this device, sent with every request.
    fn device_id(&self) -> Option<String>;

    /// Current access token, if the user is signed in.
    fn access_token(&self) -> Option<String>;

    /// Replace the access token (after a refresh).
    fn set_access_token(&self, token: String);
}

/// Obtains a fresh access token after the server rejected the current one.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Fetch a new access token.
    async fn refresh_token(&self) -> Result<String>;
}
