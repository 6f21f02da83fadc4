//! # cutter-api
//!
//! Typed, signed HTTP client for the app backend.
//!
//! ## Security
//!
//! - Tokens, API keys and client secrets are redacted in Debug output
//! - Request logging redacts the access token and signature headers
//! - Error bodies are scrubbed of bearer tokens before reaching callers
//!
//! ## Crates
//!
//! - **cutter-net** - Endpoint descriptors, parameter encoding, signing, routing, 401 refresh-and-retry
//! - **cutter-auth** - Keychain, file-backed credentials, OAuth refresh-token provider
//! - **cutter-rest** - The backend API: posts, search, movies, user deletion, mocked mode
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cutter_api::{Api, Environment, Keychain, LiveBackend, OAuthConfig, RefreshTokenProvider, Services};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let keychain = Arc::new(Keychain::from_env()?);
//!     let oauth = OAuthConfig::new("https://auth.example.com/oauth/token", "mobile-app")?;
//!
//!     let services = Services::from_args(
//!         std::env::args(),
//!         LiveBackend {
//!             environment: Environment::from_env()?,
//!             credentials: keychain.clone(),
//!             refresher: Arc::new(RefreshTokenProvider::new(oauth, keychain)),
//!             config: Default::default(),
//!         },
//!     )?;
//!
//!     let page = services.api().get_posts(1, 5).await?;
//!     for post in page.items {
//!         println!("{}", post.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

#[cfg(feature = "auth")]
pub use cutter_auth as auth;
#[cfg(feature = "net")]
pub use cutter_net as net;
#[cfg(feature = "rest")]
pub use cutter_rest as rest;

#[cfg(feature = "auth")]
pub use cutter_auth::{FileCredentialStore, Keychain, OAuthConfig, RefreshTokenProvider};
#[cfg(feature = "net")]
pub use cutter_net::{ClientConfig, Environment, Page};
#[cfg(feature = "rest")]
pub use cutter_rest::{Api, ApiClient, LiveBackend, MockedApiClient, Services};
