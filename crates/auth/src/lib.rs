//! # cutter-auth
//!
//! Credential sources for `cutter-net`.
//!
//! ## Security
//!
//! - Tokens and client secrets are redacted in Debug output
//! - Tracing skips credential values
//! - Stored credential files are written with `0600` permissions on Unix
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cutter_auth::{Keychain, OAuthConfig, RefreshTokenProvider};
//!
//! let keychain = Arc::new(Keychain::from_env()?);
//! let config = OAuthConfig::new("https://auth.example.com/oauth/token", "mobile-app")?;
//! let refresher = Arc::new(RefreshTokenProvider::new(config, keychain.clone()));
//!
//! let client = cutter_net::ApiClient::new(environment, keychain, refresher, Default::default())?;
//! ```

mod credentials;
mod error;
mod oauth;
mod storage;

pub use credentials::Keychain;
pub use error::{Error, ErrorKind, Result};
pub use oauth::{OAuthConfig, RefreshTokenProvider, RefreshTokenStore, TokenResponse};
pub use storage::{default_credentials_dir, FileCredentialStore, StoredCredentials};
