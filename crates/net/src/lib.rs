//! # cutter-net
//!
//! Typed HTTP client core for the app backend.
//!
//! This crate provides:
//! - Endpoint descriptors that describe a call declaratively
//! - URL / JSON parameter encoding and multipart bodies
//! - Request signing with an HMAC over URL, device and parameters
//! - Status classification with human-readable failure categories
//! - A bounded 401 refresh-and-retry loop
//! - Request/response tracing with secret redaction
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (cutter-rest: EndPoint, Api, Services)                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ApiClient                              │
//! │  - Classifies responses, decodes typed payloads             │
//! │  - Refreshes the access token on 401 and resends            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Router                                │
//! │  - RequestBuilder: headers, parameters, signature           │
//! │  - Sends over reqwest, tracks the in-flight request         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use cutter_net::{ApiClient, ClientConfig, Environment};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cutter_net::Error> {
//!     let environment = Environment::from_env()?;
//!     let client = ApiClient::new(environment, keychain, refresher, ClientConfig::default())?;
//!
//!     let posts: Vec<Post> = client.perform(&EndPoint::GetPosts { page: 1, style_id: 5 }).await?;
//!     client.perform_empty(&EndPoint::DeleteUser).await?;
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod client;
mod config;
mod credentials;
mod encoding;
mod endpoint;
mod error;
pub mod headers;
pub mod logger;
mod request;
mod response;
mod retry;
mod router;
pub mod signature;
mod task;

pub use builder::{append_path, RequestBuilder};
pub use client::{ApiClient, Page};
pub use config::{
    current_locale, ClientConfig, ClientConfigBuilder, Environment, DEFAULT_LOCALE, DEFAULT_PLATFORM,
};
pub use credentials::{CredentialStore, TokenRefresher};
pub use encoding::{encode_json, encode_url, parameters_from, query_string, ParameterEncoding, Parameters};
pub use endpoint::{EndpointDescriptor, HttpHeaders, HttpMethod};
pub use error::{Error, ErrorKind, Result};
pub use request::{TransportRequest, INITIAL_TIMEOUT};
pub use response::{NetworkResponseCategory, RequestState, Response, ResponseClass};
pub use retry::{AuthRetryConfig, AuthRetryPolicy};
pub use router::Router;
pub use task::{HttpTask, MultipartForm};

pub use async_trait::async_trait;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("cutter-net/", env!("CARGO_PKG_VERSION"));
