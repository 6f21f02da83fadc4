//! Client configuration and the server environment.

use std::time::Duration;
use url::Url;

use crate::error::{Error, ErrorKind, Result};
use crate::retry::AuthRetryConfig;

/// Platform identifier sent with every request unless configured otherwise.
pub const DEFAULT_PLATFORM: &str = "ios";

/// Locale used when none can be derived from the process environment.
pub const DEFAULT_LOCALE: &str = "en_US";

/// Server-side settings every request depends on.
///
/// The API key is redacted in Debug output.
#[derive(Clone)]
pub struct Environment {
    server_url: Url,
    mocked_server_url: Url,
    api_key: String,
    platform: String,
    locale: String,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("server_url", &self.server_url.as_str())
            .field("mocked_server_url", &self.mocked_server_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("platform", &self.platform)
            .field("locale", &self.locale)
            .finish()
    }
}

impl Environment {
    /// Create an environment for the given server and API key.
    ///
    /// The mocked server defaults to the real one until set explicitly.
    pub fn new(server_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let server_url = Url::parse(server_url)?;
        Ok(Self {
            mocked_server_url: server_url.clone(),
            server_url,
            api_key: api_key.into(),
            platform: DEFAULT_PLATFORM.to_string(),
            locale: current_locale(),
        })
    }

    /// Load the environment from process variables.
    ///
    /// Required:
    /// - `CUTTER_SERVER_URL`
    /// - `CUTTER_API_KEY`
    ///
    /// Optional:
    /// - `CUTTER_MOCKED_SERVER_URL` (default: the server URL)
    /// - `CUTTER_PLATFORM` (default: "ios")
    /// - `CUTTER_LOCALE` (default: derived from `LC_ALL` / `LANG`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server_url = required_var(&var, "CUTTER_SERVER_URL")?;
        let api_key = required_var(&var, "CUTTER_API_KEY")?;

        let mut env = Self::new(&server_url, api_key)?;

        if let Some(mocked) = var("CUTTER_MOCKED_SERVER_URL") {
            env = env.with_mocked_server_url(&mocked)?;
        }
        if let Some(platform) = var("CUTTER_PLATFORM") {
            env = env.with_platform(platform);
        }
        if let Some(locale) = var("CUTTER_LOCALE") {
            env = env.with_locale(locale);
        }

        Ok(env)
    }

    /// Set the server used in mocked mode.
    pub fn with_mocked_server_url(mut self, url: &str) -> Result<Self> {
        self.mocked_server_url = Url::parse(url)?;
        Ok(self)
    }

    /// Set the platform identifier.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Set the locale identifier.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    pub fn mocked_server_url(&self) -> &Url {
        &self.mocked_server_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

fn required_var(var: impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    var(name).ok_or_else(|| {
        Error::new(ErrorKind::Config(format!(
            "environment variable {} not set",
            name
        )))
    })
}

/// Derive a locale identifier such as `fr_FR` from `LC_ALL` or `LANG`.
pub fn current_locale() -> String {
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find_map(|value| parse_locale(&value))
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

fn parse_locale(value: &str) -> Option<String> {
    // "de_DE.UTF-8@euro" -> "de_DE"
    let id = value.split(['.', '@']).next()?.trim();
    if id.is_empty() || id == "C" || id == "POSIX" {
        return None;
    }
    Some(id.to_string())
}

/// Configuration for the router and typed client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout applied to every built request.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Route every request to the mocked server URL.
    pub mocked: bool,
    /// Whether to log requests and responses.
    pub enable_tracing: bool,
    /// Refresh-and-retry behaviour on 401.
    pub auth_retry: AuthRetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: crate::USER_AGENT.to_string(),
            mocked: false,
            enable_tracing: true,
            auth_retry: AuthRetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for ClientConfig.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Send requests to the mocked server instead of the endpoint's base URL.
    pub fn mocked(mut self, mocked: bool) -> Self {
        self.config.mocked = mocked;
        self
    }

    /// Enable or disable request/response tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// Set the 401 refresh-and-retry configuration.
    pub fn with_auth_retry(mut self, auth_retry: AuthRetryConfig) -> Self {
        self.config.auth_retry = auth_retry;
        self
    }

    /// Never refresh and retry; 401 surfaces immediately.
    pub fn without_auth_retry(mut self) -> Self {
        self.config.auth_retry = AuthRetryConfig::no_retry();
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
