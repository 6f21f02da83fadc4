//! Error types for cutter-net.

/// Result type alias for cutter-net operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for cutter-net operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this error can be recovered by refreshing the access token.
    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }

    /// Returns true if no response was received at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self.kind, ErrorKind::Connectivity(_) | ErrorKind::Timeout)
    }

    /// Returns true if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication { .. })
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Authentication { status, .. }
            | ErrorKind::Client { status, .. }
            | ErrorKind::Server { status, .. }
            | ErrorKind::Outdated { status }
            | ErrorKind::Failed { status } => Some(*status),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// No response was received (offline, DNS, refused connection...).
    #[error("Please check your network connection. ({0})")]
    Connectivity(String),

    /// The request did not complete within its timeout.
    #[error("Please check your network connection. (request timed out)")]
    Timeout,

    /// HTTP 401, recoverable through a token refresh.
    #[error("Error {status} - You need to be authenticated first. {message}")]
    Authentication { status: u16, message: String },

    /// Other 4xx responses.
    #[error("Error {status} - Bad request {message}")]
    Client { status: u16, message: String },

    /// 5xx responses.
    #[error("Error {status} - Server error {message}")]
    Server { status: u16, message: String },

    /// Status 600: the endpoint is no longer served.
    #[error("Error {status} - The url you requested is outdated.")]
    Outdated { status: u16 },

    /// Any other non-success status.
    #[error("Error {status} - Network request failed.")]
    Failed { status: u16 },

    /// Successful response without the body the caller expected.
    #[error("Response returned with no data to decode.")]
    NoData,

    /// Successful response whose body does not match the expected shape.
    #[error("We could not decode the response. ({0})")]
    Decode(String),

    /// Parameters could not be encoded into the request.
    #[error("Parameter encoding failed: {0}")]
    Encoding(String),

    /// The request signature could not be computed.
    #[error("Signature error: {0}")]
    Signature(String),

    /// The request URL could not be composed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The access token could not be refreshed after a 401.
    #[error("Token refresh failed: {0}")]
    Refresh(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ErrorKind {
    /// Returns true if this error kind triggers a token refresh.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorKind::Authentication { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_builder() {
            ErrorKind::InvalidUrl(err.to_string())
        } else {
            ErrorKind::Connectivity(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Decode(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}
