//! Error types for cutter-rest.

/// Result type alias for cutter-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for cutter-rest operations.
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

    /// The underlying network error kind, if this came from a request.
    pub fn net_kind(&self) -> Option<&cutter_net::ErrorKind> {
        match &self.kind {
            ErrorKind::Net(kind) => Some(kind),
            _ => None,
        }
    }

    /// Returns true if the server still rejected the session after a refresh.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Net(cutter_net::ErrorKind::Authentication { .. })
                | ErrorKind::Net(cutter_net::ErrorKind::Refresh(_))
        )
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Request failed; the message is the one shown to users.
    #[error("{0}")]
    Net(cutter_net::ErrorKind),

    /// Mocked data could not be loaded.
    #[error("Couldn't load mocked data: {0}")]
    Fixture(String),
}

impl From<cutter_net::Error> for Error {
    fn from(err: cutter_net::Error) -> Self {
        Self {
            kind: ErrorKind::Net(err.kind),
            source: err.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_errors_keep_their_message() {
        let err: Error = cutter_net::Error::new(cutter_net::ErrorKind::NoData).into();
        assert_eq!(err.to_string(), "Response returned with no data to decode.");
        assert!(matches!(err.net_kind(), Some(cutter_net::ErrorKind::NoData)));
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_auth_errors() {
        let err: Error = cutter_net::Error::new(cutter_net::ErrorKind::Authentication {
            status: 401,
            message: String::new(),
        })
        .into();
        assert!(err.is_auth_error());

        let err = Error::new(ErrorKind::Fixture("missing".into()));
        assert!(!err.is_auth_error());
        assert!(err.net_kind().is_none());
    }
}
