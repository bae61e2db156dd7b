use thiserror::Error;

/// Classification shared by every component that reports a failure to the
/// presentation layer.
///
/// Crate-level error types (`CatalogError`, `QuoteSourceError`, ...) carry the
/// detail; `ErrorKind` is what a screen branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The submitted query is shorter than the two-character minimum.
    QueryTooShort,
    /// The first page of a search came back empty.
    NoResults,
    /// A network call did not complete within its fixed window.
    Timeout,
    /// The remote side answered with a body we could not interpret.
    MalformedResponse,
    /// Connection failure, or a non-2xx status carrying a server message.
    NetworkFailure,
    /// No retailer satisfied the active comparison policy.
    NoQualifyingRetailer,
}

impl ErrorKind {
    /// Returns `true` for transport-level failures the caller may retry by
    /// submitting again.
    #[must_use]
    pub fn is_transport(self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout | ErrorKind::MalformedResponse | ErrorKind::NetworkFailure
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::QueryTooShort => "query too short",
            ErrorKind::NoResults => "no results",
            ErrorKind::Timeout => "timeout",
            ErrorKind::MalformedResponse => "malformed response",
            ErrorKind::NetworkFailure => "network failure",
            ErrorKind::NoQualifyingRetailer => "no qualifying retailer",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read retailers file {path}: {source}")]
    RetailersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse retailers file: {0}")]
    RetailersFileParse(#[from] serde_yaml::Error),

    #[error("retailers validation failed: {0}")]
    Validation(String),
}
