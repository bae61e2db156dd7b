use std::time::Duration;

use metriks_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response shape for {context}: {reason}")]
    UnexpectedShape { context: String, reason: String },

    /// Non-2xx status whose body carried a JSON `{ "error": ... }` message.
    #[error("catalog service returned {status}: {message}")]
    Server { status: u16, message: String },

    /// Non-2xx status with a body we could not interpret.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("catalog request timed out after {}s", .after.as_secs())]
    Timeout { after: Duration },

    #[error("invalid catalog base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl CatalogError {
    /// Maps the error onto the kind a presentation layer branches on.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Http(e) if e.is_timeout() => ErrorKind::Timeout,
            CatalogError::Http(e) if e.is_decode() => ErrorKind::MalformedResponse,
            CatalogError::Timeout { .. } => ErrorKind::Timeout,
            CatalogError::Http(_) | CatalogError::Server { .. } => ErrorKind::NetworkFailure,
            CatalogError::Deserialize { .. }
            | CatalogError::UnexpectedShape { .. }
            | CatalogError::UnexpectedStatus { .. }
            | CatalogError::InvalidBaseUrl { .. } => ErrorKind::MalformedResponse,
        }
    }
}

#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("no position available: {0}")]
    Unavailable(String),

    #[error("location permission denied")]
    PermissionDenied,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_is_network_failure() {
        let err = CatalogError::Server {
            status: 500,
            message: "database unavailable".to_owned(),
        };
        assert_eq!(err.kind(), ErrorKind::NetworkFailure);
        assert!(err.to_string().contains("database unavailable"));
    }

    #[test]
    fn unreadable_status_is_malformed() {
        let err = CatalogError::UnexpectedStatus {
            status: 502,
            url: "https://catalog.example.com/search/pharma".to_owned(),
        };
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn deserialize_error_is_malformed() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CatalogError::Deserialize {
            context: "catalog page 1".to_owned(),
            source,
        };
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn timeout_maps_to_timeout_kind() {
        let err = CatalogError::Timeout {
            after: Duration::from_secs(10),
        };
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.to_string(), "catalog request timed out after 10s");
    }
}
