use std::time::Duration;

use metriks_core::ErrorKind;
use thiserror::Error;

use crate::types::RetailerTotal;

/// Errors returned by a retailer quote source.
#[derive(Debug, Error)]
pub enum QuoteSourceError {
    /// Network or TLS failure from the underlying HTTP client.
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

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("quote source for {retailer_id} timed out after {}ms", .after.as_millis())]
    Timeout { retailer_id: String, after: Duration },

    #[error("invalid quote URL for {retailer_id}: {reason}")]
    InvalidQuoteUrl { retailer_id: String, reason: String },
}

impl QuoteSourceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuoteSourceError::Http(e) if e.is_timeout() => ErrorKind::Timeout,
            QuoteSourceError::Timeout { .. } => ErrorKind::Timeout,
            QuoteSourceError::Http(_) => ErrorKind::NetworkFailure,
            QuoteSourceError::Deserialize { .. }
            | QuoteSourceError::UnexpectedShape { .. }
            | QuoteSourceError::UnexpectedStatus { .. }
            | QuoteSourceError::InvalidQuoteUrl { .. } => ErrorKind::MalformedResponse,
        }
    }
}

/// Errors from building a basket.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("item id must be non-empty")]
    EmptyItemId,

    #[error("quantity for item {item_id} must be at least 1")]
    ZeroQuantity { item_id: String },

    #[error("invalid item spec \"{spec}\": expected ID or ID:QTY")]
    InvalidItemSpec { spec: String },
}

/// The outcome of a comparison that produced no recommendation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComparisonError {
    /// No retailer met the policy. The per-retailer totals are still reported.
    #[error("no retailer qualifies under the comparison policy ({} compared)", .totals.len())]
    NoQualifyingRetailer { totals: Vec<RetailerTotal> },
}

impl ComparisonError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ComparisonError::NoQualifyingRetailer { .. } => ErrorKind::NoQualifyingRetailer,
        }
    }

    /// Totals computed before the comparison gave up.
    #[must_use]
    pub fn totals(&self) -> &[RetailerTotal] {
        match self {
            ComparisonError::NoQualifyingRetailer { totals } => totals,
        }
    }
}
