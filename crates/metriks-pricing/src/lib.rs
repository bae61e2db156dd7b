//! Multi-retailer basket pricing: quote collection and comparison.

pub mod aggregator;
pub mod basket;
pub mod error;
pub mod quote_set;
pub mod source;
pub mod types;

pub use aggregator::compare;
pub use basket::Basket;
pub use error::{ComparisonError, PricingError, QuoteSourceError};
pub use quote_set::{QuoteCollector, RetailerQuoteSet};
pub use source::{build_http_client, HttpQuoteSource, RetailerQuoteSource, StaticQuoteSource};
pub use types::{ComparisonPolicy, ComparisonResult, DesiredItem, RetailerQuote, RetailerTotal};
