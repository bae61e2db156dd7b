//! Retailer quote sources.
//!
//! [`HttpQuoteSource`] calls a retailer's quote endpoint:
//! `GET {quote_url}?items=A,B` answering either a bare array of quotes or
//! `{ "quotes": [...] }`. Entries may omit `retailerId` (the source's own id
//! is assumed) and `inStock` (defaults to `true`).

use std::time::Duration;

use async_trait::async_trait;
use metriks_core::{RetailerConfig, RetailersFile};
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::error::QuoteSourceError;
use crate::types::RetailerQuote;

#[async_trait]
pub trait RetailerQuoteSource: Send + Sync {
    fn retailer_id(&self) -> &str;

    /// Returns this retailer's quotes for `item_ids`. Items it cannot quote
    /// are simply absent.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteSourceError`] on transport or decoding failure.
    async fn fetch_quotes(&self, item_ids: &[String])
        -> Result<Vec<RetailerQuote>, QuoteSourceError>;
}

/// Builds the HTTP client shared by every [`HttpQuoteSource`].
///
/// # Errors
///
/// Returns [`QuoteSourceError::Http`] if the client cannot be constructed.
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, QuoteSourceError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuote {
    #[serde(default)]
    retailer_id: Option<String>,
    item_id: String,
    unit_price: Decimal,
    #[serde(default)]
    in_stock: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct HttpQuoteSource {
    client: Client,
    retailer_id: String,
    quote_url: Url,
}

impl HttpQuoteSource {
    /// # Errors
    ///
    /// Returns [`QuoteSourceError::InvalidQuoteUrl`] if `quote_url` does not
    /// parse.
    pub fn new(client: Client, retailer_id: &str, quote_url: &str) -> Result<Self, QuoteSourceError> {
        let quote_url = Url::parse(quote_url).map_err(|e| QuoteSourceError::InvalidQuoteUrl {
            retailer_id: retailer_id.to_owned(),
            reason: format!("'{quote_url}': {e}"),
        })?;
        Ok(Self {
            client,
            retailer_id: retailer_id.to_owned(),
            quote_url,
        })
    }

    /// # Errors
    ///
    /// Same as [`HttpQuoteSource::new`].
    pub fn from_config(client: Client, retailer: &RetailerConfig) -> Result<Self, QuoteSourceError> {
        Self::new(client, &retailer.id, &retailer.quote_url)
    }

    /// Builds one source per registry entry, all sharing `client`.
    ///
    /// # Errors
    ///
    /// Returns the first [`QuoteSourceError::InvalidQuoteUrl`] encountered.
    pub fn from_registry(
        client: &Client,
        registry: &RetailersFile,
    ) -> Result<Vec<Self>, QuoteSourceError> {
        registry
            .retailers
            .iter()
            .map(|r| Self::from_config(client.clone(), r))
            .collect()
    }

    #[must_use]
    pub fn quotes_url(&self, item_ids: &[String]) -> Url {
        let mut url = self.quote_url.clone();
        url.query_pairs_mut()
            .append_pair("items", &item_ids.join(","));
        url
    }

    fn parse_entries(&self, entries: Vec<Value>) -> Vec<RetailerQuote> {
        entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<WireQuote>(entry) {
                Ok(wire) if wire.unit_price.is_sign_negative() => {
                    tracing::warn!(
                        retailer = %self.retailer_id,
                        item = %wire.item_id,
                        "skipping quote with negative price"
                    );
                    None
                }
                Ok(wire) => Some(RetailerQuote {
                    retailer_id: wire.retailer_id.unwrap_or_else(|| self.retailer_id.clone()),
                    item_id: wire.item_id,
                    unit_price: wire.unit_price,
                    in_stock: wire.in_stock.unwrap_or(true),
                }),
                Err(e) => {
                    tracing::warn!(retailer = %self.retailer_id, error = %e, "skipping unparseable quote");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl RetailerQuoteSource for HttpQuoteSource {
    fn retailer_id(&self) -> &str {
        &self.retailer_id
    }

    async fn fetch_quotes(
        &self,
        item_ids: &[String],
    ) -> Result<Vec<RetailerQuote>, QuoteSourceError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.quotes_url(item_ids);
        tracing::debug!(retailer = %self.retailer_id, %url, "fetching quotes");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(QuoteSourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let context = format!("quotes from {}", self.retailer_id);
        let value = serde_json::from_str::<Value>(&body).map_err(|e| {
            QuoteSourceError::Deserialize {
                context: context.clone(),
                source: e,
            }
        })?;

        let entries = match value {
            Value::Array(entries) => entries,
            Value::Object(mut map) => match map.remove("quotes") {
                Some(Value::Array(entries)) => entries,
                _ => {
                    return Err(QuoteSourceError::UnexpectedShape {
                        context,
                        reason: "object has no \"quotes\" array".to_owned(),
                    })
                }
            },
            _ => {
                return Err(QuoteSourceError::UnexpectedShape {
                    context,
                    reason: "expected an array or an object".to_owned(),
                })
            }
        };

        Ok(self.parse_entries(entries))
    }
}

/// Serves a fixed list of quotes. Useful for offline comparisons.
#[derive(Debug, Clone)]
pub struct StaticQuoteSource {
    retailer_id: String,
    quotes: Vec<RetailerQuote>,
}

impl StaticQuoteSource {
    #[must_use]
    pub fn new(retailer_id: &str, quotes: Vec<RetailerQuote>) -> Self {
        Self {
            retailer_id: retailer_id.to_owned(),
            quotes,
        }
    }
}

#[async_trait]
impl RetailerQuoteSource for StaticQuoteSource {
    fn retailer_id(&self) -> &str {
        &self.retailer_id
    }

    async fn fetch_quotes(
        &self,
        item_ids: &[String],
    ) -> Result<Vec<RetailerQuote>, QuoteSourceError> {
        Ok(self
            .quotes
            .iter()
            .filter(|q| item_ids.contains(&q.item_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(quote_url: &str) -> HttpQuoteSource {
        let client = build_http_client(5, "metriks-test/0.1").unwrap();
        HttpQuoteSource::new(client, "be-pharm", quote_url).unwrap()
    }

    #[test]
    fn quotes_url_joins_item_ids() {
        let url = source("https://quotes.be-pharm.example/v1/quotes")
            .quotes_url(&["A".to_owned(), "B".to_owned()]);
        assert_eq!(
            url.as_str(),
            "https://quotes.be-pharm.example/v1/quotes?items=A%2CB"
        );
    }

    #[test]
    fn new_rejects_unparseable_url() {
        let client = build_http_client(5, "metriks-test/0.1").unwrap();
        let err = HttpQuoteSource::new(client, "be-pharm", "quotes here").unwrap_err();
        assert!(matches!(err, QuoteSourceError::InvalidQuoteUrl { .. }));
    }

    #[test]
    fn wire_quote_without_retailer_takes_source_id() {
        let quotes = source("https://quotes.example").parse_entries(vec![
            serde_json::json!({"itemId": "A", "unitPrice": 4.5}),
            serde_json::json!({"itemId": "B", "unitPrice": "x"}),
            serde_json::json!({"retailerId": "shufersal", "itemId": "C", "unitPrice": "1.00", "inStock": false}),
            serde_json::json!({"itemId": "D", "unitPrice": "-2.00"}),
        ]);
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].retailer_id, "be-pharm");
        assert!(quotes[0].in_stock);
        assert_eq!(quotes[1].retailer_id, "shufersal");
        assert!(!quotes[1].in_stock);
    }

    #[tokio::test]
    async fn static_source_filters_to_requested_items() {
        let quote = |item: &str| RetailerQuote {
            retailer_id: "x".to_owned(),
            item_id: item.to_owned(),
            unit_price: Decimal::ONE,
            in_stock: true,
        };
        let source = StaticQuoteSource::new("x", vec![quote("A"), quote("B")]);
        let quotes = source.fetch_quotes(&["B".to_owned()]).await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].item_id, "B");
    }
}
