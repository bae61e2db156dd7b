//! Per-retailer quotes for one basket, and their concurrent collection.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use rust_decimal::Decimal;

use crate::error::QuoteSourceError;
use crate::source::RetailerQuoteSource;
use crate::types::RetailerQuote;

/// Quotes grouped by retailer id, plus the retailers whose source failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetailerQuoteSet {
    quotes: BTreeMap<String, Vec<RetailerQuote>>,
    failures: BTreeMap<String, String>,
}

impl RetailerQuoteSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups a flat list of quotes by their `retailer_id`.
    #[must_use]
    pub fn from_quotes(quotes: impl IntoIterator<Item = RetailerQuote>) -> Self {
        let mut set = Self::new();
        for quote in quotes {
            set.quotes
                .entry(quote.retailer_id.clone())
                .or_default()
                .push(quote);
        }
        set
    }

    /// Records the quotes one retailer returned. Quotes tagged with another
    /// retailer's id are dropped. The retailer is registered even when it
    /// quoted nothing.
    pub fn insert(&mut self, retailer_id: &str, quotes: Vec<RetailerQuote>) {
        let entry = self.quotes.entry(retailer_id.to_owned()).or_default();
        for quote in quotes {
            if quote.retailer_id == retailer_id {
                entry.push(quote);
            } else {
                tracing::warn!(
                    retailer = retailer_id,
                    quoted_for = %quote.retailer_id,
                    item = %quote.item_id,
                    "dropping quote tagged with another retailer"
                );
            }
        }
    }

    pub fn record_failure(&mut self, retailer_id: &str, reason: String) {
        self.failures.insert(retailer_id.to_owned(), reason);
    }

    /// Retailers that answered, in id order.
    pub fn retailer_ids(&self) -> impl Iterator<Item = &str> {
        self.quotes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn quotes_for(&self, retailer_id: &str) -> &[RetailerQuote] {
        self.quotes
            .get(retailer_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Lowest in-stock unit price `retailer_id` quoted for `item_id`.
    #[must_use]
    pub fn best_in_stock_price(&self, retailer_id: &str, item_id: &str) -> Option<Decimal> {
        self.quotes_for(retailer_id)
            .iter()
            .filter(|q| q.in_stock && q.item_id == item_id && !q.unit_price.is_sign_negative())
            .map(|q| q.unit_price)
            .min()
    }

    /// Retailers whose source failed, with the reason.
    #[must_use]
    pub fn failures(&self) -> &BTreeMap<String, String> {
        &self.failures
    }

    /// `true` when no retailer answered, even with an empty quote list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Queries every retailer source concurrently, each under its own timeout.
pub struct QuoteCollector {
    sources: Vec<Arc<dyn RetailerQuoteSource>>,
    per_source_timeout: Duration,
}

impl QuoteCollector {
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn RetailerQuoteSource>>, per_source_timeout: Duration) -> Self {
        Self {
            sources,
            per_source_timeout,
        }
    }

    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Collects quotes for `item_ids`. A failing or slow source is recorded
    /// in [`RetailerQuoteSet::failures`] and does not affect the others.
    pub async fn collect(&self, item_ids: &[String]) -> RetailerQuoteSet {
        let window = self.per_source_timeout;
        let fetches = self.sources.iter().map(|source| async move {
            let retailer_id = source.retailer_id().to_owned();
            let outcome = match tokio::time::timeout(window, source.fetch_quotes(item_ids)).await {
                Ok(result) => result,
                Err(_) => Err(QuoteSourceError::Timeout {
                    retailer_id: retailer_id.clone(),
                    after: window,
                }),
            };
            (retailer_id, outcome)
        });

        let mut set = RetailerQuoteSet::new();
        for (retailer_id, outcome) in join_all(fetches).await {
            match outcome {
                Ok(quotes) => {
                    tracing::debug!(retailer = %retailer_id, quotes = quotes.len(), "quotes received");
                    set.insert(&retailer_id, quotes);
                }
                Err(e) => {
                    tracing::warn!(retailer = %retailer_id, kind = %e.kind(), error = %e, "quote source failed");
                    set.record_failure(&retailer_id, e.to_string());
                }
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticQuoteSource;

    fn quote(retailer: &str, item: &str, cents: i64, in_stock: bool) -> RetailerQuote {
        RetailerQuote {
            retailer_id: retailer.to_owned(),
            item_id: item.to_owned(),
            unit_price: Decimal::new(cents, 2),
            in_stock,
        }
    }

    #[test]
    fn best_price_ignores_out_of_stock_and_picks_lowest() {
        let set = RetailerQuoteSet::from_quotes(vec![
            quote("x", "A", 500, true),
            quote("x", "A", 100, false),
            quote("x", "A", 450, true),
        ]);
        assert_eq!(set.best_in_stock_price("x", "A"), Some(Decimal::new(450, 2)));
        assert_eq!(set.best_in_stock_price("x", "B"), None);
        assert_eq!(set.best_in_stock_price("y", "A"), None);
    }

    #[test]
    fn insert_drops_foreign_quotes_but_registers_retailer() {
        let mut set = RetailerQuoteSet::new();
        set.insert("x", vec![quote("y", "A", 100, true)]);
        assert_eq!(set.retailer_ids().collect::<Vec<_>>(), vec!["x"]);
        assert!(set.quotes_for("x").is_empty());
        assert!(!set.is_empty());
    }

    #[test]
    fn set_with_only_failures_is_empty() {
        let mut set = RetailerQuoteSet::new();
        assert!(set.is_empty());
        set.record_failure("x", "timed out".to_owned());
        assert!(set.is_empty());
    }

    #[test]
    fn best_price_skips_negative_quotes() {
        let set = RetailerQuoteSet::from_quotes(vec![
            quote("x", "A", -100, true),
            quote("x", "A", 300, true),
        ]);
        assert_eq!(set.best_in_stock_price("x", "A"), Some(Decimal::new(300, 2)));
    }

    #[tokio::test]
    async fn collect_gathers_every_source() {
        let sources: Vec<Arc<dyn RetailerQuoteSource>> = vec![
            Arc::new(StaticQuoteSource::new(
                "x",
                vec![quote("x", "A", 200, true), quote("x", "B", 300, true)],
            )),
            Arc::new(StaticQuoteSource::new("y", vec![quote("y", "A", 250, true)])),
        ];
        let collector = QuoteCollector::new(sources, Duration::from_secs(1));

        let set = collector.collect(&["A".to_owned()]).await;

        assert_eq!(set.retailer_ids().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(set.quotes_for("x").len(), 1, "only requested items are quoted");
        assert!(set.failures().is_empty());
    }
}
