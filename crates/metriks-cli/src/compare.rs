//! `metriks compare`: collects quotes from the retailer registry and prints
//! the basket comparison.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use metriks_core::{load_retailers, AppConfig};
use metriks_pricing::{
    build_http_client, compare, Basket, ComparisonPolicy, ComparisonResult, DesiredItem,
    HttpQuoteSource, QuoteCollector, RetailerQuoteSource, RetailerTotal,
};

/// Price `items` at the configured retailers and print the ranking.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded, a `--retailer` id is
/// unknown, or no retailer qualifies.
pub(crate) async fn run_compare(
    config: &AppConfig,
    items: &[DesiredItem],
    retailers: &[String],
    allow_partial: bool,
) -> anyhow::Result<()> {
    let registry = load_retailers(&config.retailers_path)?;
    if let Some(unknown) = retailers.iter().find(|id| registry.find(id).is_none()) {
        anyhow::bail!(
            "unknown retailer '{unknown}'; check {}",
            config.retailers_path.display()
        );
    }

    let selected: Option<BTreeSet<String>> =
        (!retailers.is_empty()).then(|| retailers.iter().cloned().collect());

    let client = build_http_client(config.request_timeout_secs, &config.user_agent)?;
    let sources: Vec<Arc<dyn RetailerQuoteSource>> =
        HttpQuoteSource::from_registry(&client, &registry)?
            .into_iter()
            .filter(|s| {
                selected
                    .as_ref()
                    .is_none_or(|ids| ids.contains(s.retailer_id()))
            })
            .map(|s| Arc::new(s) as Arc<dyn RetailerQuoteSource>)
            .collect();

    let mut basket = Basket::new();
    basket.extend(items.iter().cloned());

    let collector = QuoteCollector::new(sources, Duration::from_secs(config.request_timeout_secs));
    tracing::info!(
        retailers = collector.source_count(),
        items = basket.len(),
        "collecting quotes"
    );
    let quotes = collector.collect(&basket.item_ids()).await;
    for (retailer, reason) in quotes.failures() {
        println!("warning: no quotes from {retailer}: {reason}");
    }
    if quotes.is_empty() {
        anyhow::bail!("no retailer returned quotes");
    }

    let policy = ComparisonPolicy {
        allow_partial: allow_partial || config.allow_partial,
        retailers: selected,
    };

    match compare(basket.items(), &quotes, &policy) {
        Ok(result) => {
            print_result(&result);
            Ok(())
        }
        Err(e) => {
            print_totals(e.totals());
            anyhow::bail!("{e}; rerun with --allow-partial to include incomplete baskets")
        }
    }
}

fn print_result(result: &ComparisonResult) {
    print_totals(&result.totals);
    println!();
    println!(
        "cheapest: {} at {}{}",
        result.cheapest.retailer_id,
        result.cheapest.total.round_dp(2),
        if result.cheapest.partial {
            " (partial basket)"
        } else {
            ""
        }
    );
    println!("savings vs. most expensive: {}", result.savings.round_dp(2));
    println!("ranking: {}", result.ranking.join(" > "));
}

fn print_totals(totals: &[RetailerTotal]) {
    println!("{:<18}{:>12}  MISSING", "RETAILER", "TOTAL");
    for total in totals {
        let missing = if total.missing_item_ids.is_empty() {
            "-".to_string()
        } else {
            total.missing_item_ids.join(", ")
        };
        println!(
            "{:<18}{:>12}  {}",
            crate::search::truncate(&total.retailer_id, 16),
            total.total.round_dp(2).to_string(),
            missing
        );
    }
}
