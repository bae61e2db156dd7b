//! `metriks search`: drives a `QueryController` and prints the results.

use std::sync::Arc;

use metriks_catalog::{
    resolve_mode, CatalogClient, FixedLocation, QueryController, SearchSession, SearchStatus,
};
use metriks_core::{AppConfig, ErrorKind, ProductSummary};
use tokio::sync::watch;

/// Run a search and print up to `pages` pages of results.
///
/// # Errors
///
/// Returns an error if the catalog client cannot be built or the search
/// ends in a transport failure or a too-short query.
pub(crate) async fn run_search(
    config: &AppConfig,
    text: &str,
    nearby: bool,
    pages: u32,
) -> anyhow::Result<()> {
    let client = CatalogClient::from_config(config)?;
    let controller = QueryController::from_config(Arc::new(client), config);
    let mode = resolve_mode(&FixedLocation::new(config.home_location), nearby).await;
    let mut updates = controller.subscribe();

    controller.submit(text, mode);
    let mut session = settle(&mut updates).await?;
    let mut loaded: u32 = 1;

    while loaded < pages && session.status() == SearchStatus::Ready {
        controller.load_more();
        session = settle(&mut updates).await?;
        loaded += 1;
    }

    if let Some(error) = session.error() {
        if error.kind == ErrorKind::NoResults {
            println!("no products found for \"{}\"", text.trim());
            return Ok(());
        }
        if error.kind.is_transport() {
            anyhow::bail!(
                "search failed ({}): {}; check METRIKS_CATALOG_BASE_URL and retry",
                error.kind,
                error.message
            );
        }
        anyhow::bail!("search failed ({}): {}", error.kind, error.message);
    }

    print_results(session.results());
    if session.status() == SearchStatus::Ready {
        println!("more results available; rerun with --pages {}", loaded + 1);
    }
    Ok(())
}

async fn settle(updates: &mut watch::Receiver<SearchSession>) -> anyhow::Result<SearchSession> {
    let session = updates
        .wait_for(|s| !s.status().is_in_flight())
        .await?
        .clone();
    Ok(session)
}

fn print_results(results: &[ProductSummary]) {
    let header = format!(
        "{:<12}{:<42}{:<18}{:>10}{:>10}",
        "ID", "NAME", "RETAILER", "PRICE", "KM"
    );
    println!("{header}");
    for product in results {
        println!(
            "{:<12}{:<42}{:<18}{:>10}{:>10}",
            product.id,
            truncate(&display_name(product), 40),
            truncate(&product.retailer_label, 16),
            product
                .unit_price
                .map_or_else(|| "-".to_string(), |p| p.round_dp(2).to_string()),
            product
                .distance_km
                .map_or_else(|| "-".to_string(), |d| format!("{d:.1}")),
        );
    }
    println!("{}", summary_line(results));
    if results.iter().any(ProductSummary::has_placeholder_image) {
        println!("* no product image");
    }
}

pub(crate) fn summary_line(results: &[ProductSummary]) -> String {
    let priced = results.iter().filter(|p| p.is_priced()).count();
    format!("{} products, {priced} priced", results.len())
}

/// Marks listings that only have the placeholder picture.
pub(crate) fn display_name(product: &ProductSummary) -> String {
    if product.has_placeholder_image() {
        format!("{} *", product.name)
    } else {
        product.name.clone()
    }
}

pub(crate) fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        format!(
            "{}...",
            value
                .chars()
                .take(max_chars.saturating_sub(3))
                .collect::<String>()
        )
    } else {
        value.to_string()
    }
}
