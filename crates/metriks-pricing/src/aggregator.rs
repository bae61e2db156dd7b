//! Basket price comparison across retailers.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::error::ComparisonError;
use crate::quote_set::RetailerQuoteSet;
use crate::types::{ComparisonPolicy, ComparisonResult, DesiredItem, RetailerTotal};

/// Prices the basket at every compared retailer and picks the cheapest.
///
/// Repeated item ids in `desired` are merged. A retailer with no in-stock
/// quote for an item lists it as missing; the item adds nothing to its total.
/// Negative prices and lines that would overflow the total count as missing.
///
/// # Errors
///
/// Returns [`ComparisonError::NoQualifyingRetailer`] when no retailer
/// qualifies under `policy`. An empty basket never qualifies.
pub fn compare(
    desired: &[DesiredItem],
    quotes: &RetailerQuoteSet,
    policy: &ComparisonPolicy,
) -> Result<ComparisonResult, ComparisonError> {
    let wanted = merge_desired(desired);

    let retailer_ids: Vec<String> = match &policy.retailers {
        Some(selected) => selected.iter().cloned().collect(),
        None => quotes.retailer_ids().map(str::to_owned).collect(),
    };

    let totals: Vec<RetailerTotal> = retailer_ids
        .iter()
        .map(|retailer_id| retailer_total(retailer_id, &wanted, quotes))
        .collect();

    let mut qualifying: Vec<&RetailerTotal> = totals
        .iter()
        .filter(|t| qualifies(t, wanted.len(), policy.allow_partial))
        .collect();
    qualifying.sort_by(|a, b| rank_order(a, b));

    let Some(cheapest) = qualifying.first().map(|t| (*t).clone()) else {
        tracing::debug!(
            retailers = totals.len(),
            allow_partial = policy.allow_partial,
            "no qualifying retailer"
        );
        return Err(ComparisonError::NoQualifyingRetailer { totals });
    };

    let highest = qualifying
        .iter()
        .map(|t| t.total)
        .max()
        .unwrap_or(cheapest.total);
    let savings = highest - cheapest.total;
    let ranking = qualifying.iter().map(|t| t.retailer_id.clone()).collect();

    tracing::debug!(
        cheapest = %cheapest.retailer_id,
        total = %cheapest.total,
        %savings,
        "basket compared"
    );

    Ok(ComparisonResult {
        totals,
        cheapest,
        savings,
        ranking,
    })
}

/// Sums quantities per item id, keeping first-seen order.
fn merge_desired(desired: &[DesiredItem]) -> Vec<(&str, u32)> {
    let mut merged: Vec<(&str, u32)> = Vec::with_capacity(desired.len());
    for item in desired {
        match merged.iter_mut().find(|(id, _)| *id == item.item_id()) {
            Some((_, quantity)) => *quantity = quantity.saturating_add(item.quantity()),
            None => merged.push((item.item_id(), item.quantity())),
        }
    }
    merged
}

fn retailer_total(
    retailer_id: &str,
    wanted: &[(&str, u32)],
    quotes: &RetailerQuoteSet,
) -> RetailerTotal {
    let mut total = Decimal::ZERO;
    let mut missing_item_ids = Vec::new();

    for &(item_id, quantity) in wanted {
        let Some(unit_price) = quotes.best_in_stock_price(retailer_id, item_id) else {
            missing_item_ids.push(item_id.to_owned());
            continue;
        };
        match unit_price
            .checked_mul(Decimal::from(quantity))
            .and_then(|line| total.checked_add(line))
        {
            Some(sum) => total = sum,
            None => {
                tracing::warn!(
                    retailer = retailer_id,
                    item = item_id,
                    %unit_price,
                    quantity,
                    "basket total overflowed; treating item as missing"
                );
                missing_item_ids.push(item_id.to_owned());
            }
        }
    }

    RetailerTotal {
        retailer_id: retailer_id.to_owned(),
        total,
        partial: !missing_item_ids.is_empty(),
        missing_item_ids,
    }
}

fn qualifies(total: &RetailerTotal, wanted: usize, allow_partial: bool) -> bool {
    let covered = wanted.saturating_sub(total.missing_item_ids.len());
    if covered == 0 {
        return false;
    }
    allow_partial || total.missing_item_ids.is_empty()
}

/// Lowest total, then fewer missing items, then smaller retailer id.
fn rank_order(a: &RetailerTotal, b: &RetailerTotal) -> Ordering {
    a.total
        .cmp(&b.total)
        .then_with(|| a.missing_item_ids.len().cmp(&b.missing_item_ids.len()))
        .then_with(|| a.retailer_id.cmp(&b.retailer_id))
}

#[cfg(test)]
#[path = "aggregator_test.rs"]
mod tests;
