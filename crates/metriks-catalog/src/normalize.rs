//! Normalization from raw catalog entries to [`metriks_core::ProductSummary`].
//!
//! Every field except the identifier has a fallback. Entries without a
//! usable identifier cannot be deduplicated and are dropped.

use std::str::FromStr;

use metriks_core::{ProductSummary, PLACEHOLDER_IMAGE};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::types::RawProduct;

const UNKNOWN_NAME: &str = "N/A";

/// Normalizes a raw entry. Returns `None` when no identifier is present.
#[must_use]
pub fn normalize_product(raw: RawProduct) -> Option<ProductSummary> {
    let id = raw
        .id
        .as_ref()
        .and_then(identifier)
        .or_else(|| raw.masterproductid.as_ref().and_then(identifier))?;

    let name = first_non_blank([raw.name, raw.productname])
        .unwrap_or_else(|| UNKNOWN_NAME.to_owned());

    let retailer_label =
        first_non_blank([raw.retailer_label, raw.storename, raw.retailer]).unwrap_or_default();

    let unit_price = raw
        .unit_price
        .as_ref()
        .and_then(price)
        .or_else(|| raw.price.as_ref().and_then(price));

    let image_ref = [raw.image_ref, raw.image_url, raw.imageurl]
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_owned())
        .find(|s| s.starts_with("http"))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_owned());

    let distance_km = raw
        .distance_km
        .or(raw.distance_km_snake)
        .filter(|d| d.is_finite() && *d >= 0.0);

    Some(ProductSummary {
        id,
        name,
        retailer_label,
        unit_price,
        image_ref,
        distance_km,
    })
}

/// Parses and normalizes each entry, dropping the ones that are unusable.
#[must_use]
pub fn normalize_entries(entries: Vec<Value>) -> Vec<ProductSummary> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let raw = match serde_json::from_value::<RawProduct>(entry) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(index = idx, error = %e, "skipping unparseable catalog entry");
                    return None;
                }
            };
            let normalized = normalize_product(raw);
            if normalized.is_none() {
                tracing::warn!(index = idx, "skipping catalog entry without an identifier");
            }
            normalized
        })
        .collect()
}

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accepts JSON numbers and numeric strings. Negative prices are treated as
/// absent.
fn price(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_owned(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .filter(|d| !d.is_sign_negative())
}

fn first_non_blank<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_owned())
        .find(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
