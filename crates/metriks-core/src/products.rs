use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Image shown when the catalog has no usable picture for a product.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/120x120.png?text=No+Image";

/// A catalog listing normalized for display and deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    /// Catalog identifier, stored as a string whether the service sent a
    /// number or a string.
    pub id: String,
    pub name: String,
    /// Store or chain the listing belongs to. Empty when unknown.
    pub retailer_label: String,
    /// `None` when the catalog did not publish a usable price.
    pub unit_price: Option<Decimal>,
    /// Absolute image URL, or [`PLACEHOLDER_IMAGE`].
    pub image_ref: String,
    /// Only populated by nearby searches.
    pub distance_km: Option<f64>,
}

impl ProductSummary {
    /// Returns `true` if the listing carries a price.
    #[must_use]
    pub fn is_priced(&self) -> bool {
        self.unit_price.is_some()
    }

    /// Returns `true` if the image is the placeholder rather than a real picture.
    #[must_use]
    pub fn has_placeholder_image(&self) -> bool {
        self.image_ref == PLACEHOLDER_IMAGE
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn make_product(unit_price: Option<Decimal>, image_ref: &str) -> ProductSummary {
        ProductSummary {
            id: "4021".to_string(),
            name: "Advil Forte".to_string(),
            retailer_label: "Super-Pharm".to_string(),
            unit_price,
            image_ref: image_ref.to_string(),
            distance_km: None,
        }
    }

    #[test]
    fn is_priced_reflects_unit_price() {
        assert!(!make_product(None, PLACEHOLDER_IMAGE).is_priced());
        let price = Decimal::from_str("29.90").unwrap();
        assert!(make_product(Some(price), PLACEHOLDER_IMAGE).is_priced());
    }

    #[test]
    fn placeholder_image_detection() {
        assert!(make_product(None, PLACEHOLDER_IMAGE).has_placeholder_image());
        assert!(!make_product(None, "https://cdn.example.com/advil.png").has_placeholder_image());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let product = make_product(Some(Decimal::from_str("29.90").unwrap()), PLACEHOLDER_IMAGE);
        let json = serde_json::to_value(&product).expect("serialization failed");
        assert_eq!(json["retailerLabel"], "Super-Pharm");
        assert!(json.get("imageRef").is_some());
        assert!(json.get("distanceKm").is_some());
    }
}
