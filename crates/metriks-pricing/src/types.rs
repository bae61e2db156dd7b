use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// An item the shopper wants, with a quantity of at least one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredItem {
    item_id: String,
    quantity: u32,
}

impl DesiredItem {
    /// # Errors
    ///
    /// Returns [`PricingError::EmptyItemId`] for a blank id and
    /// [`PricingError::ZeroQuantity`] when `quantity` is zero.
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Result<Self, PricingError> {
        let item_id = item_id.into().trim().to_owned();
        if item_id.is_empty() {
            return Err(PricingError::EmptyItemId);
        }
        if quantity == 0 {
            return Err(PricingError::ZeroQuantity { item_id });
        }
        Ok(Self { item_id, quantity })
    }

    #[must_use]
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Parses `ID` (quantity 1) or `ID:QTY`.
impl FromStr for DesiredItem {
    type Err = PricingError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = || PricingError::InvalidItemSpec {
            spec: spec.to_owned(),
        };
        match spec.rsplit_once(':') {
            Some((id, qty)) => {
                let quantity = qty.trim().parse::<u32>().map_err(|_| invalid())?;
                DesiredItem::new(id, quantity)
            }
            None => DesiredItem::new(spec, 1),
        }
    }
}

/// One retailer's price for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetailerQuote {
    pub retailer_id: String,
    pub item_id: String,
    pub unit_price: Decimal,
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,
}

fn in_stock_default() -> bool {
    true
}

/// What one retailer would charge for the basket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetailerTotal {
    pub retailer_id: String,
    /// Sum over in-stock quotes only.
    pub total: Decimal,
    /// Desired items with no in-stock quote, in basket order.
    pub missing_item_ids: Vec<String>,
    pub partial: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonPolicy {
    /// Let retailers that cover only part of the basket compete.
    pub allow_partial: bool,
    /// Restrict the comparison to these retailers. `None` compares every
    /// retailer in the quote set.
    pub retailers: Option<BTreeSet<String>>,
}

impl ComparisonPolicy {
    #[must_use]
    pub fn allowing_partial(mut self, allow_partial: bool) -> Self {
        self.allow_partial = allow_partial;
        self
    }

    #[must_use]
    pub fn only<I, S>(mut self, retailers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.retailers = Some(retailers.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Every compared retailer, ordered by retailer id.
    pub totals: Vec<RetailerTotal>,
    pub cheapest: RetailerTotal,
    /// Most expensive qualifying total minus the cheapest. Never negative.
    pub savings: Decimal,
    /// Qualifying retailer ids, best first.
    pub ranking: Vec<String>,
}
