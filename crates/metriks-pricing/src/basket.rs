//! In-memory shopping list feeding [`crate::compare`].

use crate::error::PricingError;
use crate::types::DesiredItem;

/// Desired items in insertion order, at most one entry per item id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Basket {
    items: Vec<DesiredItem>,
}

impl Basket {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` of `item_id`, merging with an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] for a blank id or a zero quantity.
    pub fn add(&mut self, item_id: &str, quantity: u32) -> Result<(), PricingError> {
        let incoming = DesiredItem::new(item_id, quantity)?;
        match self.position(incoming.item_id()) {
            Some(idx) => {
                let merged = self.items[idx].quantity().saturating_add(quantity);
                self.items[idx] = DesiredItem::new(incoming.item_id(), merged)?;
            }
            None => self.items.push(incoming),
        }
        Ok(())
    }

    /// Replaces the quantity of `item_id`. Zero removes the entry.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::EmptyItemId`] for a blank id.
    pub fn set_quantity(&mut self, item_id: &str, quantity: u32) -> Result<(), PricingError> {
        if quantity == 0 {
            self.remove(item_id);
            return Ok(());
        }
        let item = DesiredItem::new(item_id, quantity)?;
        match self.position(item.item_id()) {
            Some(idx) => self.items[idx] = item,
            None => self.items.push(item),
        }
        Ok(())
    }

    /// Returns `true` if the item was present.
    pub fn remove(&mut self, item_id: &str) -> bool {
        match self.position(item_id.trim()) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[DesiredItem] {
        &self.items
    }

    #[must_use]
    pub fn item_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.item_id().to_owned()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.item_id() == item_id)
    }
}

impl Extend<DesiredItem> for Basket {
    fn extend<T: IntoIterator<Item = DesiredItem>>(&mut self, iter: T) {
        for item in iter {
            match self.position(item.item_id()) {
                Some(idx) => {
                    let merged = self.items[idx].quantity().saturating_add(item.quantity());
                    if let Ok(updated) = DesiredItem::new(item.item_id(), merged) {
                        self.items[idx] = updated;
                    }
                }
                None => self.items.push(item),
            }
        }
    }
}
