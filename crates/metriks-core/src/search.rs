//! Search query and pagination types shared by the catalog client and the
//! query controller.

use serde::{Deserialize, Serialize};

use crate::products::ProductSummary;

/// A WGS84 coordinate pair used to bias search toward nearby results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Returns `None` unless both values are finite and within
    /// `[-90, 90]` / `[-180, 180]`.
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }
}

/// How the catalog should interpret a query.
///
/// Coordinates travel inside the `Nearby` variant, so a nearby search
/// without a position cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SearchMode {
    #[default]
    Catalog,
    Nearby(Coordinates),
}

impl SearchMode {
    /// Value of the `searchType` query parameter.
    #[must_use]
    pub fn as_param(&self) -> &'static str {
        match self {
            SearchMode::Catalog => "catalog",
            SearchMode::Nearby(_) => "nearby",
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            SearchMode::Catalog => None,
            SearchMode::Nearby(coords) => Some(*coords),
        }
    }
}

/// One page request against the catalog. `page` is 1-based and never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    text: String,
    page: u32,
    page_size: u32,
    mode: SearchMode,
}

impl SearchQuery {
    /// Builds the page-1 query for `text`. A `page_size` of zero is raised
    /// to one.
    #[must_use]
    pub fn first_page(text: impl Into<String>, page_size: u32, mode: SearchMode) -> Self {
        Self {
            text: text.into(),
            page: 1,
            page_size: page_size.max(1),
            mode,
        }
    }

    /// Same query, following page.
    #[must_use]
    pub fn next_page(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }
}

/// One fetched batch of catalog items.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub page: u32,
    pub items: Vec<ProductSummary>,
    /// `true` when the server returned fewer entries than were asked for.
    pub is_final_page: bool,
}

impl ResultPage {
    /// Builds a page, deriving `is_final_page` from how many entries the
    /// server actually sent (`received`), which may exceed `items.len()` when
    /// unusable entries were dropped during normalization.
    #[must_use]
    pub fn from_received(
        page: u32,
        items: Vec<ProductSummary>,
        received: usize,
        page_size: u32,
    ) -> Self {
        let page_size = usize::try_from(page_size).unwrap_or(usize::MAX);
        Self {
            page,
            items,
            is_final_page: received < page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_reject_out_of_range_values() {
        assert!(Coordinates::new(91.0, 0.0).is_none());
        assert!(Coordinates::new(0.0, -180.5).is_none());
        assert!(Coordinates::new(f64::NAN, 0.0).is_none());
        assert!(Coordinates::new(32.08, 34.78).is_some());
    }

    #[test]
    fn search_mode_param_values() {
        assert_eq!(SearchMode::Catalog.as_param(), "catalog");
        let coords = Coordinates::new(1.0, 2.0).unwrap();
        assert_eq!(SearchMode::Nearby(coords).as_param(), "nearby");
        assert_eq!(SearchMode::Nearby(coords).coordinates(), Some(coords));
        assert_eq!(SearchMode::Catalog.coordinates(), None);
    }

    #[test]
    fn first_page_starts_at_one_and_clamps_page_size() {
        let q = SearchQuery::first_page("aspirin", 0, SearchMode::Catalog);
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), 1);
        assert_eq!(q.text(), "aspirin");
    }

    #[test]
    fn next_page_keeps_text_and_mode() {
        let q = SearchQuery::first_page("aspirin", 20, SearchMode::Catalog);
        let next = q.next_page();
        assert_eq!(next.page(), 2);
        assert_eq!(next.text(), "aspirin");
        assert_eq!(next.page_size(), 20);
        assert_eq!(next.mode(), SearchMode::Catalog);
    }

    #[test]
    fn short_page_is_final() {
        let page = ResultPage::from_received(1, Vec::new(), 3, 20);
        assert!(page.is_final_page);
    }

    #[test]
    fn full_page_is_not_final() {
        let page = ResultPage::from_received(1, Vec::new(), 20, 20);
        assert!(!page.is_final_page);
    }
}
