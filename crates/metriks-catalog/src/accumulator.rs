//! Merging of successive result pages into one ordered, duplicate-free list.

use std::collections::HashSet;

use metriks_core::ProductSummary;

/// Appends `incoming` to `prior`, keeping the first occurrence of every id.
///
/// Order is preserved: earlier pages first, then each page in server order.
/// Duplicates inside `incoming` itself are dropped too.
#[must_use]
pub fn accumulate(
    mut prior: Vec<ProductSummary>,
    mut incoming: Vec<ProductSummary>,
) -> Vec<ProductSummary> {
    let mut seen: HashSet<String> = prior.iter().map(|p| p.id.clone()).collect();
    let received = incoming.len();
    incoming.retain(|item| seen.insert(item.id.clone()));

    let dropped = received - incoming.len();
    if dropped > 0 {
        tracing::debug!(dropped, "dropping duplicate catalog items");
    }

    prior.append(&mut incoming);
    prior
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str) -> ProductSummary {
        ProductSummary {
            id: id.to_owned(),
            name: name.to_owned(),
            retailer_label: String::new(),
            unit_price: None,
            image_ref: metriks_core::PLACEHOLDER_IMAGE.to_owned(),
            distance_km: None,
        }
    }

    fn ids(items: &[ProductSummary]) -> Vec<&str> {
        items.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn appends_new_items_in_order() {
        let merged = accumulate(
            vec![item("a", "A"), item("b", "B")],
            vec![item("c", "C"), item("d", "D")],
        );
        assert_eq!(ids(&merged), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn first_occurrence_wins() {
        let merged = accumulate(vec![item("a", "first")], vec![item("a", "second")]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "first");
    }

    #[test]
    fn duplicates_within_page_are_dropped() {
        let merged = accumulate(
            Vec::new(),
            vec![item("a", "A"), item("b", "B"), item("a", "A again")],
        );
        assert_eq!(ids(&merged), vec!["a", "b"]);
    }

    #[test]
    fn overlapping_page_adds_only_unseen_ids() {
        let merged = accumulate(
            vec![item("1", ""), item("2", ""), item("3", "")],
            vec![item("3", ""), item("4", ""), item("1", ""), item("5", "")],
        );
        assert_eq!(ids(&merged), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn empty_incoming_leaves_prior_unchanged() {
        let prior = vec![item("a", "A")];
        let merged = accumulate(prior.clone(), Vec::new());
        assert_eq!(merged, prior);
    }
}
