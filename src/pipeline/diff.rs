//! Diff calculation between the catalog and the ledger.
//!
//! Yields the catalog keys that have not been announced yet, in ascending key
//! order. The order is what lets a throttled dispatcher make the same choice
//! on every run over the same inputs.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::Catalog;

/// Keys pending announcement plus context for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    /// Keys in the catalog but not in the ledger, ascending
    pub pending: Vec<String>,
    /// Catalog keys that are already announced
    pub known: usize,
}

impl DiffResult {
    /// Check if there is anything to announce.
    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The key a throttled run announces next.
    pub fn next(&self) -> Option<&str> {
        self.pending.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Calculate the keys of `catalog` absent from `announced`.
pub fn calculate_diff(catalog: &Catalog, announced: &BTreeSet<String>) -> DiffResult {
    let (known, mut pending): (Vec<&String>, Vec<&String>) =
        catalog.keys().partition(|key| announced.contains(*key));

    pending.sort();

    DiffResult {
        pending: pending.into_iter().cloned().collect(),
        known: known.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogEntry;
    use proptest::prelude::*;

    fn catalog(keys: &[&str]) -> Catalog {
        keys.iter().map(|k| CatalogEntry::new(*k, *k)).collect()
    }

    fn ledger(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_example_one_new_key() {
        let result = calculate_diff(&catalog(&["a.zip", "b.zip"]), &ledger(&["a.zip"]));

        assert_eq!(result.pending, vec!["b.zip"]);
        assert_eq!(result.known, 1);
        assert_eq!(result.next(), Some("b.zip"));
    }

    #[test]
    fn test_no_changes() {
        let result = calculate_diff(&catalog(&["a.zip", "b.zip"]), &ledger(&["a.zip", "b.zip"]));

        assert!(!result.has_changes());
        assert_eq!(result.next(), None);
        assert_eq!(result.known, 2);
    }

    #[test]
    fn test_pending_is_ascending() {
        let result = calculate_diff(&catalog(&["zork.zip", "2048.zip", "doom.zip"]), &ledger(&[]));

        assert_eq!(result.pending, vec!["2048.zip", "doom.zip", "zork.zip"]);
    }

    #[test]
    fn test_ledger_only_keys_are_ignored() {
        let result = calculate_diff(&catalog(&["a.zip"]), &ledger(&["gone.zip"]));

        assert_eq!(result.pending, vec!["a.zip"]);
        assert_eq!(result.known, 0);
    }

    #[test]
    fn test_empty_catalog() {
        let result = calculate_diff(&Catalog::default(), &ledger(&["a.zip"]));
        assert!(result.is_empty());
    }

    proptest! {
        #[test]
        fn prop_pending_is_exact_sorted_difference(
            catalog_keys in prop::collection::btree_set("[a-z0-9]{1,6}\\.zip", 0..30),
            ledger_keys in prop::collection::btree_set("[a-z0-9]{1,6}\\.zip", 0..30),
        ) {
            let catalog: Catalog = catalog_keys
                .iter()
                .map(|k| CatalogEntry::new(k.clone(), k.clone()))
                .collect();

            let result = calculate_diff(&catalog, &ledger_keys);

            let expected: Vec<String> = catalog_keys.difference(&ledger_keys).cloned().collect();
            prop_assert_eq!(&result.pending, &expected);
            prop_assert!(result.pending.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(result.known + result.pending.len(), catalog_keys.len());
        }
    }
}
