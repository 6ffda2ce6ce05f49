//! Facet extraction: the distinct values of one record field.

use std::collections::HashSet;

use serde::Serialize;

/// How the distinct values of a facet are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetOrder {
    /// Descending lexicographic (years, schemes: newest first).
    Descending,
    /// Order of first appearance in the record sequence (enumerated phases).
    FirstSeen,
}

/// Distinct, non-empty values of a facet field, in domain order.
///
/// The first value is the default selection; an empty set means no
/// selection is possible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetSet {
    values: Vec<String>,
}

impl FacetSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The value a page selects before the user picks one.
    pub fn default_selection(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `true` when there is more than one value to choose between.
    pub fn offers_choice(&self) -> bool {
        self.values.len() > 1
    }
}

/// Collect the distinct non-empty values `accessor` yields over `records`.
pub fn extract_facets<'a, R, F>(records: &'a [R], order: FacetOrder, accessor: F) -> FacetSet
where
    F: Fn(&'a R) -> Option<&'a str>,
{
    let mut seen = HashSet::new();
    let mut values: Vec<String> = records
        .iter()
        .filter_map(accessor)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect();

    if order == FacetOrder::Descending {
        values.sort_unstable_by(|a, b| b.cmp(a));
    }

    tracing::debug!(count = values.len(), ?order, "facets extracted");
    FacetSet { values }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| (!v.is_empty()).then(|| v.to_string()))
            .collect()
    }

    #[test]
    fn descending_distinct_values() {
        let records = years(&["2021", "2023", "2021", "", "2022"]);
        let facets = extract_facets(&records, FacetOrder::Descending, |r| r.as_deref());

        assert_eq!(facets.values(), ["2023", "2022", "2021"]);
        assert_eq!(facets.default_selection(), Some("2023"));
        assert!(facets.offers_choice());
    }

    #[test]
    fn first_seen_keeps_insertion_order() {
        let records = years(&["Phase-2", "Phase-1", "Phase-2"]);
        let facets = extract_facets(&records, FacetOrder::FirstSeen, |r| r.as_deref());

        assert_eq!(facets.values(), ["Phase-2", "Phase-1"]);
        assert_eq!(facets.default_selection(), Some("Phase-2"));
    }

    #[test]
    fn empty_input_has_no_default() {
        let records: Vec<Option<String>> = Vec::new();
        let facets = extract_facets(&records, FacetOrder::Descending, |r| r.as_deref());

        assert!(facets.is_empty());
        assert_eq!(facets.default_selection(), None);
        assert!(!facets.offers_choice());
    }

    #[test]
    fn output_is_subset_of_observed_values_without_duplicates() {
        let records = years(&["b", "a", "c", "a", "b", "", "c"]);
        let facets = extract_facets(&records, FacetOrder::Descending, |r| r.as_deref());

        let observed: HashSet<&str> = records.iter().filter_map(|r| r.as_deref()).collect();
        let unique: HashSet<&String> = facets.values().iter().collect();

        assert_eq!(unique.len(), facets.len());
        assert!(facets.values().iter().all(|v| observed.contains(v.as_str())));
    }

    #[test]
    fn single_value_offers_no_choice() {
        let records = years(&["2024", "2024"]);
        let facets = extract_facets(&records, FacetOrder::Descending, |r| r.as_deref());

        assert_eq!(facets.len(), 1);
        assert!(!facets.offers_choice());
        assert!(facets.contains("2024"));
    }
}
