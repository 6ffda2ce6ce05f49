//! View filtering: facet selection AND free-text search over loaded records.
//!
//! Filtering is a pure function of its inputs. It only removes records,
//! never reorders them, so applying the same filter twice changes nothing.

use crate::facet::FacetSet;

/// A record that can be partitioned by a facet and matched by search text.
pub trait Filterable {
    /// The record's value for the domain's facet field, if it has one.
    fn facet_value(&self) -> Option<&str>;

    /// Fields the free-text search looks at.
    fn search_fields(&self) -> Vec<&str>;
}

/// What the consumer asked to see for the facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Whatever the facet set proposes as default (its first value).
    Default,
    /// No facet restriction.
    All,
    /// Exactly this facet value.
    Value(String),
}

impl Selection {
    /// Map a user-supplied option: absent → default, `""`/`all` → all.
    ///
    /// `all` is reserved in any letter case, so a facet value spelled
    /// `"All"` cannot be selected on its own.
    pub fn parse(input: Option<&str>) -> Self {
        match input.map(str::trim) {
            None => Self::Default,
            Some("") => Self::All,
            Some(v) if v.eq_ignore_ascii_case("all") => Self::All,
            Some(v) => Self::Value(v.to_string()),
        }
    }

    /// The concrete facet value to filter by, or `None` for pass-through.
    pub fn resolve<'a>(&'a self, facets: &'a FacetSet) -> Option<&'a str> {
        match self {
            Self::Default => facets.default_selection(),
            Self::All => None,
            Self::Value(v) => Some(v.as_str()),
        }
    }
}

/// Return the records matching `selection` and `search`, in input order.
///
/// - `selection == None` (or empty) passes every record through the facet test.
/// - `search == None` (or blank) passes every record through the search test;
///   otherwise a case-insensitive substring match on any searchable field is required.
pub fn filter_view<'a, R: Filterable>(
    records: &'a [R],
    selection: Option<&str>,
    search: Option<&str>,
) -> Vec<&'a R> {
    let selection = selection.map(str::trim).filter(|s| !s.is_empty());
    let needle = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    records
        .iter()
        .filter(|r| match selection {
            Some(selected) => r.facet_value() == Some(selected),
            None => true,
        })
        .filter(|r| match &needle {
            Some(needle) => r
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
            None => true,
        })
        .collect()
}
