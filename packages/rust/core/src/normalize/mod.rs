//! Per-domain row normalizers.
//!
//! Each domain (projects, announcements, prizes, formats) reads a few
//! conventionally-named feed columns, drops rows missing its identifying
//! columns, fills documented defaults, and derives presentation fields.
//! Normalizers are pure: the same rows always produce the same records.

mod announcement;
mod format;
mod prize;
mod project;

use showcase_shared::{RawRow, ShowcaseError};
use tracing::debug;

use crate::facet::FacetSet;
use crate::filter::Filterable;

pub use announcement::{AnnouncementNormalizer, AnnouncementRecord};
pub use format::{FormatLink, FormatNormalizer, FormatPhase, FormatPhaseRecord};
pub use prize::{PrizeNormalizer, PrizeRecord};
pub use project::{ProjectNormalizer, ProjectRecord, ResourceKind};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Outcome of normalizing a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized<R> {
    /// The row produced a record.
    Record(R),
    /// The row lacks the domain's identifying columns.
    Excluded(&'static str),
}

impl<R> Normalized<R> {
    pub fn into_record(self) -> Option<R> {
        match self {
            Self::Record(r) => Some(r),
            Self::Excluded(_) => None,
        }
    }
}

/// Turns feed rows into one domain's typed records.
pub trait Normalizer: Send + Sync + 'static {
    /// The domain record type.
    type Record: Filterable + Clone + Send + 'static;

    /// Short domain name for tracing (e.g. `"projects"`).
    fn name(&self) -> &'static str;

    /// How the domain's data is referred to in user-facing messages.
    fn subject(&self) -> &'static str;

    /// Normalize every row, dropping excluded ones, in feed order.
    fn normalize(&self, rows: &[RawRow]) -> Vec<Self::Record>;

    /// Facet set for the records (empty for domains without a facet).
    fn facets(&self, records: &[Self::Record]) -> FacetSet;

    /// Text for a successful load that produced nothing to show.
    fn empty_message(&self) -> &'static str;

    /// User-facing message for a failed load.
    fn failure_message(&self, error: &ShowcaseError) -> String {
        if error.is_parse() {
            format!(
                "The {} feed could not be read. Please try again later.",
                self.subject()
            )
        } else {
            format!("Failed to load {}. Please try again later.", self.subject())
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Apply a per-row normalizer, passing each row's 1-based position among
/// the rows included so far.
pub(crate) fn normalize_each<R>(
    domain: &'static str,
    rows: &[RawRow],
    mut normalize_row: impl FnMut(&RawRow, usize) -> Normalized<R>,
) -> Vec<R> {
    let mut records = Vec::new();
    let mut excluded = 0usize;

    for (index, row) in rows.iter().enumerate() {
        match normalize_row(row, records.len() + 1) {
            Normalized::Record(record) => records.push(record),
            Normalized::Excluded(reason) => {
                excluded += 1;
                debug!(domain, row = index + 1, reason, "row excluded");
            }
        }
    }

    debug!(domain, included = records.len(), excluded, "rows normalized");
    records
}

/// Case-insensitive substring check for a `.pdf` marker.
pub(crate) fn looks_like_pdf(link: &str) -> bool {
    link.to_ascii_lowercase().contains(".pdf")
}

#[cfg(test)]
pub(crate) fn row(cells: &[(&str, &str)]) -> RawRow {
    cells.iter().copied().collect()
}
