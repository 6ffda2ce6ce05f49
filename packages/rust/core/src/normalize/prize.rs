//! Awards and recognition, faceted by year.

use serde::Serialize;
use showcase_shared::RawRow;

use super::{Normalized, Normalizer, normalize_each};
use crate::facet::{FacetOrder, FacetSet, extract_facets};
use crate::filter::Filterable;

const LINK_COLUMN: &str = "Prizes";
const CATEGORY_COLUMNS: [&str; 2] = ["Prize Category", "Event Name"];
const PRIZE_NAME_COLUMN: &str = "Prize Name";
const WINNERS_COLUMN: &str = "Winner Name(s) / Team Name";
const PROJECT_TITLE_COLUMN: &str = "Project Title (if applicable)";
const YEAR_COLUMNS: [&str; 2] = ["Year", "Scheme"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrizeRecord {
    /// `Prize Category`, else `Event Name`, else `"General Awards"`.
    pub category: String,
    pub prize_name: String,
    pub winners: String,
    pub project_title: Option<String>,
    pub link: Option<String>,
    /// `Year`, else `Scheme`.
    pub year: Option<String>,
}

impl Filterable for PrizeRecord {
    fn facet_value(&self) -> Option<&str> {
        self.year.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.category.as_str(),
            self.prize_name.as_str(),
            self.winners.as_str(),
        ];
        fields.extend(self.project_title.as_deref());
        fields
    }
}

/// Keeps any row with a prize link, a category, or an event name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrizeNormalizer;

impl PrizeNormalizer {
    pub fn normalize_row(&self, row: &RawRow) -> Normalized<PrizeRecord> {
        let link = row.get(LINK_COLUMN);
        let category = row.first_of(&CATEGORY_COLUMNS);

        if link.is_none() && category.is_none() {
            return Normalized::Excluded("no prize link, category or event");
        }

        Normalized::Record(PrizeRecord {
            category: category.unwrap_or("General Awards").to_string(),
            prize_name: row.get(PRIZE_NAME_COLUMN).unwrap_or("Award").to_string(),
            winners: row.get(WINNERS_COLUMN).unwrap_or("To Be Announced").to_string(),
            project_title: row.get(PROJECT_TITLE_COLUMN).map(str::to_string),
            link: link.map(str::to_string),
            year: row.first_of(&YEAR_COLUMNS).map(str::to_string),
        })
    }
}

impl Normalizer for PrizeNormalizer {
    type Record = PrizeRecord;

    fn name(&self) -> &'static str {
        "prizes"
    }

    fn subject(&self) -> &'static str {
        "prize information"
    }

    fn normalize(&self, rows: &[RawRow]) -> Vec<PrizeRecord> {
        normalize_each(self.name(), rows, |row, _| self.normalize_row(row))
    }

    fn facets(&self, records: &[PrizeRecord]) -> FacetSet {
        extract_facets(records, FacetOrder::Descending, |r| r.year.as_deref())
    }

    fn empty_message(&self) -> &'static str {
        "No prize information available for the selected year, or no prizes have been posted yet."
    }
}
