//! Department announcements, in feed order.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;
use showcase_shared::RawRow;

use super::{Normalized, Normalizer, looks_like_pdf, normalize_each};
use crate::facet::FacetSet;
use crate::filter::Filterable;

const LINK_COLUMN: &str = "Innovata Announcements";
const TITLE_COLUMN: &str = "Announcement Title";
const DATE_COLUMN: &str = "Announcement Date";
const SUMMARY_COLUMN: &str = "Announcement Summary";

const DEFAULT_SUMMARY: &str = "View the announcement for more details.";

// ---------------------------------------------------------------------------
// Date shapes (compiled once)
// ---------------------------------------------------------------------------

/// `2024-03-05`
static YMD_DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").expect("ymd regex"));

/// `03/05/2024` (month first)
static MDY_SLASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("mdy regex"));

/// `05-03-2024` (day first)
static DMY_DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}$").expect("dmy regex"));

/// Parse a sheet date cell. Unrecognized text yields `None`.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    let format = if YMD_DASH_RE.is_match(raw) {
        "%Y-%m-%d"
    } else if MDY_SLASH_RE.is_match(raw) {
        "%m/%d/%Y"
    } else if DMY_DASH_RE.is_match(raw) {
        "%d-%m-%Y"
    } else {
        return DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date())
            })
            .ok();
    };

    NaiveDate::parse_from_str(raw, format).ok()
}

// ---------------------------------------------------------------------------
// AnnouncementRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnouncementRecord {
    /// Supplied title or `"Announcement #{n}"`.
    pub title: String,
    /// Display-only; feed order is authoritative.
    pub date: Option<NaiveDate>,
    pub summary: String,
    pub link: String,
    is_pdf: bool,
}

impl AnnouncementRecord {
    pub fn is_pdf(&self) -> bool {
        self.is_pdf
    }

    /// `"5 March 2024"`, hidden for PDF notices.
    pub fn date_label(&self) -> Option<String> {
        if self.is_pdf {
            return None;
        }
        self.date.map(|d| d.format("%-d %B %Y").to_string())
    }

    pub fn link_label(&self) -> &'static str {
        if self.is_pdf { "View PDF" } else { "View Details" }
    }
}

impl Filterable for AnnouncementRecord {
    fn facet_value(&self) -> Option<&str> {
        None
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.summary.as_str()]
    }
}

// ---------------------------------------------------------------------------
// AnnouncementNormalizer
// ---------------------------------------------------------------------------

/// Requires the announcement link column.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnouncementNormalizer;

impl AnnouncementNormalizer {
    /// `position` is the 1-based index among included announcements.
    pub fn normalize_row(&self, row: &RawRow, position: usize) -> Normalized<AnnouncementRecord> {
        let Some(link) = row.get(LINK_COLUMN) else {
            return Normalized::Excluded("missing announcement link");
        };

        Normalized::Record(AnnouncementRecord {
            title: row
                .get(TITLE_COLUMN)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Announcement #{position}")),
            date: row.get(DATE_COLUMN).and_then(parse_date),
            summary: row.get(SUMMARY_COLUMN).unwrap_or(DEFAULT_SUMMARY).to_string(),
            link: link.to_string(),
            is_pdf: looks_like_pdf(link),
        })
    }
}

impl Normalizer for AnnouncementNormalizer {
    type Record = AnnouncementRecord;

    fn name(&self) -> &'static str {
        "announcements"
    }

    fn subject(&self) -> &'static str {
        "announcements"
    }

    fn normalize(&self, rows: &[RawRow]) -> Vec<AnnouncementRecord> {
        normalize_each(self.name(), rows, |row, position| {
            self.normalize_row(row, position)
        })
    }

    fn facets(&self, _records: &[AnnouncementRecord]) -> FacetSet {
        FacetSet::empty()
    }

    fn empty_message(&self) -> &'static str {
        "No announcements posted yet. Please check back later."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::row;

    #[test]
    fn dropped_without_link_even_with_content() {
        let out = AnnouncementNormalizer.normalize_row(
            &row(&[
                ("Announcement Title", "Viva schedule"),
                ("Announcement Summary", "Check the notice board"),
                ("Innovata Announcements", "   "),
            ]),
            1,
        );
        assert_eq!(out, Normalized::Excluded("missing announcement link"));
    }

    #[test]
    fn defaults_use_position_among_included_rows() {
        let rows = vec![
            row(&[("Innovata Announcements", "https://example.com/a")]),
            row(&[("Announcement Title", "orphan")]),
            row(&[("Innovata Announcements", "https://example.com/b")]),
        ];
        let records = AnnouncementNormalizer.normalize(&rows);

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Announcement #1", "Announcement #2"]);
        assert_eq!(records[0].summary, DEFAULT_SUMMARY);
    }

    #[test]
    fn pdf_links_hide_the_date() {
        let record = AnnouncementNormalizer
            .normalize_row(
                &row(&[
                    ("Innovata Announcements", "https://example.com/notice.PDF"),
                    ("Announcement Date", "2024-03-05"),
                ]),
                1,
            )
            .into_record()
            .unwrap();

        assert!(record.is_pdf());
        assert_eq!(record.link_label(), "View PDF");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(record.date_label(), None);
    }

    #[test]
    fn date_label_for_web_links() {
        let record = AnnouncementNormalizer
            .normalize_row(
                &row(&[
                    ("Innovata Announcements", "https://example.com/news"),
                    ("Announcement Date", "2024-3-5"),
                ]),
                1,
            )
            .into_record()
            .unwrap();

        assert!(!record.is_pdf());
        assert_eq!(record.link_label(), "View Details");
        assert_eq!(record.date_label().as_deref(), Some("5 March 2024"));
    }

    #[test]
    fn date_shapes() {
        assert_eq!(parse_date("2023-12-31"), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(parse_date("12/31/2023"), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(parse_date("31-12-2023"), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(
            parse_date("2023-12-31T09:30:00Z"),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
        assert_eq!(
            parse_date("2023-12-31T09:30:00"),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
    }

    #[test]
    fn unparseable_date_only_blanks_the_date() {
        let record = AnnouncementNormalizer
            .normalize_row(
                &row(&[
                    ("Innovata Announcements", "https://example.com/news"),
                    ("Announcement Title", "Results"),
                    ("Announcement Date", "someday"),
                ]),
                4,
            )
            .into_record()
            .unwrap();

        assert_eq!(record.date, None);
        assert_eq!(record.title, "Results");
        assert_eq!(parse_date("13/45/2023"), None);
    }

    #[test]
    fn fixture_keeps_feed_order() {
        let text = std::fs::read_to_string("../../../fixtures/csv/showcase.csv").unwrap();
        let rows = showcase_feed::parse_csv(&text).unwrap();
        let records = AnnouncementNormalizer.normalize(&rows);

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Mid-term Review", "Announcement #2", "Results"]);
        assert!(records[0].is_pdf());
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(records[1].summary, "Hackathon registrations open");
    }
}
