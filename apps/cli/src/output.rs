//! Plain-text rendering of page records.

use std::fmt::Write as _;

use showcase_core::{AnnouncementRecord, FacetSet, FormatPhaseRecord, PrizeRecord, ProjectRecord};

/// Line above a listing: active facet and how much the filters kept.
///
/// The available values are only listed when there is more than one.
pub(crate) fn view_header(
    facets: &FacetSet,
    selection: Option<&str>,
    shown: usize,
    total: usize,
) -> String {
    let mut out = String::new();
    if facets.offers_choice() {
        let _ = writeln!(
            out,
            "  Showing: {} (available: {})",
            selection.unwrap_or("all"),
            facets.values().join(", ")
        );
    }
    let _ = writeln!(out, "  {shown} of {total} record(s)");
    out
}

pub(crate) fn facets(facets: &FacetSet) -> String {
    if facets.is_empty() {
        return "  No values available; nothing to select.\n".to_string();
    }
    let mut out = String::new();
    for value in facets.values() {
        let is_default = Some(value.as_str()) == facets.default_selection();
        let marker = if is_default { "*" } else { " " };
        let _ = writeln!(out, "  {marker} {value}");
    }
    out
}

pub(crate) fn project(record: &ProjectRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  [{}] Team {}: {}",
        record.scheme, record.team_no, record.project_title
    );
    let _ = writeln!(out, "    Thumbnail: {}", record.thumbnail_path());
    for paragraph in record.abstract_paragraphs() {
        let _ = writeln!(out, "    {paragraph}");
    }
    if let Some(link) = &record.abstract_link {
        let _ = writeln!(out, "    Abstract document: {link}");
    }
    if record.has_resources() {
        for (kind, link) in record.available_resources() {
            let _ = writeln!(out, "    {}: {link}", kind.display_name());
        }
    } else {
        let _ = writeln!(out, "    No resources linked for this project.");
    }
    out
}

pub(crate) fn announcement(record: &AnnouncementRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    match record.date_label() {
        Some(date) => {
            let _ = writeln!(out, "  {} ({date})", record.title);
        }
        None => {
            let _ = writeln!(out, "  {}", record.title);
        }
    }
    let _ = writeln!(out, "    {}", record.summary);
    let _ = writeln!(out, "    {}: {}", record.link_label(), record.link);
    out
}

pub(crate) fn prize(record: &PrizeRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let year = record.year.as_deref().unwrap_or("-");
    let _ = writeln!(out, "  [{year}] {}: {}", record.category, record.prize_name);
    let _ = writeln!(out, "    Winners: {}", record.winners);
    if let Some(title) = &record.project_title {
        let _ = writeln!(out, "    Project: {title}");
    }
    if let Some(link) = &record.link {
        let _ = writeln!(out, "    Details: {link}");
    }
    out
}

pub(crate) fn format_phase(record: &FormatPhaseRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", record.heading());
    for link in record.links() {
        let _ = writeln!(out, "    {}: {}", link.name, link.url);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcase_core::{
        AnnouncementNormalizer, FormatNormalizer, Normalizer, PrizeNormalizer, ProjectNormalizer,
    };
    use showcase_shared::RawRow;

    fn fixture_rows() -> Vec<RawRow> {
        let text = std::fs::read_to_string("../../fixtures/csv/showcase.csv").unwrap();
        showcase_feed::parse_csv(&text).unwrap()
    }

    #[test]
    fn project_lists_only_present_resources() {
        let records = ProjectNormalizer::default().normalize(&fixture_rows());
        let text = project(&records[0]);

        assert!(text.contains("[2021] Team 1: Smart Irrigation"));
        assert!(text.contains("Thumbnail: /project-thumbnails/1-image.jpg"));
        assert!(text.contains("Papers: https://drive.example.com/papers/1.pdf"));
        assert!(!text.contains("Videos:"));

        let bare = project(&records[1]);
        assert!(bare.contains("Team 7: Team 7's Project"));
        assert!(bare.contains("No resources linked for this project."));
    }

    #[test]
    fn pdf_announcement_has_no_date() {
        let records = AnnouncementNormalizer.normalize(&fixture_rows());

        let pdf = announcement(&records[0]);
        assert!(pdf.contains("  Mid-term Review\n"));
        assert!(pdf.contains("View PDF: "));

        let web = announcement(&records[1]);
        assert!(web.contains("Announcement #2 (31 December 2023)"));
        assert!(web.contains("View Details: "));
    }

    #[test]
    fn prize_and_format_rendering() {
        let rows = fixture_rows();
        let prizes = PrizeNormalizer.normalize(&rows);
        assert!(prize(&prizes[1]).contains("[2022] Innovata Expo: Award"));

        let phases = FormatNormalizer::default().normalize(&rows);
        let text = format_phase(&phases[1]);
        assert!(text.contains("Phase 2 Guidelines (2021)"));
        assert!(text.contains("Evaluation Annexure: https://drive.example.com/f/annexure"));
    }

    #[test]
    fn facet_listing_marks_default() {
        let normalizer = PrizeNormalizer;
        let facets = normalizer.facets(&normalizer.normalize(&fixture_rows()));

        assert_eq!(super::facets(&facets), "  * 2024\n    2023\n    2022\n");
        assert!(super::facets(&FacetSet::empty()).contains("nothing to select"));
        assert_eq!(
            view_header(&facets, Some("2024"), 1, 3),
            "  Showing: 2024 (available: 2024, 2023, 2022)\n  1 of 3 record(s)\n"
        );
    }

    #[test]
    fn single_value_facet_hides_the_choice() {
        let normalizer = ProjectNormalizer::default();
        let records = normalizer.normalize(&fixture_rows()[..1]);
        let facets = normalizer.facets(&records);

        assert_eq!(facets.values(), ["2021"]);
        assert_eq!(view_header(&facets, Some("2021"), 1, 1), "  1 of 1 record(s)\n");
    }
}
