//! Document formats and guideline links per project phase.
//!
//! Each phase column holds a multi-line cell of URLs. A link's name comes
//! only from its position in the phase's fixed name list; nothing about the
//! URL itself is inspected. Reordering the lines in the sheet renames them.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use showcase_shared::{FormatsConfig, RawRow};
use tracing::debug;

use super::Normalizer;
use crate::facet::{FacetOrder, FacetSet, extract_facets};
use crate::filter::Filterable;

/// Lines that count as links.
static ABSOLUTE_HTTP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("http prefix regex"));

// ---------------------------------------------------------------------------
// FormatPhase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatPhase {
    #[serde(rename = "Phase-1")]
    Phase1,
    #[serde(rename = "Phase-2")]
    Phase2,
}

impl FormatPhase {
    pub const ALL: [FormatPhase; 2] = [Self::Phase1, Self::Phase2];

    /// Feed column name, also used as the facet value.
    pub fn key(self) -> &'static str {
        match self {
            Self::Phase1 => "Phase-1",
            Self::Phase2 => "Phase-2",
        }
    }

    /// `"Phase 1"`
    pub fn label(self) -> &'static str {
        match self {
            Self::Phase1 => "Phase 1",
            Self::Phase2 => "Phase 2",
        }
    }

    /// Names given to this phase's links, by position.
    pub fn link_names(self) -> &'static [&'static str] {
        match self {
            Self::Phase1 => &[
                "Literature Survey Guidelines",
                "Introduction & Report Format",
                "Project Guidelines",
                "Synopsis Guidelines",
            ],
            Self::Phase2 => &[
                "Evaluation Annexure",
                "Presentation Template",
                "Final Report Front sheet",
            ],
        }
    }

    /// Name for the link at `index`, falling back to `"Guideline Link {n}"`.
    pub fn link_name(self, index: usize) -> String {
        self.link_names()
            .get(index)
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("Guideline Link {}", index + 1))
    }

    /// Look a phase up by its column name, ignoring case and padding.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl std::fmt::Display for FormatPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// FormatPhaseRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatLink {
    pub name: String,
    pub url: String,
}

/// One phase's links, named positionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatPhaseRecord {
    pub phase: FormatPhase,
    /// Scheme the formats are presented under.
    pub scheme: String,
    links: Vec<FormatLink>,
}

impl FormatPhaseRecord {
    fn new(phase: FormatPhase, scheme: String, urls: Vec<String>) -> Self {
        let links = urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| FormatLink {
                name: phase.link_name(i),
                url,
            })
            .collect();
        Self {
            phase,
            scheme,
            links,
        }
    }

    pub fn links(&self) -> &[FormatLink] {
        &self.links
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(|l| l.url.as_str())
    }

    /// `"Phase 1 Guidelines (2021)"`
    pub fn heading(&self) -> String {
        format!("{} Guidelines ({})", self.phase.label(), self.scheme)
    }
}

impl Filterable for FormatPhaseRecord {
    fn facet_value(&self) -> Option<&str> {
        Some(self.phase.key())
    }

    fn search_fields(&self) -> Vec<&str> {
        self.links.iter().map(|l| l.name.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// FormatNormalizer
// ---------------------------------------------------------------------------

/// Split a multi-line cell into trimmed lines that start with `http://` or `https://`.
pub(crate) fn extract_links(cell: &str) -> Vec<String> {
    cell.lines()
        .map(str::trim)
        .filter(|line| ABSOLUTE_HTTP_RE.is_match(line))
        .map(str::to_string)
        .collect()
}

/// Reads the first row carrying any phase data; other rows are ignored.
#[derive(Debug, Clone)]
pub struct FormatNormalizer {
    scheme: String,
}

impl FormatNormalizer {
    pub fn new(config: &FormatsConfig) -> Self {
        Self {
            scheme: config.scheme.clone(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }
}

impl Default for FormatNormalizer {
    fn default() -> Self {
        Self::new(&FormatsConfig::default())
    }
}

impl Normalizer for FormatNormalizer {
    type Record = FormatPhaseRecord;

    fn name(&self) -> &'static str {
        "formats"
    }

    fn subject(&self) -> &'static str {
        "formats"
    }

    fn normalize(&self, rows: &[RawRow]) -> Vec<FormatPhaseRecord> {
        let Some((index, source)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| FormatPhase::ALL.iter().any(|p| row.has(p.key())))
        else {
            debug!(rows = rows.len(), "no row carries phase data");
            return Vec::new();
        };

        let records: Vec<FormatPhaseRecord> = FormatPhase::ALL
            .into_iter()
            .filter_map(|phase| {
                let urls = source.raw(phase.key()).map(extract_links).unwrap_or_default();
                if urls.is_empty() {
                    debug!(phase = %phase, "phase has no links");
                    return None;
                }
                Some(FormatPhaseRecord::new(phase, self.scheme.clone(), urls))
            })
            .collect();

        debug!(source_row = index + 1, phases = records.len(), "formats normalized");
        records
    }

    fn facets(&self, records: &[FormatPhaseRecord]) -> FacetSet {
        extract_facets(records, FacetOrder::FirstSeen, |r| Some(r.phase.key()))
    }

    fn empty_message(&self) -> &'static str {
        "No guidelines available for this scheme."
    }
}
