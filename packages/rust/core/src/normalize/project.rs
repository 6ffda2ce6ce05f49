//! Student project listing.

use std::collections::BTreeMap;

use serde::Serialize;
use showcase_shared::{ProjectsConfig, RawRow};

use super::{Normalized, Normalizer, normalize_each};
use crate::facet::{FacetOrder, FacetSet, extract_facets};
use crate::filter::Filterable;

const SCHEME_COLUMN: &str = "Scheme";
const TEAM_NO_COLUMN: &str = "Team No";
const TITLE_COLUMN: &str = "Project Title";
const ABSTRACT_COLUMN: &str = "Project Abstract";
const ABSTRACT_LINK_COLUMN: &str = "Innovata Abstract";

// ---------------------------------------------------------------------------
// ResourceKind
// ---------------------------------------------------------------------------

/// Linked project material, declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Certificates,
    Papers,
    Pictures,
    Presentation,
    Reports,
    Videos,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        Self::Certificates,
        Self::Papers,
        Self::Pictures,
        Self::Presentation,
        Self::Reports,
        Self::Videos,
    ];

    /// Feed column holding this resource's URL.
    pub fn column(self) -> &'static str {
        match self {
            Self::Certificates => "Innovata Certificates",
            Self::Papers => "Innovata Papers",
            Self::Pictures => "Innovata Pictures",
            Self::Presentation => "Innovata PPTs",
            Self::Reports => "Innovata Reports",
            Self::Videos => "Innovata Videos",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Certificates => "Certificates",
            Self::Papers => "Papers",
            Self::Pictures => "Pictures Link",
            Self::Presentation => "Presentation",
            Self::Reports => "Reports",
            Self::Videos => "Videos",
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectRecord
// ---------------------------------------------------------------------------

/// One team's project card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
    pub scheme: String,
    /// Team number; acts as a key by convention only (not checked for uniqueness).
    pub team_no: String,
    /// Supplied title or `"Team {team_no}'s Project"`.
    pub project_title: String,
    /// Whether `project_title` came from the feed.
    pub has_supplied_title: bool,
    /// Abstract text, or a placeholder when the feed has none.
    pub abstract_text: String,
    /// Optional link to a standalone abstract document.
    pub abstract_link: Option<String>,
    thumbnail_path: String,
    resource_links: BTreeMap<ResourceKind, Option<String>>,
}

impl ProjectRecord {
    /// `<base><team_no><suffix>`; the asset may not exist, consumers fall back to a placeholder.
    pub fn thumbnail_path(&self) -> &str {
        &self.thumbnail_path
    }

    /// Every resource kind, present or not, in display order.
    pub fn resource_links(&self) -> &BTreeMap<ResourceKind, Option<String>> {
        &self.resource_links
    }

    pub fn resource(&self, kind: ResourceKind) -> Option<&str> {
        self.resource_links.get(&kind).and_then(|l| l.as_deref())
    }

    /// Resources that have a link, in display order.
    pub fn available_resources(&self) -> impl Iterator<Item = (ResourceKind, &str)> {
        self.resource_links
            .iter()
            .filter_map(|(kind, link)| link.as_deref().map(|l| (*kind, l)))
    }

    pub fn has_resources(&self) -> bool {
        self.available_resources().next().is_some()
    }

    pub fn abstract_heading(&self) -> String {
        format!("Abstract: {}", self.project_title)
    }

    /// Non-blank lines of the abstract.
    pub fn abstract_paragraphs(&self) -> Vec<&str> {
        self.abstract_text
            .lines()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

impl Filterable for ProjectRecord {
    fn facet_value(&self) -> Option<&str> {
        Some(&self.scheme)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.team_no.as_str()];
        if self.has_supplied_title {
            fields.push(&self.project_title);
        }
        fields
    }
}

// ---------------------------------------------------------------------------
// ProjectNormalizer
// ---------------------------------------------------------------------------

/// Requires `Scheme` and `Team No`; everything else is defaulted.
#[derive(Debug, Clone)]
pub struct ProjectNormalizer {
    thumbnail_base: String,
    thumbnail_suffix: String,
}

impl ProjectNormalizer {
    pub fn new(config: &ProjectsConfig) -> Self {
        Self {
            thumbnail_base: config.thumbnail_base.clone(),
            thumbnail_suffix: config.thumbnail_suffix.clone(),
        }
    }

    pub fn normalize_row(&self, row: &RawRow) -> Normalized<ProjectRecord> {
        let Some(scheme) = row.get(SCHEME_COLUMN) else {
            return Normalized::Excluded("missing scheme");
        };
        let Some(team_no) = row.get(TEAM_NO_COLUMN) else {
            return Normalized::Excluded("missing team number");
        };

        let supplied_title = row.get(TITLE_COLUMN);
        let project_title = supplied_title
            .map(str::to_string)
            .unwrap_or_else(|| format!("Team {team_no}'s Project"));

        let abstract_text = row
            .get(ABSTRACT_COLUMN)
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!("No abstract has been provided for Team {team_no}'s project yet.")
            });

        let resource_links = ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, row.get(kind.column()).map(str::to_string)))
            .collect();

        Normalized::Record(ProjectRecord {
            scheme: scheme.to_string(),
            team_no: team_no.to_string(),
            project_title,
            has_supplied_title: supplied_title.is_some(),
            abstract_text,
            abstract_link: row.get(ABSTRACT_LINK_COLUMN).map(str::to_string),
            thumbnail_path: format!("{}{team_no}{}", self.thumbnail_base, self.thumbnail_suffix),
            resource_links,
        })
    }
}

impl Default for ProjectNormalizer {
    fn default() -> Self {
        Self::new(&ProjectsConfig::default())
    }
}

impl Normalizer for ProjectNormalizer {
    type Record = ProjectRecord;

    fn name(&self) -> &'static str {
        "projects"
    }

    fn subject(&self) -> &'static str {
        "project data"
    }

    fn normalize(&self, rows: &[RawRow]) -> Vec<ProjectRecord> {
        normalize_each(self.name(), rows, |row, _| self.normalize_row(row))
    }

    fn facets(&self, records: &[ProjectRecord]) -> FacetSet {
        extract_facets(records, FacetOrder::Descending, |r| Some(r.scheme.as_str()))
    }

    fn empty_message(&self) -> &'static str {
        "No projects found for the selected scheme or search term."
    }
}
