//! Normalization, faceting, and filtering over the showcase feed.
//!
//! This crate turns raw feed rows into typed domain records and derives
//! everything a page needs to render them:
//! - [`normalize`] — per-domain row normalizers (projects, announcements, prizes, formats)
//! - [`facet`] — distinct facet values plus a default selection
//! - [`filter`] — facet + free-text filtering that never reorders
//! - [`load_state`] / [`page`] — the per-page fetch lifecycle

pub mod facet;
pub mod filter;
pub mod load_state;
pub mod normalize;
pub mod page;

pub use facet::{FacetOrder, FacetSet, extract_facets};
pub use filter::{Filterable, Selection, filter_view};
pub use load_state::LoadState;
pub use normalize::{
    AnnouncementNormalizer, AnnouncementRecord, FormatLink, FormatNormalizer, FormatPhase,
    FormatPhaseRecord, Normalized, Normalizer, PrizeNormalizer, PrizeRecord, ProjectNormalizer,
    ProjectRecord, ResourceKind,
};
pub use page::{FilteredView, PageData, PageView, Settled};
