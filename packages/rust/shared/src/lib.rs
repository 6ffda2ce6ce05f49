//! Shared types, error model, and configuration for the showcase feed.
//!
//! This crate is the foundation depended on by all other showcase crates.
//! It provides:
//! - [`ShowcaseError`] — the unified error type
//! - [`RawRow`] — one untyped row of the spreadsheet feed
//! - Configuration ([`AppConfig`], [`FeedConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_SHEET_URL_ENV, FeedConfig, FeedSettings, FormatsConfig, ProjectsConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from,
    resolve_sheet_url,
};
pub use error::{Result, ShowcaseError};
pub use types::RawRow;
