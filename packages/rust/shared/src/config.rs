//! Application configuration for the showcase feed.
//!
//! User config lives at `~/.showcase/showcase.toml`.
//! CLI flags override the environment, which overrides the config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, ShowcaseError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "showcase.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".showcase";

/// Environment variable that supplies the feed URL unless configured otherwise.
pub const DEFAULT_SHEET_URL_ENV: &str = "SHOWCASE_SHEET_URL";

// ---------------------------------------------------------------------------
// Config structs (matching showcase.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the spreadsheet export lives.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Project listing settings.
    #[serde(default)]
    pub projects: ProjectsConfig,

    /// Format/guideline page settings.
    #[serde(default)]
    pub formats: FormatsConfig,
}

/// `[feed]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Fallback feed URL, used only when neither flag nor env var is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_url: Option<String>,

    /// Name of the env var holding the feed URL.
    #[serde(default = "default_sheet_url_env")]
    pub sheet_url_env: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sheet_url: None,
            sheet_url_env: default_sheet_url_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_sheet_url_env() -> String {
    DEFAULT_SHEET_URL_ENV.into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[projects]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsConfig {
    /// Path prefix for project thumbnails.
    #[serde(default = "default_thumbnail_base")]
    pub thumbnail_base: String,

    /// Suffix appended after the team number.
    #[serde(default = "default_thumbnail_suffix")]
    pub thumbnail_suffix: String,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            thumbnail_base: default_thumbnail_base(),
            thumbnail_suffix: default_thumbnail_suffix(),
        }
    }
}

fn default_thumbnail_base() -> String {
    "/project-thumbnails/".into()
}
fn default_thumbnail_suffix() -> String {
    "-image.jpg".into()
}

/// `[formats]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatsConfig {
    /// Scheme label the format links are shown under.
    #[serde(default = "default_format_scheme")]
    pub scheme: String,
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            scheme: default_format_scheme(),
        }
    }
}

fn default_format_scheme() -> String {
    "2021".into()
}

// ---------------------------------------------------------------------------
// Feed settings (runtime, merged from config + env + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime feed configuration — a validated URL plus transport limits.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// Absolute http(s) URL of the CSV export.
    pub url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl FeedSettings {
    /// Resolve the feed URL (see [`resolve_sheet_url`]) and pair it with the configured timeout.
    pub fn resolve(config: &AppConfig, flag: Option<&str>) -> Result<Self> {
        Ok(Self {
            url: resolve_sheet_url(config, flag)?,
            timeout_secs: config.feed.timeout_secs,
        })
    }
}

/// Pick the feed URL: CLI flag, then the configured env var, then `feed.sheet_url`.
pub fn resolve_sheet_url(config: &AppConfig, flag: Option<&str>) -> Result<Url> {
    let from_env = std::env::var(&config.feed.sheet_url_env)
        .ok()
        .filter(|v| !v.trim().is_empty());

    let raw = flag
        .map(str::to_string)
        .filter(|v| !v.trim().is_empty())
        .or(from_env)
        .or_else(|| config.feed.sheet_url.clone())
        .ok_or_else(|| {
            ShowcaseError::config(format!(
                "no feed URL configured. Pass --sheet-url or set the {} environment variable.",
                config.feed.sheet_url_env
            ))
        })?;

    parse_feed_url(raw.trim())
}

fn parse_feed_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| ShowcaseError::validation(format!("invalid feed URL '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ShowcaseError::validation(format!(
            "feed URL must use http or https, got '{other}'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.showcase/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ShowcaseError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.showcase/showcase.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ShowcaseError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ShowcaseError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ShowcaseError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ShowcaseError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ShowcaseError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
