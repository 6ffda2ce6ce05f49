//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use showcase_core::{
    AnnouncementNormalizer, FacetSet, FormatNormalizer, FormatPhase, LoadState, Normalizer,
    PageView, PrizeNormalizer, ProjectNormalizer, Selection,
};
use showcase_feed::CsvSource;
use showcase_shared::{AppConfig, FeedSettings, init_config, load_config};
use tracing::{debug, info};

use crate::output;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Showcase: browse projects, announcements, prizes and formats.
#[derive(Parser)]
#[command(
    name = "showcase",
    version,
    about = "Browse the project showcase spreadsheet from the terminal.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// URL of the published CSV export.
    #[arg(long, env = "SHOWCASE_SHEET_URL", global = true)]
    pub sheet_url: Option<String>,

    /// Print records as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// List student projects.
    Projects {
        /// Scheme to show. Defaults to the newest; "all" (reserved) lifts the restriction.
        #[arg(long)]
        scheme: Option<String>,

        /// Match team number or project title.
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List announcements in feed order.
    Announcements {
        /// Match title or summary.
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List prizes and awards.
    Prizes {
        /// Year to show. Defaults to the newest; "all" (reserved) lifts the restriction.
        #[arg(long)]
        year: Option<String>,

        /// Match category, prize, winners or project title.
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List document formats and guideline links.
    Formats {
        /// Phase to show: Phase-1, Phase-2 or "all" (any case). Defaults to the first.
        #[arg(long)]
        phase: Option<String>,

        /// Match link names.
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Print a domain's facet values and default selection.
    Facets {
        /// Which listing to inspect.
        domain: FacetDomain,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Domains that have a facet.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum FacetDomain {
    Projects,
    Prizes,
    Formats,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "showcase=info",
        1 => "showcase=debug",
        _ => "showcase=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let Cli {
        sheet_url,
        json,
        command,
        ..
    } = cli;
    let context = || Context::load(sheet_url.as_deref(), json);

    match command {
        Command::Projects { scheme, search } => {
            let ctx = context()?;
            let normalizer = ProjectNormalizer::new(&ctx.config.projects);
            let (scheme, search) = (scheme.as_deref(), search.as_deref());
            show_page(&ctx, normalizer, scheme, search, output::project).await
        }
        Command::Announcements { search } => {
            let ctx = context()?;
            show_page(&ctx, AnnouncementNormalizer, None, search.as_deref(), output::announcement)
                .await
        }
        Command::Prizes { year, search } => {
            let ctx = context()?;
            let (year, search) = (year.as_deref(), search.as_deref());
            show_page(&ctx, PrizeNormalizer, year, search, output::prize).await
        }
        Command::Formats { phase, search } => {
            let phase = canonical_phase(phase.as_deref())?;
            let ctx = context()?;
            let normalizer = FormatNormalizer::new(&ctx.config.formats);
            show_page(&ctx, normalizer, phase, search.as_deref(), output::format_phase).await
        }
        Command::Facets { domain } => cmd_facets(&context()?, domain).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Map a `--phase` value onto its feed column name, case-insensitively.
///
/// `"all"` and the empty string pass through as "no restriction".
fn canonical_phase(phase: Option<&str>) -> Result<Option<&str>> {
    let Some(raw) = phase else {
        return Ok(None);
    };
    if Selection::parse(Some(raw)) == Selection::All {
        return Ok(Some(raw));
    }
    FormatPhase::from_key(raw)
        .map(|p| Some(p.key()))
        .ok_or_else(|| eyre!("unknown phase '{raw}': expected Phase-1, Phase-2 or all"))
}

/// Resolved settings shared by the data commands.
struct Context {
    config: AppConfig,
    settings: FeedSettings,
    json: bool,
}

impl Context {
    fn load(sheet_url: Option<&str>, json: bool) -> Result<Self> {
        let config = load_config()?;
        let settings = FeedSettings::resolve(&config, sheet_url)?;
        debug!(url = %settings.url, timeout_secs = settings.timeout_secs, "feed settings resolved");
        Ok(Self {
            config,
            settings,
            json,
        })
    }
}

// ---------------------------------------------------------------------------
// Page commands
// ---------------------------------------------------------------------------

/// Fetch one page's data, showing a spinner while it is `Loading`.
async fn load_page<N: Normalizer>(ctx: &Context, normalizer: N) -> Result<PageView<N>> {
    let source = CsvSource::new(&ctx.settings)?;
    debug!(url = %source.url(), "feed source ready");
    let page = PageView::new(source, normalizer);

    let spinner = Spinner::start(format!("Loading {}...", page.normalizer().subject()));
    let settled = page.refresh().await;
    spinner.finish();

    info!(domain = page.normalizer().name(), ?settled, "page settled");
    Ok(page)
}

async fn show_page<N>(
    ctx: &Context,
    normalizer: N,
    selection: Option<&str>,
    search: Option<&str>,
    render: fn(&N::Record) -> String,
) -> Result<()>
where
    N: Normalizer,
    N::Record: Serialize,
{
    let page = load_page(ctx, normalizer).await?;
    let selection = Selection::parse(selection);

    match page.view(&selection, search) {
        LoadState::Loading => Err(eyre!("the feed request did not settle")),
        LoadState::Error(message) => Err(eyre!("{message}")),
        LoadState::Ready(view) => {
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&view.records)?);
                return Ok(());
            }
            if view.is_empty() {
                println!("{}", page.normalizer().empty_message());
                return Ok(());
            }

            let shown = view.records.len();
            let selection = view.selection.as_deref();
            print!("{}", output::view_header(&view.facets, selection, shown, view.total));
            for record in &view.records {
                print!("{}", render(record));
            }
            println!();
            Ok(())
        }
    }
}

async fn cmd_facets(ctx: &Context, domain: FacetDomain) -> Result<()> {
    let facets = match domain {
        FacetDomain::Projects => {
            page_facets(ctx, ProjectNormalizer::new(&ctx.config.projects)).await?
        }
        FacetDomain::Prizes => page_facets(ctx, PrizeNormalizer).await?,
        FacetDomain::Formats => {
            page_facets(ctx, FormatNormalizer::new(&ctx.config.formats)).await?
        }
    };

    if ctx.json {
        let value = serde_json::json!({
            "values": facets.values(),
            "default": facets.default_selection(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", output::facets(&facets));
    }
    Ok(())
}

async fn page_facets<N: Normalizer>(ctx: &Context, normalizer: N) -> Result<FacetSet> {
    let page = load_page(ctx, normalizer).await?;
    match page.state().map(|data| data.facets) {
        LoadState::Ready(facets) => Ok(facets),
        LoadState::Error(message) => Err(eyre!("{message}")),
        LoadState::Loading => Err(eyre!("the feed request did not settle")),
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Spinner
// ---------------------------------------------------------------------------

/// Spinner shown on stderr while a page is loading.
struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    fn start(message: String) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        bar.set_style(style);
        bar.set_message(message);
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }

    fn finish(self) {
        self.bar.finish_and_clear();
    }
}
