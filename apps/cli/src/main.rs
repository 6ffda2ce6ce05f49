//! Showcase CLI: browse the showcase spreadsheet from the terminal.
//!
//! Fetches the published CSV feed and lists projects, announcements,
//! prizes and document formats with facet and search filtering.

mod commands;
mod output;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
