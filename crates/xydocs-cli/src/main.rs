//! xydocs CLI - serve and search the XyPriss documentation
//!
//! Command implementations live in [`commands`]; the HTTP server lives in
//! [`server`].

use anyhow::Result;
use clap::Parser;
use std::io;
use tracing::debug;
use xydocs_core::Config;

mod cli;
mod commands;
mod output;
mod server;
mod utils;

use cli::{Cli, Commands};
use utils::logging::initialize_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let config = load_config(&cli)?;
    execute_command(cli.command, config).await
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.docs_dir {
        config.content.root.clone_from(dir);
    }
    debug!("Documentation root: {}", config.content.root.display());
    Ok(config)
}

async fn execute_command(command: Commands, config: Config) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Serve { bind } => {
            drop(out);
            commands::serve(config, bind).await?;
        },
        Commands::Search {
            query,
            limit,
            format,
        } => commands::search(&config, &query, limit, format, &mut out)?,
        Commands::Get { slug, format } => commands::get_document(&config, &slug, format, &mut out)?,
        Commands::List { format } => commands::list_documents(&config, format, &mut out)?,
        Commands::Sitemap { base_url } => {
            commands::print_sitemap(&config, base_url.as_deref(), &mut out)?;
        },
        Commands::Completions { shell } => commands::generate(shell, &mut out),
    }

    Ok(())
}
