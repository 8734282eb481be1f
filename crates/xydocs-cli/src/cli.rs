//! # CLI Structure and Argument Parsing
//!
//! ```bash
//! # Serve the site
//! xydocs serve --bind 0.0.0.0:8080
//!
//! # Query the docs from a terminal
//! xydocs search cpu monitoring --limit 5
//! xydocs get api/system/cpu-monitoring --format html
//! xydocs list --format json
//!
//! # Publish a sitemap
//! xydocs sitemap --base-url https://xypriss.dev > sitemap.xml
//! ```

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::output::{DocumentFormat, OutputFormat};

/// Main CLI structure for the `xydocs` command
#[derive(Parser, Clone, Debug)]
#[command(name = "xydocs")]
#[command(version)]
#[command(about = "xydocs - Serve and search the XyPriss documentation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "XYDOCS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Documentation root directory (overrides config)
    #[arg(long = "docs-dir", global = true, value_name = "DIR")]
    pub docs_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Listen address (overrides config and `XYDOCS_BIND`)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Fuzzy search across all documents
    Search {
        /// Search query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Maximum number of results (defaults to `search.limit`)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print one document
    Get {
        /// Document slug; omit for the root document
        #[arg(default_value = "")]
        slug: String,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = DocumentFormat::Text)]
        format: DocumentFormat,
    },

    /// List every document
    List {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the sitemap XML
    Sitemap {
        /// Public origin (overrides `site.base_url`)
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Whether the command writes machine-readable output to stdout.
    pub const fn machine_output(&self) -> bool {
        match self {
            Self::Search { format, .. } | Self::List { format } => {
                matches!(format, OutputFormat::Json | OutputFormat::Jsonl)
            },
            Self::Get { format, .. } => matches!(format, DocumentFormat::Json),
            Self::Sitemap { .. } | Self::Completions { .. } => true,
            Self::Serve { .. } => false,
        }
    }
}
