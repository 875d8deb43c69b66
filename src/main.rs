//! # Stackdump CLI
//!
//! The `stackdump` binary serves the web front-end and offers a couple of
//! operational commands against the same resources.
//!
//! ## Usage
//!
//! ```bash
//! stackdump --config ./config/stackdump.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `stackdump serve` | Start the HTTP server |
//! | `stackdump sites` | List imported sites from the store |
//! | `stackdump search "<query>"` | Query the search service from the terminal |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use stackdump::{config, search, server, sites};

/// Stackdump — browse and search offline Stack Exchange data dumps.
#[derive(Parser)]
#[command(
    name = "stackdump",
    about = "Stackdump — a web front-end for offline Stack Exchange data dumps",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/stackdump.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` and serves the site pages, search pages,
    /// and static media until the process is terminated.
    Serve,

    /// List imported sites.
    ///
    /// Reads the sites table from the dump database and prints key, name,
    /// and dump date. Useful for verifying an import.
    Sites,

    /// Search the index from the terminal.
    ///
    /// Runs the query against the search service with the same offset
    /// contract as the web UI (first result at `page * rows`).
    Search {
        /// The search query string.
        query: String,

        /// Restrict results to a single site key.
        #[arg(long)]
        site: Option<String>,

        /// Zero-based page number.
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Results per page.
        #[arg(long, default_value_t = 10)]
        rows: u32,
    },
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "stackdump=debug,info" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    init_tracing(cfg.debug);

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Sites => {
            sites::list_sites(&cfg).await?;
        }
        Commands::Search {
            query,
            site,
            page,
            rows,
        } => {
            search::run_search(&cfg, &query, site.as_deref(), page, rows).await?;
        }
    }

    Ok(())
}
