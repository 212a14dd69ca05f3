//! Ludex CLI - operator interface for the sync engine.

mod commands;
mod config;
mod progress;
mod shutdown;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ludex")]
#[command(version)]
#[command(about = "Multi-source game metadata aggregator")]
#[command(
    long_about = "Ludex synchronizes game metadata, pricing and viewership signals from RAWG, \
IGDB, CheapShark, Steam and Twitch into a local database. Historical syncs are \
resumable: interrupt them at any time and re-run to continue from the last \
checkpointed page."
)]
#[command(after_long_help = r#"EXAMPLES
    Run the full CheapShark sync (resumes where it left off):
        $ ludex sync cheapshark

    Catch up on recent RAWG releases:
        $ ludex sync rawg --mode incremental

    Refresh hot deals and current viewership:
        $ ludex sync cheapshark --mode hot
        $ ludex sync twitch --mode hot

    Show cursor positions and completion estimates:
        $ ludex stats

CONFIGURATION
    Ludex reads configuration from:
      1. ~/.config/ludex/config.toml (or $XDG_CONFIG_HOME/ludex/config.toml)
      2. ./ludex.toml in the current directory
      3. Environment variables (LUDEX_* prefix)

ENVIRONMENT VARIABLES
    LUDEX_DATABASE_URL           Database connection string
    LUDEX_RAWG_API_KEY           RAWG API key
    LUDEX_IGDB_CLIENT_ID         IGDB (Twitch dev) client id
    LUDEX_IGDB_CLIENT_SECRET     IGDB (Twitch dev) client secret
    LUDEX_TWITCH_CLIENT_ID       Twitch client id
    LUDEX_TWITCH_CLIENT_SECRET   Twitch client secret
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Sync one source
    Sync {
        /// Source to sync: rawg, igdb, cheapshark, steam, twitch
        source: String,
        /// Sync pass to run
        #[arg(short, long, value_enum, default_value_t = SyncMode::Full)]
        mode: SyncMode,
    },
    /// Sync every source that supports the given mode
    SyncAll {
        /// Sync pass to run
        #[arg(short, long, value_enum, default_value_t = SyncMode::Full)]
        mode: SyncMode,
    },
    /// Show sync status per source
    Stats {
        /// Limit to one source
        source: Option<String>,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Drop all tables and reapply migrations
    Fresh,
}

/// Which pass to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SyncMode {
    /// Full/historical sync, resumable across sessions
    Full,
    /// Window-bounded catch-up of recent data
    Incremental,
    /// Fast refresh of hot data
    Hot,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = config::Config::load()?;

    match cli.command {
        Commands::Migrate { action } => commands::migrate::run(&config, action).await,
        Commands::Sync { source, mode } => {
            let source = source
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            commands::sync::run_one(&config, source, mode).await
        }
        Commands::SyncAll { mode } => commands::sync::run_all(&config, mode).await,
        Commands::Stats { source } => {
            let source = match source {
                Some(s) => Some(s.parse().map_err(|e: String| anyhow::anyhow!(e))?),
                None => None,
            };
            commands::stats::run(&config, source).await
        }
    }
}
