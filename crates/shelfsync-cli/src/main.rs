use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

use commands::{config, sync};

#[derive(Parser)]
#[command(name = "shelfsync")]
#[command(about = "ShelfSync - mirror your media catalog onto your tracker")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write logs to a daily-rotated file. Without a value, logs go to
    /// the user log directory.
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one reconciliation pass against the tracker
    #[command(
        long_about = "Read the catalog and the tracker, compute the differences, and correct the tracker so it mirrors the catalog. If no domain flags are given, the domains enabled in configuration are synced."
    )]
    Sync {
        /// Sync the configured catalog lists
        #[arg(long, action = ArgAction::SetTrue)]
        lists: bool,

        /// Sync the watchlist
        #[arg(long, action = ArgAction::SetTrue)]
        watchlist: bool,

        /// Sync ratings
        #[arg(long, action = ArgAction::SetTrue)]
        ratings: bool,

        /// Sync watch history inferred from ratings
        #[arg(long, action = ArgAction::SetTrue)]
        history: bool,

        /// Sync mode: full, add-only or dry-run (overrides configuration)
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration (masks sensitive data)
    Show {
        /// Show full configuration including masked secrets
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = match cli.log_file {
        Some(Some(path)) => Some(path),
        Some(None) => Some(
            logging::default_log_file().map_err(|e| color_eyre::eyre::eyre!("{e}"))?,
        ),
        None => None,
    };
    logging::init_logging(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{e}"))?;

    match cli.command {
        Commands::Sync {
            lists,
            watchlist,
            ratings,
            history,
            mode,
        } => sync::run_sync(cli.config, lists, watchlist, ratings, history, mode),
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show { full } => config::run_show(cli.config, full),
        },
    }
}
