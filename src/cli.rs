use std::path::PathBuf;

use clap::{Parser, Subcommand};
use moonlight_lib::config::DEFAULT_CONFIG_PATH;

/// Moonlight moon-phase calculator.
#[derive(Parser, Debug)]
#[command(
    name = "moonlight",
    version,
    about = "Moon age and phase for any calendar date"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the moon phase for one date.
    Show(ShowArgs),
    /// List the moon phase for consecutive days.
    Range(RangeArgs),
    /// Write the default configuration file.
    InitConfig(InitConfigArgs),
}

/// Arguments for the `show` subcommand.
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Date as YYYY-MM-DD or MM/DD/YYYY (defaults to today).
    #[arg(short, long)]
    pub date: Option<String>,

    /// Emit the reading as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `range` subcommand.
#[derive(clap::Args, Debug)]
pub struct RangeArgs {
    /// First date as YYYY-MM-DD or MM/DD/YYYY (defaults to today).
    #[arg(short, long)]
    pub from: Option<String>,

    /// Number of days to list.
    #[arg(short = 'n', long, default_value_t = 30)]
    pub days: usize,

    /// Emit the readings as a JSON array instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `init-config` subcommand.
#[derive(clap::Args, Debug)]
pub struct InitConfigArgs {
    /// Destination path (defaults to the global --config path).
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}
