use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Tributary watershed runoff simulator.
#[derive(Parser)]
#[command(
    name = "tributary",
    version,
    about = "Watershed runoff accounting and max-flow routing simulator"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run a simulation over a watershed topology.
    Simulate(SimulateArgs),
    /// Print a summary of a topology file.
    Inspect(InspectArgs),
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args)]
pub struct SimulateArgs {
    /// Path to TOML run configuration file.
    #[arg(short, long, default_value = "tributary.toml")]
    pub config: PathBuf,

    /// Override output JSON path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the start date from config (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Override the number of daily steps from config.
    #[arg(long)]
    pub steps: Option<u32>,
}

/// Arguments for the `inspect` subcommand.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to TOML topology file.
    #[arg(short, long)]
    pub topology: PathBuf,
}
