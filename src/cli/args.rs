//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    account::AccountCommands,
    batch::BatchCommands,
    completions::CompletionsArgs,
    device::DeviceCommands,
    init::InitArgs,
    job::JobCommands,
    profile::ProfileCommands,
    search::SearchArgs,
    shipment::ShipmentCommands,
    stats::StatsArgs,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "dlt")]
#[command(author, version, about = "Device Lifecycle Tracker")]
#[command(long_about = "A local-first tracker for electronics fleets: registered devices, \
shipments, recycling batches, and refurbishment jobs as plain YAML files.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace root (default: auto-detect by finding .dlt/)
    #[arg(long, global = true, env = "DLT_WORKSPACE")]
    pub workspace: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new DLT workspace
    Init(InitArgs),

    /// Device registry (the tracked fleet)
    #[command(subcommand)]
    Device(DeviceCommands),

    /// Shipment tracking
    #[command(subcommand)]
    Shipment(ShipmentCommands),

    /// Recycling batch management
    #[command(subcommand)]
    Batch(BatchCommands),

    /// Refurbishment job management
    #[command(subcommand)]
    Job(JobCommands),

    /// Account holder profile and preferences
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Sign in, sign up, and the stored session
    #[command(subcommand)]
    Account(AccountCommands),

    /// Show the fleet statistics dashboard
    Stats(StatsArgs),

    /// Search across all record types
    Search(SearchArgs),

    /// Validate workspace files against schemas
    Validate(ValidateArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (table for list, human card for show)
    #[default]
    Auto,
    /// Aligned table with status colors
    Table,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Tab-separated values (for piping)
    Tsv,
    /// Just IDs, one per line
    Id,
}
