//! CLI command definitions

use clap::Args;

/// Run the workflow
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Use a seeded in-memory store instead of SQLite (demo/offline)
    #[arg(long)]
    pub memory: bool,

    /// Print the full run result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Validate configuration and workflow wiring
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show recently logged council debates
#[derive(Debug, Args, Clone)]
pub struct HistoryCommand {
    /// Number of recent debates to show
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
