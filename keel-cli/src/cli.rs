//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Keel CLI - Schema migrations for application-defined data models
#[derive(Parser, Debug)]
#[command(name = "keel")]
#[command(version)]
#[command(about = "Keel CLI - Schema migrations for application-defined data models", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bring the database schema in line with the configured tables
    Migrate(MigrateArgs),
}

/// Arguments for the `migrate` command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Working directory (defaults to the current directory)
    #[arg(short = 'c', long, default_value = ".")]
    pub cwd: PathBuf,

    /// Path to the configuration file, relative to the working directory
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Apply changes without asking for confirmation
    #[arg(short = 'y', long = "y")]
    pub yes: bool,
}
