//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{list::ListArgs, run::RunArgs, verify::VerifyArgs};
use crate::output::OutputFormat;

/// Run named statistical tests and verify them against reference results
#[derive(Debug, Parser)]
#[command(name = "stat-verify", version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Absolute tolerance for result comparison (overrides configuration)
    #[arg(short, long, global = true)]
    pub tolerance: Option<f64>,

    /// Additional configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List registered tests
    List(ListArgs),

    /// Execute one test on supplied data
    Run(RunArgs),

    /// Check tests against the reference fixtures
    Verify(VerifyArgs),
}
