//! CLI execution context

use anyhow::{Context as _, Result};
use stat_verify_core::VerificationSettings;
use stat_verify_engine::{TestEngine, TestRegistry};

use crate::cli::Cli;
use crate::config;
use crate::output::OutputWriter;

/// Execution context for CLI commands
pub struct Context {
    /// Effective settings after configuration layers and flags
    pub settings: VerificationSettings,

    /// Engine over the standard catalog
    pub engine: TestEngine,

    /// Output writer
    pub output: OutputWriter,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut settings = config::load(cli.config.as_deref())?;
        if let Some(tolerance) = cli.tolerance {
            settings.absolute_tolerance = tolerance;
        }
        let settings = settings.validated().context("Invalid settings")?;

        let engine = TestEngine::with_settings(TestRegistry::standard(), &settings)?;
        tracing::debug!(
            "Engine ready with {} tests, tolerance {}",
            engine.registry().len(),
            engine.tolerance()
        );

        Ok(Self {
            settings,
            engine,
            output: OutputWriter::new(cli.format, cli.no_color),
        })
    }
}
