//! stat-verify: run and verify statistical tests from the command line

mod cli;
mod commands;
mod config;
mod context;
mod output;

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::context::Context;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "stat_verify=debug"
    } else {
        "stat_verify=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let ctx = Context::new(&cli)?;

    match cli.command {
        Commands::List(args) => commands::list::execute(&ctx, args).map(|()| true),
        Commands::Run(args) => commands::run::execute(&ctx, args),
        Commands::Verify(args) => commands::verify::execute(&ctx, args).await,
    }
}
