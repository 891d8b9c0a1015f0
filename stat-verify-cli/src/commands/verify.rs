//! Verify command

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::Cell;
use stat_verify_engine::{BatchVerifier, FixtureTable, VerificationReport, VerificationStatus};
use std::path::PathBuf;

use crate::context::Context;
use crate::output::{format_timestamp, status_badge, OutputFormat};

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Tests to verify; every fixture when omitted
    pub tests: Vec<String>,

    /// Fixture file to use instead of the configured one
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Maximum number of tests verified at once
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,
}

/// Execute the verify command. Returns `false` unless every fixture passed.
pub async fn execute(ctx: &Context, args: VerifyArgs) -> Result<bool> {
    let table = match &args.fixtures {
        Some(path) => FixtureTable::from_path(path)?,
        None => FixtureTable::load(&ctx.settings)?,
    };
    let table = if args.tests.is_empty() {
        table
    } else {
        table.subset(&args.tests)?
    };

    let mut verifier = BatchVerifier::from_settings(ctx.engine.clone(), &ctx.settings);
    if let Some(jobs) = args.jobs {
        verifier = verifier.with_max_concurrency(jobs);
    }

    let summary = verifier.run(&table).await;

    match ctx.output.format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => {
            let mut rows = ctx.output.table(&["Test", "Status", "Details"]);
            for report in &summary.reports {
                rows.add_row(vec![
                    Cell::new(&report.test),
                    Cell::new(status_badge(report.status_label())),
                    Cell::new(details(report)),
                ]);
            }
            println!("{rows}");

            println!(
                "\n{} {} passed, {} failed, {} errored ({} ms, finished {})",
                "Summary:".bold(),
                summary.passed_count().to_string().green(),
                summary.failed_count().to_string().red(),
                summary.errored_count().to_string().yellow(),
                summary.duration().num_milliseconds(),
                format_timestamp(&summary.finished_at)
            );

            if summary.all_passed() {
                ctx.output.success(&format!(
                    "All {} fixture(s) match within {}",
                    summary.total(),
                    ctx.engine.tolerance()
                ));
            } else if summary.errored_count() > 0 {
                ctx.output
                    .warning("Some tests could not be executed; see the Details column");
            }
        }
    }

    Ok(summary.all_passed())
}

fn details(report: &VerificationReport) -> String {
    match &report.status {
        VerificationStatus::Passed => String::new(),
        VerificationStatus::Failed { mismatches } => mismatches
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        VerificationStatus::Errored { code, message } => format!("{}: {}", code, message),
    }
}
