//! Run command

use anyhow::{Context as _, Result};
use clap::{ArgGroup, Args};
use comfy_table::Cell;
use serde::Serialize;
use serde_json::Value;
use stat_verify_core::{ComparisonOutcome, ComputedResult, ExpectedResult};
use std::path::PathBuf;

use crate::context::Context;
use crate::output::{format_value, print_section, OutputFormat, TableDisplay};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("input").required(true).args(["data", "data_file"])))]
pub struct RunArgs {
    /// Test identifier, e.g. "Shapiro-Wilk Test"
    pub test: String,

    /// Input as JSON, or comma-separated numbers
    #[arg(short, long)]
    pub data: Option<String>,

    /// Read the input from a file
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Reference result as a JSON object; the run fails when it does not match
    #[arg(short, long)]
    pub expected: Option<String>,
}

/// Execute the run command. Returns `false` when the comparison failed.
pub fn execute(ctx: &Context, args: RunArgs) -> Result<bool> {
    let raw = match (&args.data, &args.data_file) {
        (Some(data), _) => parse_input(data),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_input(&text)
        }
        (None, None) => anyhow::bail!("either --data or --data-file is required"),
    };

    let result = ctx.engine.execute(&args.test, &raw)?;

    let comparison = match &args.expected {
        Some(expected) => {
            let expected: ExpectedResult = serde_json::from_str(expected)
                .context("--expected must be a JSON object of result fields")?;
            Some(ctx.engine.compare(&args.test, &result, &expected)?)
        }
        None => None,
    };
    let passed = comparison.as_ref().map_or(true, |c| c.passed);

    let display = RunDisplay {
        test: args.test,
        result,
        comparison,
    };
    ctx.output.write(&display)?;

    if ctx.output.format() == OutputFormat::Table {
        if let Some(comparison) = &display.comparison {
            if comparison.passed {
                ctx.output.success(&format!(
                    "Matches the reference within {}",
                    ctx.engine.tolerance()
                ));
            } else {
                let mut table = ctx.output.table(&["Field", "Problem", "Expected", "Actual"]);
                for mismatch in &comparison.mismatches {
                    table.add_row(vec![
                        Cell::new(&mismatch.path),
                        Cell::new(format!("{:?}", mismatch.kind)),
                        Cell::new(format_value(&mismatch.expected)),
                        Cell::new(
                            mismatch
                                .actual
                                .as_ref()
                                .map_or_else(|| "-".to_string(), format_value),
                        ),
                    ]);
                }
                println!("{table}");
                ctx.output.error(&format!(
                    "{} field(s) differ from the reference",
                    comparison.mismatches.len()
                ));
            }
        }
    }

    Ok(passed)
}

/// JSON when it parses, otherwise the text itself for the delimited-number form
fn parse_input(text: &str) -> Value {
    serde_json::from_str(text.trim()).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[derive(Debug, Serialize)]
struct RunDisplay {
    test: String,
    result: ComputedResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<ComparisonOutcome>,
}

impl TableDisplay for RunDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![Cell::new(&self.test), Cell::new(self.result.len())]
    }

    fn display_single(&self) {
        print_section(&self.test);
        let mut table = comfy_table::Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec!["Field", "Value"]);
        for (name, value) in self.result.fields() {
            table.add_row(vec![Cell::new(name), Cell::new(format_value(value))]);
        }
        println!("{table}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_json() {
        assert_eq!(parse_input(" [1, 2.5] "), serde_json::json!([1, 2.5]));
    }

    #[test]
    fn test_parse_input_falls_back_to_text() {
        assert_eq!(
            parse_input("1.2, 1.8, 2.4"),
            Value::String("1.2, 1.8, 2.4".to_string())
        );
    }
}
