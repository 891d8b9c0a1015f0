//! Output formatting for CLI

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;
use stat_verify_core::ResultValue;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Output writer that handles different formats
pub struct OutputWriter {
    format: OutputFormat,
    no_color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, no_color }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a single item
    pub fn write<T: Serialize + TableDisplay>(&self, item: &T) -> Result<()> {
        match self.format {
            OutputFormat::Table => item.display_single(),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
        }
        Ok(())
    }

    /// Write a list of items
    pub fn write_list<T: Serialize + TableDisplay>(&self, items: &[T], headers: &[&str]) -> Result<()> {
        match self.format {
            OutputFormat::Table => {
                if items.is_empty() {
                    println!("{}", "No items found.".dimmed());
                    return Ok(());
                }

                let mut table = self.table(headers);
                for item in items {
                    table.add_row(item.to_row());
                }

                println!("{table}");
                println!(
                    "\n{} {} item(s)",
                    "Total:".bold(),
                    items.len().to_string().green()
                );
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
        }
        Ok(())
    }

    /// Table with the standard preset and cyan headers
    pub fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.apply_modifier(UTF8_ROUND_CORNERS);
        if self.no_color {
            table.force_no_tty();
        }

        let header_cells: Vec<Cell> = headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect();
        table.set_header(header_cells);
        table
    }

    pub fn success(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "✓".green(), message);
        }
    }

    /// Errors always go to stderr so JSON on stdout stays parseable
    pub fn error(&self, message: &str) {
        if self.format == OutputFormat::Table {
            eprintln!("{} {}", "✗".red(), message);
        } else {
            eprintln!("Error: {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "⚠".yellow(), message);
        }
    }
}

/// Trait for displaying items in a table
pub trait TableDisplay {
    /// Convert item to a table row
    fn to_row(&self) -> Vec<Cell>;

    /// Display a single item in detail
    fn display_single(&self);
}

/// Print a key-value pair in detail format
pub fn print_field(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

/// Print a list field
pub fn print_list_field(key: &str, values: &[String]) {
    if values.is_empty() {
        println!("  {}: {}", key.cyan(), "-".dimmed());
    } else {
        println!("  {}:", key.cyan());
        for v in values {
            println!("    - {}", v);
        }
    }
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Format a timestamp for display
pub fn format_timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Numbers to six decimals, the precision of the reference fixtures
pub fn format_value(value: &ResultValue) -> String {
    match value {
        ResultValue::Number(n) if n.is_finite() && n.fract() != 0.0 => format!("{:.6}", n),
        ResultValue::Number(n) => n.to_string(),
        ResultValue::Text(text) => text.clone(),
        ResultValue::Sequence(values) => format!(
            "[{}]",
            values.iter().map(format_value).collect::<Vec<_>>().join(", ")
        ),
        ResultValue::Mapping(entries) => entries
            .iter()
            .map(|(key, value)| format!("{}: {}", key, format_value(value)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Status badge with color
pub fn status_badge(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "passed" | "yes" => status.to_string().green().to_string(),
        "failed" | "errored" => status.to_string().red().to_string(),
        "no" => status.to_string().yellow().to_string(),
        _ => status.to_string(),
    }
}
