//! List command

use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;
use stat_verify_core::{CatalogGroup, ResultSchema, ShapeDescriptor};
use stat_verify_engine::RegistryEntry;

use crate::context::Context;
use crate::output::{print_field, print_list_field, print_section, status_badge, TableDisplay};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only tests in this catalog group, e.g. "A/B Tests" or ab_tests
    #[arg(short, long)]
    pub group: Option<CatalogGroup>,
}

/// Execute the list command
pub fn execute(ctx: &Context, args: ListArgs) -> Result<()> {
    let registry = ctx.engine.registry();
    let entries = match args.group {
        Some(group) => registry.in_group(group),
        None => registry.entries(),
    };

    let tests: Vec<TestDisplay> = entries.into_iter().map(Into::into).collect();
    ctx.output
        .write_list(&tests, &["Test", "Input", "Result", "Groups", "Implemented"])
}

/// Displayable registry entry for output
#[derive(Debug, Serialize)]
struct TestDisplay {
    test: String,
    shape: ShapeDescriptor,
    schema: ResultSchema,
    groups: Vec<CatalogGroup>,
    implemented: bool,
}

impl From<&RegistryEntry> for TestDisplay {
    fn from(entry: &RegistryEntry) -> Self {
        Self {
            test: entry.identifier.to_string(),
            shape: entry.shape,
            schema: entry.schema,
            groups: entry.groups.clone(),
            implemented: entry.is_implemented(),
        }
    }
}

impl TestDisplay {
    fn group_titles(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.title().to_string()).collect()
    }
}

impl TableDisplay for TestDisplay {
    fn to_row(&self) -> Vec<Cell> {
        let groups = self.group_titles();
        vec![
            Cell::new(&self.test),
            Cell::new(self.shape.to_string()),
            Cell::new(self.schema.required_fields().join(", ")),
            Cell::new(if groups.is_empty() { "-".to_string() } else { groups.join(", ") }),
            Cell::new(status_badge(if self.implemented { "yes" } else { "no" })),
        ]
    }

    fn display_single(&self) {
        print_section(&self.test);
        print_field("Input", &self.shape.to_string());
        print_field("Result", self.schema.name());
        print_list_field("Groups", &self.group_titles());
        print_field("Implemented", if self.implemented { "yes" } else { "no" });
    }
}
