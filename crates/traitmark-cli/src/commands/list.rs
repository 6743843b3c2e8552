//! The `traitmark list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use traitmark_core::catalog::load_catalog;

pub fn execute(catalog: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path.as_deref())?;
    let path = super::catalog_path(catalog, &config);
    let catalog = load_catalog(&path)?;

    if catalog.is_empty() {
        println!("No tests found. Run `traitmark init` to create a sample test.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Name", "Questions", "Profiles", "Duration"]);
    for test in catalog.tests() {
        table.add_row(vec![
            Cell::new(&test.id),
            Cell::new(&test.name),
            Cell::new(test.questions.len()),
            Cell::new(test.result_profiles.len()),
            Cell::new(test.duration.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");

    Ok(())
}
