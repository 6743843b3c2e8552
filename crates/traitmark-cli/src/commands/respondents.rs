//! The `traitmark respondents` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use traitmark_core::catalog::Catalog;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path.as_deref())?;
    let engine = super::open_engine(&config, Catalog::default());
    let histories = engine.histories().await?;

    if histories.is_empty() {
        println!("No respondents registered. Run `traitmark register` to add one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Name", "Registered", "Results"]);
    for (respondent, results) in &histories {
        table.add_row(vec![
            Cell::new(respondent.id),
            Cell::new(respondent.full_name()),
            Cell::new(respondent.registered_at.format("%Y-%m-%d %H:%M")),
            Cell::new(results.len()),
        ]);
    }
    println!("{table}");

    Ok(())
}
