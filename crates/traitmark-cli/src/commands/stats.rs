//! The `traitmark stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use traitmark_core::catalog::Catalog;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path.as_deref())?;
    let engine = super::open_engine(&config, Catalog::default());
    let stats = engine.stats().await?;

    println!("Respondents: {}", stats.respondents);
    println!("Results:     {}", stats.total_results);

    if stats.per_test.is_empty() {
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Test", "Completions", "Most common dominant"]);
    for test in &stats.per_test {
        let top = test
            .dominant_profiles
            .first()
            .map(|p| format!("{} ({})", p.profile, p.count))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&test.test_name),
            Cell::new(test.count),
            Cell::new(top),
        ]);
    }
    println!("{table}");

    Ok(())
}
