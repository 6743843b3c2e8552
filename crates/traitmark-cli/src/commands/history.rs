//! The `traitmark history` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use traitmark_core::catalog::Catalog;

pub async fn execute(user: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path.as_deref())?;
    let respondent_id = super::parse_user(&user)?;
    let engine = super::open_engine(&config, Catalog::default());

    let respondent = engine.respondent(respondent_id).await?;
    let history = engine.history(respondent_id).await?;

    println!("Results for {}", respondent.full_name());
    if history.is_empty() {
        println!("No results yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Index", "Test", "Dominant", "Score", "Completed"]);
    for (index, result) in history.iter().enumerate() {
        let (dominant, score) = result
            .dominant()
            .map(|s| (s.name.clone(), format!("{:.1}%", s.score)))
            .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
        table.add_row(vec![
            Cell::new(index),
            Cell::new(&result.test_name),
            Cell::new(dominant),
            Cell::new(score),
            Cell::new(result.submitted_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    println!("{table}");

    Ok(())
}
