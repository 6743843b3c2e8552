//! The `traitmark register` command.

use std::path::PathBuf;

use anyhow::Result;

use traitmark_core::catalog::Catalog;

pub async fn execute(
    first_name: String,
    last_name: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        !first_name.trim().is_empty() || !last_name.trim().is_empty(),
        "a respondent needs a first or last name"
    );

    let config = super::load_config(config_path.as_deref())?;
    let engine = super::open_engine(&config, Catalog::default());
    let respondent = engine
        .register(first_name.trim(), last_name.trim())
        .await?;

    eprintln!("Registered {}", respondent.full_name());
    println!("{}", respondent.id);
    Ok(())
}
