//! The `traitmark submit` command.

use std::path::PathBuf;

use anyhow::Result;

use traitmark_core::catalog::load_catalog;
use traitmark_core::model::TestId;

pub async fn execute(
    user: String,
    test: String,
    answers: PathBuf,
    catalog: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json"),
        "unknown format '{format}' (expected text or json)"
    );

    let config = super::load_config(config_path.as_deref())?;
    let respondent_id = super::parse_user(&user)?;
    let sheet = super::read_answer_sheet(&answers)?;
    let catalog = load_catalog(&super::catalog_path(catalog, &config))?;

    let engine = super::open_engine(&config, catalog);
    let result = engine
        .submit_sheet(respondent_id, &TestId::from(test), &sheet)
        .await?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => super::print_result(&result),
    }
    Ok(())
}
