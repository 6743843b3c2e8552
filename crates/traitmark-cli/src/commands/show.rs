//! The `traitmark show` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use traitmark_core::catalog::Catalog;
use traitmark_core::interpretation::development_suggestions;
use traitmark_report::html::generate_html;

pub async fn execute(
    user: String,
    index: usize,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json" | "html"),
        "unknown format '{format}' (expected text, json or html)"
    );

    let config = super::load_config(config_path.as_deref())?;
    let respondent_id = super::parse_user(&user)?;
    let engine = super::open_engine(&config, Catalog::default());

    let respondent = engine.respondent(respondent_id).await?;
    let history = engine.history(respondent_id).await?;
    let result = history.get(index).ok_or_else(|| {
        anyhow::anyhow!(
            "no result at index {index} ({} result(s) stored for {})",
            history.len(),
            respondent.full_name()
        )
    })?;

    let rendered = match format.as_str() {
        "json" => format!("{}\n", serde_json::to_string_pretty(result)?),
        "html" => generate_html(result, Some(&respondent)),
        _ => {
            let mut text = super::result_text(result);
            if let Some(dominant) = result.dominant() {
                text.push_str(&format!("\n{}\n", development_suggestions(&dominant.name)));
            }
            text
        }
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory: {}", parent.display()))?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
