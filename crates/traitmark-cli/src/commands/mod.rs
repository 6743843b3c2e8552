pub mod history;
pub mod init;
pub mod list;
pub mod register;
pub mod respondents;
pub mod show;
pub mod stats;
pub mod submit;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use uuid::Uuid;

use traitmark_core::catalog::Catalog;
use traitmark_core::engine::SubmissionEngine;
use traitmark_core::interpretation::TemplateInterpreter;
use traitmark_core::model::{AnswerSheet, TestResult};
use traitmark_store::config::{load_config_from, TraitmarkConfig};
use traitmark_store::JsonFileRepository;

pub fn load_config(config_path: Option<&Path>) -> Result<TraitmarkConfig> {
    load_config_from(config_path)
}

/// Build an engine over the JSON store in the configured data directory.
pub fn open_engine(config: &TraitmarkConfig, catalog: Catalog) -> SubmissionEngine {
    tracing::debug!(
        "opening store at {} with {} test(s)",
        config.data_dir.display(),
        catalog.len()
    );
    let repository = Arc::new(JsonFileRepository::new(&config.data_dir));
    SubmissionEngine::new(Arc::new(catalog), repository).with_interpreter(Arc::new(
        TemplateInterpreter::new(config.interpretation_config()),
    ))
}

/// The explicit catalog path, or the configured one.
pub fn catalog_path(explicit: Option<PathBuf>, config: &TraitmarkConfig) -> PathBuf {
    explicit.unwrap_or_else(|| config.catalog.clone())
}

pub fn parse_user(user: &str) -> Result<Uuid> {
    Uuid::parse_str(user.trim()).with_context(|| format!("invalid respondent id: {user}"))
}

/// Read an answers file: a TOML or JSON map of question id to option index.
pub fn read_answer_sheet(path: &Path) -> Result<AnswerSheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers: {}", path.display()))?;
    let sheet: AnswerSheet = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON: {}", path.display()))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("failed to parse TOML: {}", path.display()))?
    };
    Ok(sheet)
}

pub fn scores_table(result: &TestResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Profile", "Score"]);
    for (rank, score) in result.scores.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&score.name),
            Cell::new(format!("{:.1}%", score.score)),
        ]);
    }
    table
}

/// Render a result as a score table followed by its interpretation.
pub fn result_text(result: &TestResult) -> String {
    let mut text = format!(
        "{} ({})\n",
        result.test_name,
        result.submitted_at.format("%Y-%m-%d %H:%M UTC")
    );
    if !result.scores.is_empty() {
        text.push_str(&format!("{}\n", scores_table(result)));
    }
    text.push_str(&format!("\n{}\n", result.interpretation));
    text
}

pub fn print_result(result: &TestResult) {
    print!("{}", result_text(result));
}
