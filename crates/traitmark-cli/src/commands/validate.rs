//! The `traitmark validate` command.

use std::path::PathBuf;

use anyhow::Result;

use traitmark_core::catalog::{load_catalog, validate_catalog};

pub fn execute(catalog: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path.as_deref())?;
    let path = super::catalog_path(catalog, &config);
    let catalog = load_catalog(&path)?;

    for test in catalog.tests() {
        println!(
            "Test: {} ({} questions, {} profiles)",
            test.name,
            test.questions.len(),
            test.result_profiles.len()
        );
    }

    let warnings = validate_catalog(&catalog);
    for w in &warnings {
        let prefix = match (&w.test_id, &w.question_id) {
            (Some(test), Some(question)) => format!("  [{test}/{question}]"),
            (Some(test), None) => format!("  [{test}]"),
            _ => "  ".to_string(),
        };
        println!("{prefix} WARNING: {}", w.message);
    }

    if catalog.is_empty() {
        println!("No tests found in {}.", path.display());
    } else if warnings.is_empty() {
        println!("All tests valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
