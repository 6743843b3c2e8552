//! The `traitmark init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create traitmark.toml
    if std::path::Path::new("traitmark.toml").exists() {
        println!("traitmark.toml already exists, skipping.");
    } else {
        std::fs::write("traitmark.toml", SAMPLE_CONFIG)?;
        println!("Created traitmark.toml");
    }

    // Create sample test
    std::fs::create_dir_all("tests")?;
    let sample_path = std::path::Path::new("tests/sample.toml");
    if sample_path.exists() {
        println!("tests/sample.toml already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_TEST)?;
        println!("Created tests/sample.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: traitmark validate");
    println!("  2. Run: traitmark register --first-name Ada --last-name Lovelace");
    println!("  3. Run: traitmark submit --user <id> --test sample --answers answers.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# traitmark configuration

# Test file or directory of test files
catalog = "./tests"

# Where respondents and results are stored
data_dir = "./traitmark-data"

# Mention the second profile when it is within this many points of the first
secondary_gap = 15.0
"#;

const SAMPLE_TEST: &str = r##"[test]
id = "sample"
name = "Sample Test"
description = "A two-question test to get started"
duration = "1 min"

[profiles.thinker]
name = "Thinker"
color = "#3b82f6"
description = "You prefer to reflect before acting."

[profiles.doer]
name = "Doer"
color = "#ef4444"
description = "You prefer to act and adjust on the way."

[[questions]]
id = "q1"
text = "Faced with a new problem you..."

[[questions.options]]
text = "Read up on it first"
scores = { thinker = 2 }

[[questions.options]]
text = "Try something right away"
scores = { doer = 2 }

[[questions]]
id = "q2"
text = "Your notes are usually..."

[[questions.options]]
text = "Detailed and organized"
scores = { thinker = 2 }

[[questions.options]]
text = "A short to-do list"
scores = { doer = 1, thinker = 1 }
"##;
