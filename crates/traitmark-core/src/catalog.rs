//! Test catalog loading and validation.
//!
//! Tests are read from TOML or JSON files (or directories of them) into a
//! [`Catalog`], which resolves test ids for scoring.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::engine::assemble_result;
use crate::error::CoreError;
use crate::model::{
    ProfileKey, Question, QuestionOption, ResultProfile, TestDefinition, TestId, TestResult,
    UserAnswers,
};

/// The set of tests available for scoring.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tests: Vec<TestDefinition>,
}

impl Catalog {
    pub fn new(tests: Vec<TestDefinition>) -> Self {
        Self { tests }
    }

    pub fn tests(&self) -> &[TestDefinition] {
        &self.tests
    }

    pub fn get(&self, id: &TestId) -> Option<&TestDefinition> {
        self.tests.iter().find(|t| &t.id == id)
    }

    /// Look up a test, failing with [`CoreError::TestNotFound`].
    pub fn require(&self, id: &TestId) -> Result<&TestDefinition, CoreError> {
        self.get(id)
            .ok_or_else(|| CoreError::TestNotFound(id.clone()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &TestId> {
        self.tests.iter().map(|t| &t.id)
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Score `answers` against the test `id` and assemble a result.
    pub fn score(&self, id: &TestId, answers: &UserAnswers) -> Result<TestResult, CoreError> {
        let test = self.require(id)?;
        Ok(assemble_result(test, answers))
    }
}

/// Intermediate TOML structure for a test file.
#[derive(Debug, Deserialize)]
struct TomlTestFile {
    test: TomlTestHeader,
    #[serde(default)]
    profiles: IndexMap<String, TomlProfile>,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlTestHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlProfile {
    name: String,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default)]
    description: String,
}

fn default_color() -> String {
    "#6b7280".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    #[serde(default)]
    options: Vec<TomlOption>,
}

#[derive(Debug, Deserialize)]
struct TomlOption {
    text: String,
    #[serde(default)]
    scores: IndexMap<String, u32>,
}

/// JSON files hold either one test or an array of tests.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonTests {
    Many(Vec<TestDefinition>),
    One(Box<TestDefinition>),
}

/// Parse a test file. `.json` files may hold several tests; anything else
/// is read as a single TOML test.
pub fn parse_test_file(path: &Path) -> Result<Vec<TestDefinition>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test file: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        parse_json_str(&content, path)
    } else {
        Ok(vec![parse_test_str(&content, path)?])
    }
}

/// Parse a TOML string into a `TestDefinition` (useful for testing).
pub fn parse_test_str(content: &str, source_path: &Path) -> Result<TestDefinition> {
    let parsed: TomlTestFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let result_profiles = parsed
        .profiles
        .into_iter()
        .map(|(key, p)| {
            (
                ProfileKey::from(key),
                ResultProfile {
                    name: p.name,
                    color: p.color,
                    description: p.description,
                },
            )
        })
        .collect();

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            text: q.text,
            options: q
                .options
                .into_iter()
                .map(|o| QuestionOption {
                    text: o.text,
                    scores: o
                        .scores
                        .into_iter()
                        .map(|(k, v)| (ProfileKey::from(k), v))
                        .collect(),
                })
                .collect(),
        })
        .collect();

    Ok(TestDefinition {
        id: TestId::from(parsed.test.id),
        name: parsed.test.name,
        description: parsed.test.description,
        duration: parsed.test.duration,
        questions,
        result_profiles,
    })
}

/// Parse a JSON string holding one test or an array of tests.
pub fn parse_json_str(content: &str, source_path: &Path) -> Result<Vec<TestDefinition>> {
    let parsed: JsonTests = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;
    Ok(match parsed {
        JsonTests::Many(tests) => tests,
        JsonTests::One(test) => vec![*test],
    })
}

/// Recursively load all `.toml` and `.json` test files from a directory.
///
/// Files that fail to parse are skipped with a warning. Entries are visited
/// in path order so the catalog order is stable.
pub fn load_catalog_directory(dir: &Path) -> Result<Vec<TestDefinition>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    let mut tests = Vec::new();
    for path in paths {
        if path.is_dir() {
            tests.extend(load_catalog_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            match parse_test_file(&path) {
                Ok(parsed) => tests.extend(parsed),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(tests)
}

/// Load a catalog from a single file or a directory.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let tests = if path.is_dir() {
        load_catalog_directory(path)?
    } else {
        parse_test_file(path)?
    };
    tracing::debug!("loaded {} test(s) from {}", tests.len(), path.display());
    Ok(Catalog::new(tests))
}

/// A warning from test validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The test the warning belongs to.
    pub test_id: Option<TestId>,
    /// The question (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a test for common authoring mistakes.
///
/// None of these stop scoring: unknown keys are ignored and profiles that
/// can never score simply report 0.
pub fn validate_test(test: &TestDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let warn = |question_id: Option<&str>, message: String| ValidationWarning {
        test_id: Some(test.id.clone()),
        question_id: question_id.map(str::to_string),
        message,
    };

    if test.questions.is_empty() {
        warnings.push(warn(None, "test has no questions".into()));
    }
    if test.result_profiles.is_empty() {
        warnings.push(warn(None, "test declares no result profiles".into()));
    }

    let mut seen_ids = HashSet::new();
    for question in &test.questions {
        if !seen_ids.insert(question.id.as_str()) {
            warnings.push(warn(
                Some(question.id.as_str()),
                format!("duplicate question ID: {}", question.id),
            ));
        }
    }

    for question in &test.questions {
        if question.options.is_empty() {
            warnings.push(warn(
                Some(question.id.as_str()),
                "question has no options".into(),
            ));
        }

        let mut reported = HashSet::new();
        for option in &question.options {
            for key in option.scores.keys() {
                if !test.result_profiles.contains_key(key) && reported.insert(key) {
                    warnings.push(warn(
                        Some(question.id.as_str()),
                        format!("option scores undeclared profile '{key}'"),
                    ));
                }
            }
        }
    }

    if !test.questions.is_empty() {
        for (key, profile) in &test.result_profiles {
            let attainable = test
                .questions
                .iter()
                .flat_map(|q| &q.options)
                .any(|o| o.points(key.as_str()) > 0);
            if !attainable {
                warnings.push(warn(
                    None,
                    format!(
                        "profile '{key}' ({}) cannot score above 0",
                        profile.name
                    ),
                ));
            }
        }
    }

    warnings
}

/// Validate every test in a catalog, including duplicate test ids.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for test in catalog.tests() {
        if !seen_ids.insert(&test.id) {
            warnings.push(ValidationWarning {
                test_id: Some(test.id.clone()),
                question_id: None,
                message: format!("duplicate test ID: {}", test.id),
            });
        }
    }

    for test in catalog.tests() {
        warnings.extend(validate_test(test));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r##"
[test]
id = "social_color"
name = "Social Color"
description = "Which color describes your social style?"
duration = "5 min"

[profiles.red]
name = "Red"
color = "#ef4444"
description = "Direct and results-oriented."

[profiles.blue]
name = "Blue"
color = "#3b82f6"
description = "Careful and analytical."

[[questions]]
id = "q1"
text = "At a party you usually..."

[[questions.options]]
text = "Lead the conversation"
scores = { red = 3 }

[[questions.options]]
text = "Listen and observe"
scores = { blue = 3 }

[[questions]]
id = "q2"
text = "Under pressure you..."

[[questions.options]]
text = "Decide quickly"
scores = { red = 2, blue = 1 }
"##;

    #[test]
    fn parse_valid_toml() {
        let test = parse_test_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(test.id, TestId::from("social_color"));
        assert_eq!(test.duration.as_deref(), Some("5 min"));
        assert_eq!(test.questions.len(), 2);
        assert_eq!(test.questions[1].options[0].points("blue"), 1);

        let keys: Vec<&str> = test.result_profiles.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["red", "blue"]);
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[test]
id = "minimal"
name = "Minimal"

[profiles.a]
name = "A"
"#;
        let test = parse_test_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert!(test.questions.is_empty());
        assert!(test.duration.is_none());
        assert_eq!(test.profile("a").unwrap().color, "#6b7280");
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_test_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn parse_json_array_and_single() {
        let single = r#"{"id": "one", "name": "One", "questions": [], "resultProfiles": {}}"#;
        let tests = parse_json_str(single, &PathBuf::from("one.json")).unwrap();
        assert_eq!(tests.len(), 1);

        let many = r#"[
            {"id": "one", "name": "One"},
            {"id": "two", "name": "Two"}
        ]"#;
        let tests = parse_json_str(many, &PathBuf::from("many.json")).unwrap();
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[1].id, TestId::from("two"));
    }

    #[test]
    fn load_directory_mixes_formats_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), VALID_TOML).unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            r#"[{"id": "json-test", "name": "Json"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not = [toml").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = load_catalog(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        let ids: Vec<&str> = catalog.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["social_color", "json-test"]);
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(load_catalog(&PathBuf::from("does-not-exist.toml")).is_err());
    }

    #[test]
    fn require_unknown_test_is_not_found() {
        let test = parse_test_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let catalog = Catalog::new(vec![test]);

        assert!(catalog.require(&TestId::from("social_color")).is_ok());
        let err = catalog.require(&TestId::from("belbin")).unwrap_err();
        assert!(matches!(err, CoreError::TestNotFound(ref id) if id.as_str() == "belbin"));
    }

    #[test]
    fn score_through_catalog() {
        let test = parse_test_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let catalog = Catalog::new(vec![test.clone()]);

        let mut answers = UserAnswers::new();
        answers.insert("q1".into(), test.questions[0].options[1].clone());
        answers.insert("q2".into(), test.questions[1].options[0].clone());

        let result = catalog
            .score(&TestId::from("social_color"), &answers)
            .unwrap();
        assert_eq!(result.test_name, "Social Color");
        // blue: 3 + 1 out of 3 + 1; red: 2 out of 3 + 2
        assert_eq!(result.scores[0].id.as_str(), "blue");
        assert_eq!(result.scores[0].score, 100.0);
        assert!((result.scores[1].score - 40.0).abs() < 1e-9);

        assert!(catalog.score(&TestId::from("nope"), &answers).is_err());
    }

    #[test]
    fn valid_test_has_no_warnings() {
        let test = parse_test_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert!(validate_test(&test).is_empty());
    }

    #[test]
    fn validate_reports_authoring_mistakes() {
        let toml = r#"
[test]
id = "broken"
name = "Broken"

[profiles.a]
name = "A"

[profiles.never]
name = "Never"

[[questions]]
id = "q1"
text = "One"

[[questions.options]]
text = "x"
scores = { a = 1, ghost = 2 }

[[questions.options]]
text = "y"
scores = { ghost = 1 }

[[questions]]
id = "q1"
text = "Duplicate"
"#;
        let test = parse_test_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_test(&test);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();

        assert!(messages.iter().any(|m| m.contains("duplicate question ID")));
        assert!(messages.iter().any(|m| m.contains("no options")));
        assert_eq!(
            messages
                .iter()
                .filter(|m| m.contains("undeclared profile 'ghost'"))
                .count(),
            1
        );
        assert!(messages.iter().any(|m| m.contains("'never'")));
    }

    #[test]
    fn validate_catalog_reports_duplicate_ids() {
        let test = parse_test_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let catalog = Catalog::new(vec![test.clone(), test]);
        let warnings = validate_catalog(&catalog);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("duplicate test ID")));
    }
}
