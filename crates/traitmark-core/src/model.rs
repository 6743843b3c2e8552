//! Core data model types for traitmark.
//!
//! These are the types every other crate builds on: test definitions with
//! their questions and result profiles, the answers a respondent gives, and
//! the immutable result record produced by a submission.

use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Identifier of a test in the catalog (e.g. "belbin").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestId(pub String);

impl TestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Key of a result profile within a test (e.g. "plant", "red").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileKey(pub String);

impl ProfileKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProfileKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for ProfileKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A psychometric test: questions, options, and the profiles they score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestDefinition {
    /// Unique identifier for this test.
    pub id: TestId,
    /// Human-readable name.
    pub name: String,
    /// What the test measures.
    #[serde(default)]
    pub description: String,
    /// Rough completion time shown to respondents (e.g. "10 min").
    #[serde(default)]
    pub duration: Option<String>,
    /// Questions in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Scoring categories in declaration order.
    #[serde(default, alias = "resultProfiles")]
    pub result_profiles: IndexMap<ProfileKey, ResultProfile>,
}

impl TestDefinition {
    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Look up a result profile by key.
    pub fn profile(&self, key: &str) -> Option<&ResultProfile> {
        self.result_profiles.get(key)
    }
}

/// A single question with mutually exclusive options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn option(&self, index: usize) -> Option<&QuestionOption> {
        self.options.get(index)
    }
}

/// An answer option and the points it awards per profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub text: String,
    /// Points per profile key. A missing key awards zero.
    #[serde(default)]
    pub scores: IndexMap<ProfileKey, u32>,
}

impl QuestionOption {
    /// Points this option awards to `key`.
    pub fn points(&self, key: &str) -> u32 {
        self.scores.get(key).copied().unwrap_or(0)
    }
}

/// Display metadata for a scoring category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultProfile {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

/// The option chosen for each answered question, keyed by question id.
pub type UserAnswers = IndexMap<String, QuestionOption>;

/// Selections by option index, keyed by question id.
///
/// This is the shape answers arrive in from files and forms; it resolves
/// against a test into [`UserAnswers`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet {
    selections: IndexMap<String, usize>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the zero-based option `index` for `question_id`, replacing any
    /// earlier selection.
    pub fn select(&mut self, question_id: impl Into<String>, index: usize) -> &mut Self {
        self.selections.insert(question_id.into(), index);
        self
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Resolve selections into the chosen options of `test`.
    pub fn resolve(&self, test: &TestDefinition) -> Result<UserAnswers, CoreError> {
        let mut answers = UserAnswers::with_capacity(self.selections.len());
        for (question_id, &index) in &self.selections {
            let question = test
                .question(question_id)
                .ok_or_else(|| CoreError::UnknownQuestion {
                    test_id: test.id.clone(),
                    question_id: question_id.clone(),
                })?;
            let option = question
                .option(index)
                .ok_or_else(|| CoreError::OptionOutOfRange {
                    question_id: question_id.clone(),
                    index,
                    available: question.options.len(),
                })?;
            answers.insert(question_id.clone(), option.clone());
        }
        Ok(answers)
    }
}

impl FromIterator<(String, usize)> for AnswerSheet {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self {
            selections: iter.into_iter().collect(),
        }
    }
}

/// Normalized attainment of one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Profile key.
    pub id: ProfileKey,
    /// Profile display name.
    pub name: String,
    /// Profile display color.
    pub color: String,
    /// Percentage in [0, 100].
    pub score: f64,
}

/// The immutable outcome of one completed test attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    #[serde(alias = "testId")]
    pub test_id: TestId,
    #[serde(alias = "testName")]
    pub test_name: String,
    /// Scores sorted by percentage, highest first.
    pub scores: Vec<Score>,
    /// Generated summary text.
    pub interpretation: String,
    pub submitted_at: DateTime<Utc>,
}

impl TestResult {
    /// The top-ranked score, if the test declared any profiles.
    pub fn dominant(&self) -> Option<&Score> {
        self.scores.first()
    }
}

/// A person whose results are stored. There is no authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Respondent {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub registered_at: DateTime<Utc>,
}

impl Respondent {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            registered_at: Utc::now(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
