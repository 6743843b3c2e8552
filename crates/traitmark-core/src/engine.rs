//! Result assembly and the submission engine.
//!
//! [`assemble_result`] is the pure composition of scoring and
//! interpretation. [`SubmissionEngine`] adds catalog lookup and hands the
//! finished record to an injected [`ResultRepository`].

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::history::{sort_newest_first, HistoryStats};
use crate::interpretation::{Interpreter, TemplateInterpreter};
use crate::model::{AnswerSheet, Respondent, TestDefinition, TestId, TestResult, UserAnswers};
use crate::scoring::compute_scores;
use crate::traits::ResultRepository;

/// Score and interpret `answers`, stamped with the current time.
pub fn assemble_result(test: &TestDefinition, answers: &UserAnswers) -> TestResult {
    assemble_result_at(test, answers, Utc::now())
}

/// Score and interpret `answers` with an explicit submission time.
pub fn assemble_result_at(
    test: &TestDefinition,
    answers: &UserAnswers,
    submitted_at: DateTime<Utc>,
) -> TestResult {
    assemble_with(test, answers, &TemplateInterpreter::default(), submitted_at)
}

/// Score `answers` and interpret them with `interpreter`.
pub fn assemble_with(
    test: &TestDefinition,
    answers: &UserAnswers,
    interpreter: &dyn Interpreter,
    submitted_at: DateTime<Utc>,
) -> TestResult {
    let scores = compute_scores(test, answers);
    let interpretation = interpreter.interpret(test, &scores);

    TestResult {
        test_id: test.id.clone(),
        test_name: test.name.clone(),
        scores,
        interpretation,
        submitted_at,
    }
}

/// Orchestrates submissions against a catalog and a result repository.
pub struct SubmissionEngine {
    catalog: Arc<Catalog>,
    interpreter: Arc<dyn Interpreter>,
    repository: Arc<dyn ResultRepository>,
}

impl SubmissionEngine {
    /// Create an engine using the template interpreter.
    pub fn new(catalog: Arc<Catalog>, repository: Arc<dyn ResultRepository>) -> Self {
        Self {
            catalog,
            interpreter: Arc::new(TemplateInterpreter::default()),
            repository,
        }
    }

    /// Replace the interpreter.
    pub fn with_interpreter(mut self, interpreter: Arc<dyn Interpreter>) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Register a new respondent.
    pub async fn register(&self, first_name: &str, last_name: &str) -> Result<Respondent> {
        let respondent = Respondent::new(first_name, last_name);
        self.repository.register_respondent(&respondent).await?;
        tracing::info!(
            "registered respondent {} via {}",
            respondent.id,
            self.repository.name()
        );
        Ok(respondent)
    }

    /// Score `answers` for `test_id`, persist the result for the respondent,
    /// and return it.
    pub async fn submit(
        &self,
        respondent_id: Uuid,
        test_id: &TestId,
        answers: &UserAnswers,
    ) -> Result<TestResult> {
        let test = self.catalog.require(test_id)?;
        self.respondent(respondent_id).await?;

        if answers.len() < test.questions.len() {
            tracing::debug!(
                "partial submission for '{}': {}/{} questions answered",
                test_id,
                answers.len(),
                test.questions.len()
            );
        }

        let result = assemble_with(test, answers, self.interpreter.as_ref(), Utc::now());
        self.repository.append_result(respondent_id, &result).await?;

        tracing::info!(
            "stored '{}' result for {} (dominant: {})",
            test_id,
            respondent_id,
            result.dominant().map_or("-", |s| s.name.as_str())
        );
        Ok(result)
    }

    /// Resolve an answer sheet against the test and submit it.
    pub async fn submit_sheet(
        &self,
        respondent_id: Uuid,
        test_id: &TestId,
        sheet: &AnswerSheet,
    ) -> Result<TestResult> {
        let test = self.catalog.require(test_id)?;
        let answers = sheet.resolve(test)?;
        self.submit(respondent_id, test_id, &answers).await
    }

    /// A respondent's results, newest first.
    pub async fn history(&self, respondent_id: Uuid) -> Result<Vec<TestResult>> {
        self.respondent(respondent_id).await?;
        let mut results = self.repository.results_for(respondent_id).await?;
        sort_newest_first(&mut results);
        Ok(results)
    }

    /// Every respondent in registration order, with their results in
    /// submission order.
    pub async fn histories(&self) -> Result<Vec<(Respondent, Vec<TestResult>)>> {
        let mut histories = Vec::new();
        for respondent in self.repository.respondents().await? {
            let results = self.repository.results_for(respondent.id).await?;
            histories.push((respondent, results));
        }
        Ok(histories)
    }

    /// Aggregate statistics across all respondents.
    pub async fn stats(&self) -> Result<HistoryStats> {
        Ok(HistoryStats::compute(&self.histories().await?))
    }

    /// Look up a registered respondent, failing with
    /// [`CoreError::RespondentNotFound`].
    pub async fn respondent(&self, respondent_id: Uuid) -> Result<Respondent> {
        self.repository
            .respondent(respondent_id)
            .await?
            .ok_or_else(|| CoreError::RespondentNotFound(respondent_id).into())
    }
}
