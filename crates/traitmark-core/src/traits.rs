//! Core trait definitions for result storage.
//!
//! The scoring core never touches storage itself. Whatever backend holds
//! respondents and their histories implements [`ResultRepository`] and is
//! injected into the [`SubmissionEngine`](crate::engine::SubmissionEngine).
//! In-memory and JSON-file implementations live in `traitmark-store`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{Respondent, TestResult};

/// Trait for backends that persist respondents and their result histories.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Human-readable backend name (e.g. "memory", "json").
    fn name(&self) -> &str;

    /// Store a new respondent.
    async fn register_respondent(&self, respondent: &Respondent) -> anyhow::Result<()>;

    /// Look up a respondent by id.
    async fn respondent(&self, id: Uuid) -> anyhow::Result<Option<Respondent>>;

    /// All respondents in registration order.
    async fn respondents(&self) -> anyhow::Result<Vec<Respondent>>;

    /// Append a result to a respondent's history.
    ///
    /// Fails with [`CoreError::RespondentNotFound`](crate::error::CoreError)
    /// if the respondent was never registered.
    async fn append_result(&self, respondent_id: Uuid, result: &TestResult)
        -> anyhow::Result<()>;

    /// A respondent's results in submission order. Unknown respondents have
    /// an empty history.
    async fn results_for(&self, respondent_id: Uuid) -> anyhow::Result<Vec<TestResult>>;
}
