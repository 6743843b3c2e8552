//! In-memory result repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use traitmark_core::error::CoreError;
use traitmark_core::model::{Respondent, TestResult};
use traitmark_core::traits::ResultRepository;

/// A repository that keeps everything in process memory.
///
/// Useful for tests and for one-shot scoring where nothing needs to
/// outlive the process.
#[derive(Default)]
pub struct MemoryRepository {
    respondents: RwLock<Vec<Respondent>>,
    results: RwLock<HashMap<Uuid, Vec<TestResult>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored results across all respondents.
    pub async fn result_count(&self) -> usize {
        self.results.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl ResultRepository for MemoryRepository {
    fn name(&self) -> &str {
        "memory"
    }

    async fn register_respondent(&self, respondent: &Respondent) -> anyhow::Result<()> {
        let mut respondents = self.respondents.write().await;
        if respondents.iter().any(|r| r.id == respondent.id) {
            anyhow::bail!("respondent {} is already registered", respondent.id);
        }
        respondents.push(respondent.clone());
        Ok(())
    }

    async fn respondent(&self, id: Uuid) -> anyhow::Result<Option<Respondent>> {
        Ok(self
            .respondents
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn respondents(&self) -> anyhow::Result<Vec<Respondent>> {
        Ok(self.respondents.read().await.clone())
    }

    async fn append_result(&self, respondent_id: Uuid, result: &TestResult) -> anyhow::Result<()> {
        if self.respondent(respondent_id).await?.is_none() {
            return Err(CoreError::RespondentNotFound(respondent_id).into());
        }
        self.results
            .write()
            .await
            .entry(respondent_id)
            .or_default()
            .push(result.clone());
        Ok(())
    }

    async fn results_for(&self, respondent_id: Uuid) -> anyhow::Result<Vec<TestResult>> {
        Ok(self
            .results
            .read()
            .await
            .get(&respondent_id)
            .cloned()
            .unwrap_or_default())
    }
}
