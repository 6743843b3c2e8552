//! JSON-file result repository.
//!
//! Layout under the root directory:
//!
//! ```text
//! respondents.json             array of respondents, registration order
//! results/<respondent-id>.json array of results, submission order
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use traitmark_core::error::CoreError;
use traitmark_core::model::{Respondent, TestResult};
use traitmark_core::traits::ResultRepository;

const RESPONDENTS_FILE: &str = "respondents.json";
const RESULTS_DIR: &str = "results";

/// A repository that persists to pretty-printed JSON files.
pub struct JsonFileRepository {
    root: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    /// Open a repository rooted at `root`. Directories are created on first
    /// write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn respondents_path(&self) -> PathBuf {
        self.root.join(RESPONDENTS_FILE)
    }

    fn results_path(&self, respondent_id: Uuid) -> PathBuf {
        self.root
            .join(RESULTS_DIR)
            .join(format!("{respondent_id}.json"))
    }
}

/// Read a JSON array, treating a missing file as empty.
async fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

async fn write_list<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(items)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

#[async_trait]
impl ResultRepository for JsonFileRepository {
    fn name(&self) -> &str {
        "json"
    }

    async fn register_respondent(&self, respondent: &Respondent) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.respondents_path();
        let mut respondents: Vec<Respondent> = read_list(&path).await?;
        if respondents.iter().any(|r| r.id == respondent.id) {
            anyhow::bail!("respondent {} is already registered", respondent.id);
        }
        respondents.push(respondent.clone());
        write_list(&path, &respondents).await?;
        tracing::debug!("wrote {} respondent(s) to {}", respondents.len(), path.display());
        Ok(())
    }

    async fn respondent(&self, id: Uuid) -> anyhow::Result<Option<Respondent>> {
        let respondents: Vec<Respondent> = read_list(&self.respondents_path()).await?;
        Ok(respondents.into_iter().find(|r| r.id == id))
    }

    async fn respondents(&self) -> anyhow::Result<Vec<Respondent>> {
        read_list(&self.respondents_path()).await
    }

    async fn append_result(&self, respondent_id: Uuid, result: &TestResult) -> anyhow::Result<()> {
        if self.respondent(respondent_id).await?.is_none() {
            return Err(CoreError::RespondentNotFound(respondent_id).into());
        }

        let _guard = self.write_lock.lock().await;
        let path = self.results_path(respondent_id);
        let mut results: Vec<TestResult> = read_list(&path).await?;
        results.push(result.clone());
        write_list(&path, &results).await?;
        tracing::debug!("appended result to {}", path.display());
        Ok(())
    }

    async fn results_for(&self, respondent_id: Uuid) -> anyhow::Result<Vec<TestResult>> {
        read_list(&self.results_path(respondent_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use traitmark_core::model::{ProfileKey, Score, TestId};

    fn result(day: u32) -> TestResult {
        TestResult {
            test_id: TestId::from("color"),
            test_name: "Color Profile".into(),
            scores: vec![Score {
                id: ProfileKey::from("red"),
                name: "Red".into(),
                color: "#ef4444".into(),
                score: 66.67,
            }],
            interpretation: "Your dominant profile is **Red** (67%).".into(),
            submitted_at: Utc.with_ymd_and_hms(2024, 5, day, 9, 30, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn empty_root_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("data"));
        assert!(repo.respondents().await.unwrap().is_empty());
        assert!(repo.results_for(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let ada = Respondent::new("Ada", "Lovelace");

        {
            let repo = JsonFileRepository::new(dir.path());
            repo.register_respondent(&ada).await.unwrap();
            repo.append_result(ada.id, &result(1)).await.unwrap();
            repo.append_result(ada.id, &result(2)).await.unwrap();
        }

        let repo = JsonFileRepository::new(dir.path());
        assert_eq!(repo.respondent(ada.id).await.unwrap(), Some(ada.clone()));
        assert_eq!(
            repo.results_for(ada.id).await.unwrap(),
            vec![result(1), result(2)]
        );

        let file = dir.path().join("results").join(format!("{}.json", ada.id));
        let raw = std::fs::read_to_string(file).unwrap();
        assert!(raw.contains("\n  {"), "expected pretty-printed JSON");
    }

    #[tokio::test]
    async fn unknown_respondent_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        let err = repo
            .append_result(Uuid::new_v4(), &result(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::RespondentNotFound(_))
        ));
        assert!(!dir.path().join("results").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RESPONDENTS_FILE), "not json").unwrap();
        let repo = JsonFileRepository::new(dir.path());
        let err = repo.respondents().await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse"));
    }
}
