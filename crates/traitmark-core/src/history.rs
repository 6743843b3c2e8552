//! Result history ordering and aggregate statistics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Respondent, TestId, TestResult};

/// Sort results so the most recent submission comes first.
///
/// `results` is expected in submission order. Results with equal
/// timestamps end up latest-submitted first.
pub fn sort_newest_first(results: &mut [TestResult]) {
    results.reverse();
    results.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
}

/// Aggregate counts across every respondent's history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Number of registered respondents.
    pub respondents: usize,
    /// Number of stored results.
    pub total_results: usize,
    /// Completions per test, most completed first.
    pub per_test: Vec<TestCompletion>,
}

/// How often one test was completed, and which profiles came out on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCompletion {
    pub test_id: TestId,
    pub test_name: String,
    pub count: usize,
    /// Dominant-profile counts, most frequent first.
    pub dominant_profiles: Vec<ProfileCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCount {
    pub profile: String,
    pub count: usize,
}

impl HistoryStats {
    /// Compute statistics from every respondent and their results.
    pub fn compute(histories: &[(Respondent, Vec<TestResult>)]) -> Self {
        let mut per_test: HashMap<&TestId, (&str, usize, HashMap<&str, usize>)> = HashMap::new();
        let mut total_results = 0usize;

        for (_, results) in histories {
            total_results += results.len();
            for result in results {
                let entry = per_test
                    .entry(&result.test_id)
                    .or_insert_with(|| (result.test_name.as_str(), 0, HashMap::new()));
                entry.1 += 1;
                if let Some(dominant) = result.dominant() {
                    *entry.2.entry(dominant.name.as_str()).or_insert(0) += 1;
                }
            }
        }

        let mut per_test: Vec<TestCompletion> = per_test
            .into_iter()
            .map(|(test_id, (test_name, count, dominants))| {
                let mut dominant_profiles: Vec<ProfileCount> = dominants
                    .into_iter()
                    .map(|(profile, count)| ProfileCount {
                        profile: profile.to_string(),
                        count,
                    })
                    .collect();
                dominant_profiles
                    .sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.profile.cmp(&b.profile)));
                TestCompletion {
                    test_id: test_id.clone(),
                    test_name: test_name.to_string(),
                    count,
                    dominant_profiles,
                }
            })
            .collect();
        per_test.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.test_name.cmp(&b.test_name))
        });

        Self {
            respondents: histories.len(),
            total_results,
            per_test,
        }
    }
}
