//! Scoring engine.
//!
//! Sums the points of the chosen options per profile, normalizes each total
//! against the best attainable total for that profile, and ranks profiles by
//! the resulting percentage.

use crate::model::{Score, TestDefinition, UserAnswers};

/// Compute ranked per-profile percentages for a set of answers.
///
/// The attainable maximum for a profile is the sum, over all questions, of
/// the highest value any single option of that question offers. Options are
/// mutually exclusive, so adding up every option would overstate it.
///
/// - Unanswered questions contribute nothing.
/// - Option keys that are not declared profiles are ignored.
/// - A profile no option can score gets 0, never NaN.
///
/// The result holds one entry per declared profile, sorted by score
/// descending. The sort is stable, so ties keep declaration order.
pub fn compute_scores(test: &TestDefinition, answers: &UserAnswers) -> Vec<Score> {
    let profile_count = test.result_profiles.len();
    let mut totals = vec![0u64; profile_count];
    let mut max_totals = vec![0u64; profile_count];

    for question in &test.questions {
        for (idx, key) in test.result_profiles.keys().enumerate() {
            let best = question
                .options
                .iter()
                .map(|option| option.points(key.as_str()))
                .max()
                .unwrap_or(0);
            max_totals[idx] += u64::from(best);
        }
    }

    // Each answer counts once, even if the test repeats a question id.
    let mut stray = 0usize;
    for (question_id, option) in answers {
        if test.question(question_id).is_none() {
            stray += 1;
            continue;
        }
        for (key, &points) in &option.scores {
            if let Some(idx) = test.result_profiles.get_index_of(key) {
                totals[idx] += u64::from(points);
            }
        }
    }
    if stray > 0 {
        tracing::debug!(
            "ignoring {stray} answer(s) for questions not in test '{}'",
            test.id
        );
    }

    let mut scores: Vec<Score> = test
        .result_profiles
        .iter()
        .enumerate()
        .map(|(idx, (key, profile))| Score {
            id: key.clone(),
            name: profile.name.clone(),
            color: profile.color.clone(),
            score: percentage(totals[idx], max_totals[idx]),
        })
        .collect();

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores
}

fn percentage(total: u64, max: u64) -> f64 {
    if max == 0 {
        return 0.0;
    }
    // An answer may carry an option that is not one of the question's own.
    (total as f64 / max as f64 * 100.0).clamp(0.0, 100.0)
}
