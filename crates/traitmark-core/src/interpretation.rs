//! Interpretation text for ranked scores.
//!
//! The built-in generator fills a fixed template from the dominant and, when
//! it is close enough, the secondary profile. A richer generator (for example
//! one backed by a language model) plugs in through [`Interpreter`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{ProfileKey, ResultProfile, Score, TestDefinition};

/// Default gap, in percentage points, under which the secondary profile is
/// mentioned alongside the dominant one.
pub const DEFAULT_SECONDARY_GAP: f64 = 15.0;

/// Text returned when there is nothing to interpret.
pub const FALLBACK_INTERPRETATION: &str = "The results could not be interpreted.";

const COMBINATION_NOTE: &str =
    "The combination of these two profiles can give you flexibility in complex situations.";

const CLOSING_NOTE: &str = "These results are a guide that reflects your current tendencies. \
Use them to explore your areas of development.";

/// Tunables for the template generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretationConfig {
    /// Maximum dominant/secondary distance for the secondary to be mentioned.
    #[serde(default = "default_secondary_gap")]
    pub secondary_gap: f64,
}

fn default_secondary_gap() -> f64 {
    DEFAULT_SECONDARY_GAP
}

impl Default for InterpretationConfig {
    fn default() -> Self {
        Self {
            secondary_gap: DEFAULT_SECONDARY_GAP,
        }
    }
}

/// Produces summary text for a ranked score list.
pub trait Interpreter: Send + Sync {
    /// Human-readable generator name (e.g. "template").
    fn name(&self) -> &str;

    /// Interpret `scores`, which are sorted highest first.
    fn interpret(&self, test: &TestDefinition, scores: &[Score]) -> String;
}

/// Deterministic template-based interpreter.
#[derive(Debug, Clone, Default)]
pub struct TemplateInterpreter {
    config: InterpretationConfig,
}

impl TemplateInterpreter {
    pub fn new(config: InterpretationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterpretationConfig {
        &self.config
    }
}

impl Interpreter for TemplateInterpreter {
    fn name(&self) -> &str {
        "template"
    }

    fn interpret(&self, test: &TestDefinition, scores: &[Score]) -> String {
        generate_interpretation_with(scores, &test.result_profiles, &self.config)
    }
}

/// Generate interpretation text with the default secondary gap.
pub fn generate_interpretation(
    scores: &[Score],
    profiles: &IndexMap<ProfileKey, ResultProfile>,
) -> String {
    generate_interpretation_with(scores, profiles, &InterpretationConfig::default())
}

/// Generate interpretation text for `scores` (sorted highest first).
///
/// Profile names are wrapped in `**bold**` markers. Scores whose key is
/// missing from `profiles` fall back to the name carried by the score.
pub fn generate_interpretation_with(
    scores: &[Score],
    profiles: &IndexMap<ProfileKey, ResultProfile>,
    config: &InterpretationConfig,
) -> String {
    let Some(dominant) = scores.first() else {
        return FALLBACK_INTERPRETATION.to_string();
    };

    let dominant_profile = profiles.get(&dominant.id);
    let name = dominant_profile.map_or(dominant.name.as_str(), |p| p.name.as_str());
    let description = dominant_profile.map_or("", |p| p.description.trim());

    let mut text = format!(
        "Your dominant profile is **{name}** ({:.0}%).",
        dominant.score
    );
    if !description.is_empty() {
        text.push(' ');
        text.push_str(description);
    }

    if let Some(secondary) = scores.get(1) {
        if dominant.score - secondary.score < config.secondary_gap {
            let secondary_name = profiles
                .get(&secondary.id)
                .map_or(secondary.name.as_str(), |p| p.name.as_str());
            text.push_str(&format!(
                "\n\nYou also show strong **{secondary_name}** traits ({:.0}%). {COMBINATION_NOTE}",
                secondary.score
            ));
        }
    }

    text.push_str("\n\n");
    text.push_str(CLOSING_NOTE);
    text
}

/// Fixed development suggestions for a profile.
pub fn development_suggestions(profile_name: &str) -> String {
    format!(
        "Suggestions for developing your **{profile_name}** profile:\n\n\
         - **Use your strengths:** think about which projects would make the most of your current abilities.\n\
         - **Build awareness:** keep the possible weak sides of this trait in mind, such as being overly critical or getting lost in details, and try to balance them.\n\
         - **Ask for feedback:** ask your teammates for constructive feedback on how you play this role."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles() -> IndexMap<ProfileKey, ResultProfile> {
        [
            ("plant", "Plant", "Creative and imaginative."),
            ("shaper", "Shaper", "Challenging and dynamic."),
            ("monitor", "Monitor Evaluator", "Sober and strategic."),
        ]
        .into_iter()
        .map(|(k, n, d)| {
            (
                ProfileKey::from(k),
                ResultProfile {
                    name: n.into(),
                    color: "#123456".into(),
                    description: d.into(),
                },
            )
        })
        .collect()
    }

    fn score(id: &str, name: &str, value: f64) -> Score {
        Score {
            id: ProfileKey::from(id),
            name: name.into(),
            color: "#123456".into(),
            score: value,
        }
    }

    #[test]
    fn empty_scores_fall_back() {
        assert_eq!(
            generate_interpretation(&[], &profiles()),
            FALLBACK_INTERPRETATION
        );
    }

    #[test]
    fn dominant_only_when_gap_is_large() {
        let scores = vec![score("plant", "Plant", 90.0), score("shaper", "Shaper", 40.0)];
        let text = generate_interpretation(&scores, &profiles());

        assert!(text.starts_with("Your dominant profile is **Plant** (90%)."));
        assert!(text.contains("Creative and imaginative."));
        assert!(!text.contains("Shaper"));
        assert!(text.ends_with(CLOSING_NOTE));
    }

    #[test]
    fn secondary_mentioned_within_gap() {
        let scores = vec![score("plant", "Plant", 80.0), score("shaper", "Shaper", 70.0)];
        let text = generate_interpretation(&scores, &profiles());
        assert!(text.contains("**Shaper**"));
        assert!(text.contains(COMBINATION_NOTE));
    }

    #[test]
    fn gap_of_exactly_threshold_is_not_close() {
        let scores = vec![score("plant", "Plant", 80.0), score("shaper", "Shaper", 65.0)];
        let text = generate_interpretation(&scores, &profiles());
        assert!(!text.contains("Shaper"));
    }

    #[test]
    fn single_profile_has_no_secondary() {
        let scores = vec![score("plant", "Plant", 50.0)];
        let text = generate_interpretation(&scores, &profiles());
        assert!(text.contains("**Plant**"));
        assert!(!text.contains(COMBINATION_NOTE));
    }

    #[test]
    fn custom_gap_is_respected() {
        let scores = vec![score("plant", "Plant", 80.0), score("shaper", "Shaper", 50.0)];
        let config = InterpretationConfig {
            secondary_gap: 40.0,
        };
        let text = generate_interpretation_with(&scores, &profiles(), &config);
        assert!(text.contains("**Shaper**"));
    }

    #[test]
    fn unknown_profile_uses_score_name() {
        let scores = vec![score("ghost", "Ghost", 60.0)];
        let text = generate_interpretation(&scores, &profiles());
        assert!(text.starts_with("Your dominant profile is **Ghost** (60%)."));
    }

    #[test]
    fn template_interpreter_is_deterministic() {
        let interpreter = TemplateInterpreter::default();
        let test = TestDefinition {
            id: "belbin".into(),
            name: "Belbin".into(),
            description: String::new(),
            duration: None,
            questions: vec![],
            result_profiles: profiles(),
        };
        let scores = vec![score("monitor", "Monitor Evaluator", 75.0)];
        assert_eq!(
            interpreter.interpret(&test, &scores),
            interpreter.interpret(&test, &scores)
        );
        assert_eq!(interpreter.name(), "template");
    }

    #[test]
    fn suggestions_name_the_profile() {
        let text = development_suggestions("Plant");
        assert!(text.starts_with("Suggestions for developing your **Plant** profile"));
        assert_eq!(text.matches("\n- ").count(), 3);
    }
}
