//! Injected rule configuration.
//!
//! Pattern and suggestion tables are data, not code: a locale's rule set is
//! loaded from JSON and handed to the analyzer, so the detection engine
//! carries no language content of its own and can be tested against any
//! rule set.

use serde::{Deserialize, Serialize};
use toego_domain::MarkCategory;

/// A literal pattern with a rationale and an optional replacement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    /// Literal text to search for
    pub pattern: String,
    /// Rationale shown to the reviewer
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl PatternRule {
    pub fn new(pattern: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            note: note.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// A direct string substitution: orthography, punctuation duplication,
/// loanword standardization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub find: String,
    pub replace: String,
    pub category: MarkCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Correction {
    pub fn new(
        find: impl Into<String>,
        replace: impl Into<String>,
        category: MarkCategory,
    ) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            category,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// The full rule set for one locale.
///
/// Every table defaults to empty, so a partial JSON document is a valid
/// configuration and an empty config makes the table-driven detectors
/// silent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Stock phrases to flag (line edit)
    pub cliches: Vec<PatternRule>,
    /// Translationese constructions to flag (line edit)
    pub translation_patterns: Vec<PatternRule>,
    /// Emotion words that tell rather than show (line edit)
    pub emotion_words: Vec<PatternRule>,
    /// Direct substitutions (copy edit)
    pub corrections: Vec<Correction>,
    /// Double passive / double causative constructions (copy edit)
    pub grammar_patterns: Vec<PatternRule>,
    /// Particles checked for in-sentence repetition (proofreading)
    pub particles: Vec<String>,
}

impl RuleConfig {
    /// Load a rule set from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
