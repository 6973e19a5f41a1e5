//! Learner-response classification.
//!
//! [`ResponseClassifier::classify`] is total: any input yields exactly one
//! [`ResponseType`] plus auxiliary flags. Rules live in [`RULES`] and are
//! evaluated in priority order.

mod gibberish;
mod lexicon;
mod normalize;
mod rules;
mod types;

pub use gibberish::{is_gibberish_token, vowel_ratio};
pub use lexicon::{DomainLexicon, ACKNOWLEDGEMENTS, DEFAULT_DOMAIN_KEYWORDS, INTERROGATIVES};
pub use normalize::NormalizedText;
pub use rules::{first_match, priority_order, Rule, Signals, MINIMAL_VISIBLE_CHARS, RULES};
pub use types::*;

use serde_json::Value;
use tracing::debug;

use crate::config::ClassifierConfig;

/// Classifies free-text learner responses.
#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    config: ClassifierConfig,
    lexicon: DomainLexicon,
}

impl ResponseClassifier {
    /// Create a classifier with default thresholds and the built-in lexicon.
    pub fn new() -> Self {
        Self::with_config(ClassifierConfig::default())
    }

    /// Create a classifier from configuration.
    pub fn with_config(config: ClassifierConfig) -> Self {
        let lexicon = DomainLexicon::new(&config.extra_domain_keywords);
        Self { config, lexicon }
    }

    /// Classify a learner response.
    pub fn classify(&self, text: &str) -> ResponseAnalysis {
        let normalized = NormalizedText::new(text);
        let signals = Signals::evaluate(&normalized, &self.lexicon, &self.config);
        let response_type = first_match(&signals);

        debug!(
            response_type = %response_type,
            keywords = ?signals.keywords,
            "Classified learner response"
        );

        ResponseAnalysis {
            response_type,
            is_empty: signals.is_empty,
            is_minimal_input: signals.is_minimal_input,
            is_gibberish: signals.is_gibberish,
            is_question: signals.is_question,
            is_domain_question: signals.is_domain_question,
            is_system_question: signals.is_system_question,
            is_disagreement: signals.is_disagreement,
            is_inappropriate: signals.is_inappropriate,
            is_off_topic: signals.is_off_topic,
            is_frustrated: signals.is_frustrated,
            wants_to_end: signals.wants_to_end,
            has_concrete_idea: signals.has_concrete_idea,
            requires_pattern_response: response_type.requires_pattern_response(),
            keywords: signals.keywords,
            disagreement_kind: signals.disagreement_kind,
        }
    }

    /// Classify a JSON value, coercing non-strings to text (`null` is empty).
    pub fn classify_value(&self, value: &Value) -> ResponseAnalysis {
        self.classify(&coerce_text(value))
    }

    /// Domain lexicon in use.
    pub fn lexicon(&self) -> &DomainLexicon {
        &self.lexicon
    }
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Textual form of an arbitrary JSON value.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
