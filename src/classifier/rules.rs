//! Prioritized classification rules.
//!
//! Every signal is computed up front by an independent pure predicate. The
//! [`RULES`] table then maps signals to categories in strict priority order;
//! the first rule that matches decides the category and anything unmatched is
//! [`ResponseType::Normal`].

use super::gibberish;
use super::lexicon::{
    any_match, DomainLexicon, ACKNOWLEDGEMENTS, CHIT_CHAT_PATTERN, CLOSURE_PATTERNS,
    DISAGREEMENT_PATTERNS, FILLER_PATTERN, FRUSTRATION_PATTERNS, INAPPROPRIATE_PATTERN, INTERFACE_PATTERN,
    INTERROGATIVES, REASONING_PATTERN, STRUCTURE_PATTERN,
};
use super::normalize::NormalizedText;
use super::types::{DisagreementKind, ResponseType};
use crate::config::ClassifierConfig;

/// Fewer visible characters than this is minimal input.
pub const MINIMAL_VISIBLE_CHARS: usize = 3;

/// Every signal derived from one learner response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signals {
    pub is_empty: bool,
    pub is_minimal_input: bool,
    pub is_gibberish: bool,
    pub is_question: bool,
    pub is_domain_question: bool,
    pub is_system_question: bool,
    pub is_disagreement: bool,
    pub is_inappropriate: bool,
    pub is_off_topic: bool,
    pub is_frustrated: bool,
    pub wants_to_end: bool,
    pub has_concrete_idea: bool,
    pub keywords: Vec<String>,
    pub disagreement_kind: Option<DisagreementKind>,
}

impl Signals {
    /// Evaluate every predicate against normalized text.
    pub fn evaluate(text: &NormalizedText, lexicon: &DomainLexicon, config: &ClassifierConfig) -> Self {
        let is_empty = text.lower.is_empty();
        if is_empty {
            return Self {
                is_empty,
                ..Self::default()
            };
        }

        let keywords = lexicon.keywords(text);
        let has_domain = !keywords.is_empty();
        let is_question = is_question(text);
        let is_disagreement = any_match(&DISAGREEMENT_PATTERNS, &text.lower);

        Self {
            is_empty,
            is_minimal_input: is_minimal_input(text),
            is_gibberish: gibberish::is_gibberish(text, config),
            is_question,
            is_domain_question: is_question && has_domain,
            is_system_question: is_question && INTERFACE_PATTERN.is_match(&text.lower),
            is_disagreement,
            is_inappropriate: INAPPROPRIATE_PATTERN.is_match(&text.lower),
            is_off_topic: !has_domain && CHIT_CHAT_PATTERN.is_match(&text.lower),
            is_frustrated: any_match(&FRUSTRATION_PATTERNS, &text.lower),
            wants_to_end: any_match(&CLOSURE_PATTERNS, &text.lower),
            has_concrete_idea: has_domain
                && REASONING_PATTERN.is_match(&text.lower)
                && text.word_count() >= config.concrete_idea_min_words,
            disagreement_kind: is_disagreement.then(|| disagreement_kind(text, has_domain)),
            keywords,
        }
    }
}

/// Ends with a question mark or opens with an interrogative word.
pub fn is_question(text: &NormalizedText) -> bool {
    text.lower.ends_with('?')
        || text
            .first_word()
            .is_some_and(|word| INTERROGATIVES.contains(&word))
}

/// Very short input, a bare acknowledgement or a drawn-out "hmmm".
pub fn is_minimal_input(text: &NormalizedText) -> bool {
    let visible = text.visible_len();
    if visible == 0 {
        return false;
    }
    let bare = text.lower.trim_end_matches('.');
    visible < MINIMAL_VISIBLE_CHARS || ACKNOWLEDGEMENTS.contains(&bare) || FILLER_PATTERN.is_match(bare)
}

fn disagreement_kind(text: &NormalizedText, has_domain: bool) -> DisagreementKind {
    if STRUCTURE_PATTERN.is_match(&text.lower) {
        DisagreementKind::Structure
    } else if has_domain {
        DisagreementKind::Content
    } else {
        DisagreementKind::General
    }
}

/// A tagged classification rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Category assigned when the rule matches.
    pub response_type: ResponseType,
    /// What the rule looks for.
    pub description: &'static str,
    /// Pure predicate over the computed signals.
    pub matches: fn(&Signals) -> bool,
}

/// Classification rules in priority order. [`ResponseType::Normal`] is the fallback.
pub static RULES: [Rule; 11] = [
    Rule {
        response_type: ResponseType::Empty,
        description: "empty or whitespace-only",
        matches: rule_empty,
    },
    Rule {
        response_type: ResponseType::MinimalInput,
        description: "fewer than three visible characters or a bare acknowledgement",
        matches: rule_minimal_input,
    },
    Rule {
        response_type: ResponseType::Gibberish,
        description: "keyboard mashing, repeats, vowel-poor or symbol-only text",
        matches: rule_gibberish,
    },
    Rule {
        response_type: ResponseType::InappropriateLanguage,
        description: "insults or profanity",
        matches: rule_inappropriate,
    },
    Rule {
        response_type: ResponseType::DomainQuestion,
        description: "question mentioning a task concept",
        matches: rule_domain_question,
    },
    Rule {
        response_type: ResponseType::SystemQuestion,
        description: "question about the mapping interface",
        matches: rule_system_question,
    },
    Rule {
        response_type: ResponseType::Disagreement,
        description: "negation with evaluative markers",
        matches: rule_disagreement,
    },
    Rule {
        response_type: ResponseType::OffTopic,
        description: "chit-chat without task concepts",
        matches: rule_off_topic,
    },
    Rule {
        response_type: ResponseType::Frustration,
        description: "difficulty or negative affect",
        matches: rule_frustration,
    },
    Rule {
        response_type: ResponseType::PrematureEnding,
        description: "closure markers",
        matches: rule_premature_ending,
    },
    Rule {
        response_type: ResponseType::ConcreteIdea,
        description: "reasoning connector with a task concept",
        matches: rule_concrete_idea,
    },
];

fn rule_empty(s: &Signals) -> bool {
    s.is_empty
}

fn rule_minimal_input(s: &Signals) -> bool {
    s.is_minimal_input
}

fn rule_gibberish(s: &Signals) -> bool {
    s.is_gibberish
}

fn rule_inappropriate(s: &Signals) -> bool {
    s.is_inappropriate
}

fn rule_domain_question(s: &Signals) -> bool {
    s.is_domain_question
}

fn rule_system_question(s: &Signals) -> bool {
    s.is_system_question
}

fn rule_disagreement(s: &Signals) -> bool {
    s.is_disagreement
}

fn rule_off_topic(s: &Signals) -> bool {
    s.is_off_topic
}

fn rule_frustration(s: &Signals) -> bool {
    s.is_frustrated
}

fn rule_premature_ending(s: &Signals) -> bool {
    s.wants_to_end
}

fn rule_concrete_idea(s: &Signals) -> bool {
    s.has_concrete_idea
}

/// Category of the first matching rule.
pub fn first_match(signals: &Signals) -> ResponseType {
    RULES
        .iter()
        .find(|rule| (rule.matches)(signals))
        .map(|rule| rule.response_type)
        .unwrap_or(ResponseType::Normal)
}

/// Full priority order, fallback last.
pub fn priority_order() -> Vec<ResponseType> {
    RULES
        .iter()
        .map(|rule| rule.response_type)
        .chain(std::iter::once(ResponseType::Normal))
        .collect()
}
