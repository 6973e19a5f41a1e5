use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Interaction category of a learner response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Nothing but whitespace.
    Empty,
    /// A bare acknowledgement or a couple of characters.
    MinimalInput,
    /// Keyboard mashing or other non-language input.
    Gibberish,
    /// Insults or profanity.
    InappropriateLanguage,
    /// A question about the subject matter.
    DomainQuestion,
    /// A question about the mapping tool.
    SystemQuestion,
    /// The learner pushes back on a prompt.
    Disagreement,
    /// Chit-chat unrelated to the task.
    OffTopic,
    /// The learner signals difficulty.
    Frustration,
    /// The learner wants to stop the round.
    PrematureEnding,
    /// A reasoned statement about the domain.
    ConcreteIdea,
    /// Anything else.
    Normal,
}

impl ResponseType {
    /// Get the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Empty => "empty",
            ResponseType::MinimalInput => "minimal_input",
            ResponseType::Gibberish => "gibberish",
            ResponseType::InappropriateLanguage => "inappropriate_language",
            ResponseType::DomainQuestion => "domain_question",
            ResponseType::SystemQuestion => "system_question",
            ResponseType::Disagreement => "disagreement",
            ResponseType::OffTopic => "off_topic",
            ResponseType::Frustration => "frustration",
            ResponseType::PrematureEnding => "premature_ending",
            ResponseType::ConcreteIdea => "concrete_idea",
            ResponseType::Normal => "normal",
        }
    }

    /// Whether the response is routed to a pattern handler instead of the template bank.
    pub fn requires_pattern_response(&self) -> bool {
        !matches!(
            self,
            ResponseType::MinimalInput | ResponseType::ConcreteIdea | ResponseType::Normal
        )
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "empty" | "empty_input" => Ok(ResponseType::Empty),
            "minimal_input" => Ok(ResponseType::MinimalInput),
            "gibberish" => Ok(ResponseType::Gibberish),
            "inappropriate_language" => Ok(ResponseType::InappropriateLanguage),
            "domain_question" => Ok(ResponseType::DomainQuestion),
            "system_question" => Ok(ResponseType::SystemQuestion),
            "disagreement" => Ok(ResponseType::Disagreement),
            "off_topic" => Ok(ResponseType::OffTopic),
            "frustration" => Ok(ResponseType::Frustration),
            "premature_ending" => Ok(ResponseType::PrematureEnding),
            "concrete_idea" => Ok(ResponseType::ConcreteIdea),
            "normal" => Ok(ResponseType::Normal),
            _ => Err(format!("Unknown response type: {}", s)),
        }
    }
}

/// What a disagreement is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisagreementKind {
    /// Objects to the subject matter.
    Content,
    /// Objects to how the map is organized.
    Structure,
    /// Unspecified objection.
    General,
}

/// Classification result for one learner response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseAnalysis {
    /// The single category chosen by rule priority.
    pub response_type: ResponseType,
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
    pub requires_pattern_response: bool,
    /// Domain keywords in order of appearance.
    pub keywords: Vec<String>,
    /// Set when disagreement markers are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disagreement_kind: Option<DisagreementKind>,
}
