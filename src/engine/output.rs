use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::{ConversationState, RoundPhase};
use crate::classifier::ResponseType;
use crate::types::{Intensity, ScaffoldingType};

/// Round status reported with each engine output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    /// The learner is expected to reply.
    Active,
    /// The round has ended.
    Concluded,
    /// No round is running.
    Inactive,
}

impl RoundStatus {
    /// Get the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundStatus::Active => "active",
            RoundStatus::Concluded => "concluded",
            RoundStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<RoundPhase> for RoundStatus {
    fn from(phase: RoundPhase) -> Self {
        match phase {
            RoundPhase::Idle => RoundStatus::Inactive,
            RoundPhase::RoundActive => RoundStatus::Active,
            RoundPhase::Concluded => RoundStatus::Concluded,
        }
    }
}

/// What the engine hands back to the UI after each call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutput {
    /// Round status after the call.
    pub status: RoundStatus,
    /// Scaffolding type of the round.
    pub scaffolding_type: Option<ScaffoldingType>,
    /// Scaffolding intensity of the round.
    pub scaffolding_intensity: Option<Intensity>,
    /// Agent messages emitted by this call, in display order.
    pub prompts: Vec<String>,
    /// Classification of the learner response, when one was processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    /// Reply to the learner response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
    /// Whether the learner is expected to answer.
    pub needs_follow_up: bool,
    /// Closing remark, when the round concluded on this call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
}

impl EngineOutput {
    /// Output for a call that changed nothing.
    pub fn unchanged(state: &ConversationState) -> Self {
        Self {
            status: state.phase.into(),
            scaffolding_type: state.scaffolding_type,
            scaffolding_intensity: state.scaffolding_intensity,
            prompts: Vec::new(),
            response_type: None,
            follow_up: None,
            needs_follow_up: false,
            conclusion: None,
        }
    }
}
