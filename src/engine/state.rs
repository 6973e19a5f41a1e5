use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analyzer::MapContext;
use crate::classifier::ResponseType;
use crate::types::{Intensity, ScaffoldingType};

/// Turns per round.
pub const MAX_TURNS: u32 = 5;

/// Average response length above which the next round is less directive.
pub const LONG_RESPONSE_CHARS: f64 = 150.0;

/// Average response length below which the next round is more directive.
pub const SHORT_RESPONSE_CHARS: f64 = 50.0;

/// Lifecycle phase of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// No round has been started.
    #[default]
    Idle,
    /// Accepting learner responses.
    RoundActive,
    /// Terminal; a closing remark has been issued.
    Concluded,
}

impl RoundPhase {
    /// Get the phase name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Idle => "idle",
            RoundPhase::RoundActive => "round_active",
            RoundPhase::Concluded => "concluded",
        }
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One exchange in a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The agent message the learner answered.
    pub agent_message: String,
    /// The learner's response, trimmed.
    pub user_response: String,
    /// Zero-based turn of the response.
    pub turn: u32,
    /// How the response was classified.
    pub response_type: ResponseType,
    /// When the response was processed.
    pub timestamp: DateTime<Utc>,
}

/// Per-round conversation state, owned by the caller and threaded through
/// every engine call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Session the round belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// Round number (1-4), 0 while idle.
    pub round: u8,
    /// Zero-based count of processed learner responses.
    pub turn: u32,
    /// Turn budget.
    pub max_turns: u32,
    /// Lifecycle phase.
    pub phase: RoundPhase,
    /// Scaffolding type, set once the round starts.
    pub scaffolding_type: Option<ScaffoldingType>,
    /// Scaffolding intensity, set once the round starts.
    pub scaffolding_intensity: Option<Intensity>,
    /// Opening-bank indices already used this round.
    pub used_template_indices: BTreeSet<usize>,
    /// Follow-up-bank indices already used this round.
    pub used_follow_up_indices: BTreeSet<usize>,
    /// Exchanges so far.
    pub history: Vec<HistoryEntry>,
    /// The most recent agent message.
    pub last_agent_message: String,
    /// Map context captured when the round started.
    pub map: MapContext,
    /// Closing remark, once concluded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            session_id: None,
            round: 0,
            turn: 0,
            max_turns: MAX_TURNS,
            phase: RoundPhase::Idle,
            scaffolding_type: None,
            scaffolding_intensity: None,
            used_template_indices: BTreeSet::new(),
            used_follow_up_indices: BTreeSet::new(),
            history: Vec::new(),
            last_agent_message: String::new(),
            map: MapContext::default(),
            conclusion: None,
        }
    }
}

impl ConversationState {
    /// An idle state with no round.
    pub fn idle() -> Self {
        Self::default()
    }

    /// True iff the round is active and the turn budget is not spent.
    pub fn can_continue(&self) -> bool {
        self.phase == RoundPhase::RoundActive && self.turn < self.max_turns
    }

    /// Whether the round has concluded.
    pub fn is_concluded(&self) -> bool {
        self.phase == RoundPhase::Concluded
    }

    /// Mean length in characters of non-empty learner responses.
    pub fn average_response_length(&self) -> Option<f64> {
        let lengths: Vec<usize> = self
            .history
            .iter()
            .map(|entry| entry.user_response.chars().count())
            .filter(|len| *len > 0)
            .collect();
        if lengths.is_empty() {
            return None;
        }
        Some(lengths.iter().sum::<usize>() as f64 / lengths.len() as f64)
    }

    /// Intensity to use the next time this scaffolding type runs.
    ///
    /// Long answers step the intensity down, short ones step it up. Without
    /// any answers the current intensity is kept.
    pub fn suggested_next_intensity(&self) -> Option<Intensity> {
        let current = self.scaffolding_intensity?;
        Some(match self.average_response_length() {
            Some(avg) if avg > LONG_RESPONSE_CHARS => current.lower(),
            Some(avg) if avg < SHORT_RESPONSE_CHARS => current.raise(),
            _ => current,
        })
    }
}
