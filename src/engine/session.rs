//! Four-round sessions and their merged records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::{Builder, Uuid};

use super::state::{ConversationState, HistoryEntry};
use super::RoundRequest;
use crate::analyzer::ConceptMap;
use crate::error::{EngineError, EngineResult};
use crate::types::{Intensity, ScaffoldingType};

/// Scaffolded rounds per session. Round 0 is the unscaffolded baseline.
pub const MAX_ROUNDS: u8 = 4;

// ============================================================================
// Experimental conditions
// ============================================================================

/// Fixed round orderings used for counterbalancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentalCondition {
    /// Conceptual, procedural, strategic, metacognitive.
    Standard,
    /// The standard order reversed.
    Reversed,
}

impl ExperimentalCondition {
    /// Type order for rounds 1-4.
    pub fn sequence(&self) -> [ScaffoldingType; 4] {
        use ScaffoldingType::*;
        match self {
            ExperimentalCondition::Standard => [Conceptual, Procedural, Strategic, Metacognitive],
            ExperimentalCondition::Reversed => [Metacognitive, Strategic, Procedural, Conceptual],
        }
    }

    /// Get the condition name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperimentalCondition::Standard => "standard",
            ExperimentalCondition::Reversed => "reversed",
        }
    }
}

impl fmt::Display for ExperimentalCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExperimentalCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(ExperimentalCondition::Standard),
            "reversed" => Ok(ExperimentalCondition::Reversed),
            _ => Err(format!("Unknown experimental condition: {}", s)),
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// A session's assignment of scaffolding types to rounds.
///
/// The sequence is always a permutation of the four types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldingSession {
    /// Session identifier.
    pub session_id: Uuid,
    /// Type for rounds 1-4, in order.
    pub sequence: [ScaffoldingType; 4],
    /// Condition the sequence came from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ExperimentalCondition>,
}

impl ScaffoldingSession {
    /// A session with a random permutation drawn from `rng`.
    pub fn randomized<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut sequence = ScaffoldingType::ALL;
        sequence.shuffle(rng);
        let session_id = Builder::from_random_bytes(rng.gen()).into_uuid();
        debug!(session_id = %session_id, sequence = ?sequence, "Randomized scaffolding sequence");
        Self {
            session_id,
            sequence,
            condition: None,
        }
    }

    /// A session following a fixed experimental condition.
    pub fn for_condition(condition: ExperimentalCondition) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            sequence: condition.sequence(),
            condition: Some(condition),
        }
    }

    /// A session with an explicit sequence.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidSequence`] unless `sequence` names each
    /// scaffolding type exactly once.
    pub fn from_sequence(sequence: &[ScaffoldingType]) -> EngineResult<Self> {
        let fixed: [ScaffoldingType; 4] =
            sequence
                .try_into()
                .map_err(|_| EngineError::InvalidSequence {
                    message: format!("expected 4 scaffolding types, got {}", sequence.len()),
                })?;
        for t in ScaffoldingType::ALL {
            if !fixed.contains(&t) {
                return Err(EngineError::InvalidSequence {
                    message: format!("{} is missing from the sequence", t),
                });
            }
        }
        Ok(Self {
            session_id: Uuid::new_v4(),
            sequence: fixed,
            condition: None,
        })
    }

    /// Scaffolding type for `round`, `None` for the baseline or out of range.
    pub fn type_for_round(&self, round: u8) -> Option<ScaffoldingType> {
        match round {
            1..=MAX_ROUNDS => Some(self.sequence[usize::from(round - 1)]),
            _ => None,
        }
    }

    /// Build the request that starts `round` of this session.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidRound`] for round 0 or beyond the last round.
    pub fn round_request(&self, round: u8, map: ConceptMap) -> EngineResult<RoundRequest> {
        let scaffolding_type = self.type_for_round(round).ok_or_else(|| EngineError::InvalidRound {
            round,
            reason: format!("sessions have scaffolded rounds 1 to {}", MAX_ROUNDS),
        })?;
        Ok(RoundRequest::new(round, map)
            .with_type(scaffolding_type.as_str())
            .with_session(self.session_id))
    }
}

// ============================================================================
// Session record
// ============================================================================

/// Persisted outcome of one round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Scaffolding type of the round.
    pub scaffolding_type: Option<ScaffoldingType>,
    /// Scaffolding intensity of the round.
    pub scaffolding_intensity: Option<Intensity>,
    /// Exchanges, ordered by turn.
    pub history: Vec<HistoryEntry>,
    /// Turns taken.
    pub turns: u32,
    /// Closing remark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
}

impl RoundRecord {
    /// Snapshot a conversation state.
    pub fn from_state(state: &ConversationState) -> Self {
        Self {
            scaffolding_type: state.scaffolding_type,
            scaffolding_intensity: state.scaffolding_intensity,
            history: state.history.clone(),
            turns: state.turn,
            conclusion: state.conclusion.clone(),
        }
    }

    /// Fold `other` into this record without dropping anything already here.
    pub fn merge(&mut self, other: RoundRecord) {
        self.scaffolding_type = self.scaffolding_type.or(other.scaffolding_type);
        self.scaffolding_intensity = self.scaffolding_intensity.or(other.scaffolding_intensity);
        self.turns = self.turns.max(other.turns);
        if self.conclusion.is_none() {
            self.conclusion = other.conclusion;
        }
        for entry in other.history {
            if !self.history.iter().any(|e| e.turn == entry.turn) {
                self.history.push(entry);
            }
        }
        self.history.sort_by_key(|e| e.turn);
    }
}

/// All rounds of a session, keyed by round number.
///
/// Updates are read-merge-write: merging a round never drops sibling rounds
/// or history already recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// Assigned type order.
    #[serde(default)]
    pub sequence: Vec<ScaffoldingType>,
    /// Round outcomes.
    #[serde(default)]
    pub rounds: BTreeMap<u8, RoundRecord>,
}

impl SessionRecord {
    /// An empty record for `session`.
    pub fn new(session: &ScaffoldingSession) -> Self {
        Self {
            session_id: Some(session.session_id),
            sequence: session.sequence.to_vec(),
            rounds: BTreeMap::new(),
        }
    }

    /// Merge the current state of a round.
    pub fn merge_round(&mut self, state: &ConversationState) {
        if self.session_id.is_none() {
            self.session_id = state.session_id;
        }
        self.rounds
            .entry(state.round)
            .or_default()
            .merge(RoundRecord::from_state(state));
    }

    /// Merge another record of the same session.
    pub fn merge(&mut self, other: SessionRecord) {
        if self.session_id.is_none() {
            self.session_id = other.session_id;
        }
        if self.sequence.is_empty() {
            self.sequence = other.sequence;
        }
        for (round, record) in other.rounds {
            self.rounds.entry(round).or_default().merge(record);
        }
    }

    /// Record for `round`, if any.
    pub fn round(&self, round: u8) -> Option<&RoundRecord> {
        self.rounds.get(&round)
    }
}
