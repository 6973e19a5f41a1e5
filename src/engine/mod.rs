//! Scaffolding dialogue engine.
//!
//! The engine is stateless between calls. Each round's [`ConversationState`]
//! is owned by the caller and passed back in with every learner response.
//!
//! ```text
//! IDLE --start_round--> ROUND_ACTIVE --learner response--> ROUND_ACTIVE
//!                             |                                 |
//!                             +-- wants_to_end / turn budget ---+--> CONCLUDED
//! ```

mod output;
mod session;
mod state;

pub use output::{EngineOutput, RoundStatus};
pub use session::{ExperimentalCondition, RoundRecord, ScaffoldingSession, SessionRecord, MAX_ROUNDS};
pub use state::{
    ConversationState, HistoryEntry, RoundPhase, LONG_RESPONSE_CHARS, MAX_TURNS, SHORT_RESPONSE_CHARS,
};

use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analyzer::{ConceptMap, ConceptMapAnalyzer, MapContext, MapMetrics};
use crate::classifier::{ResponseAnalysis, ResponseClassifier, ResponseType};
use crate::config::Config;
use crate::error::{EngineError, EngineResult};
use crate::events::{EventKind, EventSink, NullSink, ScaffoldEvent};
use crate::handlers::{HandlerContext, PatternHandlerRegistry};
use crate::prompts;
use crate::templates::{render, render_closing, TemplateSelector};
use crate::types::{Intensity, ScaffoldingType};

// ============================================================================
// Round request
// ============================================================================

/// Parameters for starting a round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundRequest {
    /// Round number (1-4).
    pub round: u8,
    /// The learner's current map.
    pub map: ConceptMap,
    /// Assigned scaffolding type; derived from the map when absent.
    pub assigned_type: Option<String>,
    /// Intensity override; derived from the map when absent.
    pub intensity_override: Option<String>,
    /// Session the round belongs to.
    pub session_id: Option<Uuid>,
}

impl RoundRequest {
    /// Create a request with type and intensity derived from the map.
    pub fn new(round: u8, map: ConceptMap) -> Self {
        Self {
            round,
            map,
            assigned_type: None,
            intensity_override: None,
            session_id: None,
        }
    }

    /// Set the scaffolding type.
    pub fn with_type(mut self, scaffolding_type: impl Into<String>) -> Self {
        self.assigned_type = Some(scaffolding_type.into());
        self
    }

    /// Set the intensity.
    pub fn with_intensity(mut self, intensity: impl Into<String>) -> Self {
        self.intensity_override = Some(intensity.into());
        self
    }

    /// Attach a session id.
    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

/// A freshly started round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundStart {
    /// State to pass back with the first learner response.
    pub state: ConversationState,
    /// The opening prompt.
    pub output: EngineOutput,
    /// Metrics of the map the round started from.
    pub metrics: MapMetrics,
}

// ============================================================================
// Engine
// ============================================================================

/// Drives scaffolding rounds.
pub struct ScaffoldingEngine {
    analyzer: ConceptMapAnalyzer,
    classifier: ResponseClassifier,
    handlers: PatternHandlerRegistry,
    sink: Arc<dyn EventSink>,
}

impl ScaffoldingEngine {
    /// Create an engine with default thresholds and no event log.
    pub fn new() -> Self {
        Self::with_classifier(ResponseClassifier::new())
    }

    /// Create an engine from application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_classifier(ResponseClassifier::with_config(config.classifier.clone()))
    }

    /// Create an engine around an existing classifier.
    pub fn with_classifier(classifier: ResponseClassifier) -> Self {
        Self {
            analyzer: ConceptMapAnalyzer::new(),
            classifier,
            handlers: PatternHandlerRegistry::new(),
            sink: Arc::new(NullSink),
        }
    }

    /// Replace the pattern handler registry.
    pub fn with_handlers(mut self, handlers: PatternHandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Send events to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The response classifier.
    pub fn classifier(&self) -> &ResponseClassifier {
        &self.classifier
    }

    /// The map analyzer.
    pub fn analyzer(&self) -> &ConceptMapAnalyzer {
        &self.analyzer
    }

    /// Start a round and produce its opening prompt.
    ///
    /// # Errors
    /// - [`EngineError::InvalidRound`] for round 0 or a round past [`MAX_ROUNDS`]
    /// - [`EngineError::UnknownScaffoldingType`] for an unrecognized type
    /// - [`EngineError::InvalidIntensity`] for an unrecognized intensity
    pub fn start_round(&self, request: RoundRequest) -> EngineResult<RoundStart> {
        if request.round == 0 {
            return Err(EngineError::InvalidRound {
                round: 0,
                reason: "round 0 is the unscaffolded baseline".to_string(),
            });
        }
        if request.round > MAX_ROUNDS {
            return Err(EngineError::InvalidRound {
                round: request.round,
                reason: format!("sessions have scaffolded rounds 1 to {}", MAX_ROUNDS),
            });
        }

        let assigned_type = request
            .assigned_type
            .as_deref()
            .map(|raw| {
                raw.parse::<ScaffoldingType>()
                    .map_err(|_| EngineError::UnknownScaffoldingType {
                        value: raw.to_string(),
                    })
            })
            .transpose()?;
        let intensity_override = request
            .intensity_override
            .as_deref()
            .map(|raw| {
                raw.parse::<Intensity>()
                    .map_err(|_| EngineError::InvalidIntensity {
                        value: raw.to_string(),
                    })
            })
            .transpose()?;

        let metrics = self.analyzer.analyze(&request.map);
        let scaffolding_type = assigned_type.unwrap_or_else(|| metrics.leaning_type());
        let intensity = intensity_override.unwrap_or_else(|| metrics.intensity());

        let mut state = ConversationState {
            session_id: request.session_id,
            round: request.round,
            scaffolding_type: Some(scaffolding_type),
            scaffolding_intensity: Some(intensity),
            map: MapContext::new(&request.map, &metrics),
            ..ConversationState::idle()
        };

        let selection = TemplateSelector::select(
            prompts::opening_templates(scaffolding_type, intensity),
            &mut state.used_template_indices,
            state.turn,
            scaffolding_type,
        );
        let opening = render(&selection.prompt, &state.map);
        state.last_agent_message = opening.clone();
        transition_to(&mut state, RoundPhase::RoundActive);

        info!(
            round = state.round,
            scaffolding_type = %scaffolding_type,
            intensity = %intensity,
            node_count = metrics.node_count,
            edge_count = metrics.edge_count,
            bucket = metrics.bucket.as_str(),
            "Scaffolding round started"
        );

        self.emit(
            &state,
            EventKind::RoundStarted {
                scaffolding_type,
                scaffolding_intensity: intensity,
                prompt: opening.clone(),
                metrics: metrics.clone(),
            },
        );

        let output = EngineOutput {
            status: RoundStatus::Active,
            scaffolding_type: Some(scaffolding_type),
            scaffolding_intensity: Some(intensity),
            prompts: vec![opening],
            response_type: None,
            follow_up: None,
            needs_follow_up: true,
            conclusion: None,
        };

        Ok(RoundStart {
            state,
            output,
            metrics,
        })
    }

    /// Process one learner response.
    ///
    /// Never fails. A state that is not active is returned untouched along
    /// with an output reporting its status. `rng` picks the closing remark
    /// when the round concludes.
    pub fn process_learner_response<R: Rng + ?Sized>(
        &self,
        state: &mut ConversationState,
        text: &str,
        rng: &mut R,
    ) -> EngineOutput {
        let scaffolding_type = match (state.phase, state.scaffolding_type) {
            (RoundPhase::RoundActive, Some(t)) => t,
            _ => {
                debug!(phase = %state.phase, "Ignoring learner response outside an active round");
                return EngineOutput::unchanged(state);
            }
        };

        let analysis = self.classifier.classify(text);
        let user_response = text.trim().to_string();
        let agent_message = state.last_agent_message.clone();

        state.history.push(HistoryEntry {
            agent_message: agent_message.clone(),
            user_response: user_response.clone(),
            turn: state.turn,
            response_type: analysis.response_type,
            timestamp: Utc::now(),
        });

        let follow_up = self.respond(state, &analysis, &user_response, scaffolding_type);
        let turn = state.turn;
        state.turn += 1;
        state.last_agent_message = follow_up.clone();

        debug!(
            round = state.round,
            turn,
            response_type = %analysis.response_type,
            wants_to_end = analysis.wants_to_end,
            "Processed learner response"
        );

        self.emit(
            state,
            EventKind::LearnerTurn {
                turn,
                agent_message,
                user_response,
                response_type: analysis.response_type,
                follow_up: Some(follow_up.clone()),
            },
        );

        let mut prompts = vec![follow_up.clone()];
        let conclusion = if analysis.wants_to_end || state.turn >= state.max_turns {
            let conclusion = self.conclude(state, scaffolding_type, rng);
            prompts.push(conclusion.clone());
            Some(conclusion)
        } else {
            None
        };

        EngineOutput {
            status: state.phase.into(),
            scaffolding_type: state.scaffolding_type,
            scaffolding_intensity: state.scaffolding_intensity,
            prompts,
            response_type: Some(analysis.response_type),
            follow_up: Some(follow_up),
            needs_follow_up: conclusion.is_none(),
            conclusion,
        }
    }

    /// Intensity for the next round of the same type, from this round's answers.
    pub fn suggest_next_intensity(&self, state: &ConversationState) -> Option<Intensity> {
        state.suggested_next_intensity()
    }

    fn respond(
        &self,
        state: &mut ConversationState,
        analysis: &ResponseAnalysis,
        text: &str,
        scaffolding_type: ScaffoldingType,
    ) -> String {
        let response_type = analysis.response_type;
        if response_type.requires_pattern_response() || response_type == ResponseType::ConcreteIdea {
            let ctx = HandlerContext {
                text,
                scaffolding_type,
                turn: state.turn,
                analysis,
                map: &state.map,
            };
            return self.handlers.handle(response_type, &ctx);
        }

        // Questions and minimal input get a fresh opening prompt, statements a follow-up.
        let selection = if response_type == ResponseType::MinimalInput || analysis.is_question {
            let intensity = state.scaffolding_intensity.unwrap_or(Intensity::Medium);
            TemplateSelector::select(
                prompts::opening_templates(scaffolding_type, intensity),
                &mut state.used_template_indices,
                state.turn,
                scaffolding_type,
            )
        } else {
            TemplateSelector::select(
                prompts::follow_up_templates(scaffolding_type),
                &mut state.used_follow_up_indices,
                state.turn,
                scaffolding_type,
            )
        };
        render(&selection.prompt, &state.map)
    }

    fn conclude<R: Rng + ?Sized>(
        &self,
        state: &mut ConversationState,
        scaffolding_type: ScaffoldingType,
        rng: &mut R,
    ) -> String {
        let template = prompts::closing_remarks(scaffolding_type)
            .choose(rng)
            .copied()
            .unwrap_or(prompts::DEFAULT_CLOSING);
        let approach = prompts::SPECIFIC_APPROACHES
            .choose(rng)
            .copied()
            .unwrap_or(prompts::DEFAULT_APPROACH);
        let conclusion = render_closing(template, &state.map, approach);

        state.conclusion = Some(conclusion.clone());
        transition_to(state, RoundPhase::Concluded);

        self.emit(
            state,
            EventKind::RoundConcluded {
                turns: state.turn,
                conclusion: conclusion.clone(),
            },
        );
        conclusion
    }

    fn emit(&self, state: &ConversationState, kind: EventKind) {
        let event = ScaffoldEvent::new(state.session_id, state.round, kind);
        if let Err(e) = self.sink.record(&event) {
            warn!(
                error = %e,
                round = state.round,
                "Failed to record scaffolding event - research log incomplete"
            );
        }
    }
}

impl Default for ScaffoldingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScaffoldingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaffoldingEngine")
            .field("classifier", &self.classifier)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

fn transition_to(state: &mut ConversationState, phase: RoundPhase) {
    info!(
        round = state.round,
        from = %state.phase,
        to = %phase,
        turn = state.turn,
        "Round phase transition"
    );
    state.phase = phase;
}
