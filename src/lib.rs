//! # Concept Map Scaffolding
//!
//! A dialogue engine that coaches learners while they build a concept map.
//! Each round pairs the learner's current map with one of four scaffolding
//! styles and runs a short conversation of at most five turns.
//!
//! ## Features
//!
//! - **Map Analysis**: Node/edge counts, isolated concepts, complexity buckets
//! - **Response Classification**: Twelve response categories chosen by prioritized rules
//! - **Pattern Handlers**: Tailored replies for gibberish, off-topic, frustration and more
//! - **Non-repeating Templates**: Per-round template rotation with placeholder rendering
//! - **Sessions**: Randomized or counterbalanced type order across four rounds
//! - **Event Log**: Every prompt/response pair reported to a pluggable sink
//!
//! ## Architecture
//!
//! ```text
//! ConceptMap → ConceptMapAnalyzer → MapMetrics / MapContext
//!                                          ↓
//! learner text → ResponseClassifier → ScaffoldingEngine → EngineOutput
//!                                       ↓          ↓
//!                      PatternHandlerRegistry   EventSink
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use concept_map_scaffolding::{ConceptMap, RoundRequest, ScaffoldingEngine};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let engine = ScaffoldingEngine::new();
//! let map = ConceptMap::from_json_str(r#"{"concepts": ["AMG", "Market Entry"]}"#);
//! let mut round = engine.start_round(RoundRequest::new(1, map).with_type("conceptual"))?;
//! println!("{}", round.output.prompts[0]);
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let reply = engine.process_learner_response(&mut round.state, "I think AMG blocks entry", &mut rng);
//! println!("{:?}", reply.follow_up);
//! ```

#![warn(missing_docs)]

/// Concept map parsing, metrics and prompt context.
pub mod analyzer;
/// Learner response classification.
pub mod classifier;
/// Command-line front end.
pub mod cli;
/// Configuration management.
pub mod config;
/// Round state machine and sessions.
pub mod engine;
/// Error types and result aliases for the application.
pub mod error;
/// Research event log.
pub mod events;
/// Pattern handlers for non-ordinary responses.
pub mod handlers;
/// Prompt, follow-up and closing-remark banks.
pub mod prompts;
/// Template selection and rendering.
pub mod templates;
/// Scaffolding type and intensity.
pub mod types;

pub use analyzer::{ConceptMap, ConceptMapAnalyzer, MapContext, MapMetrics};
pub use classifier::{ResponseAnalysis, ResponseClassifier, ResponseType};
pub use config::Config;
pub use engine::{
    ConversationState, EngineOutput, RoundRequest, RoundStart, ScaffoldingEngine, ScaffoldingSession,
    SessionRecord,
};
pub use error::{AppError, AppResult, EngineError, EngineResult};
pub use types::{Intensity, ScaffoldingType};
