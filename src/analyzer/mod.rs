//! Concept-map analysis.
//!
//! - [`ConceptMap`]: canonical snapshot built from either accepted input shape
//! - [`ConceptMapAnalyzer`]: node/edge counts, isolation, connectivity and the
//!   complexity bucket that drives intensity and type selection
//! - [`MapContext`]: labels and observations that prompts can reference

mod context;
mod map;
mod metrics;

pub use context::*;
pub use map::*;
pub use metrics::*;
