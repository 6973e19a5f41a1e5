//! Pattern handlers for non-ordinary learner responses.
//!
//! Handlers are pure functions of the response, the round's scaffolding
//! type and the map context. [`PatternHandlerRegistry`] routes each
//! [`ResponseType`](crate::classifier::ResponseType) to its handler.

pub mod builtins;
mod registry;
mod types;

pub use registry::PatternHandlerRegistry;
pub use types::{FnHandler, HandlerContext, PatternHandler};
