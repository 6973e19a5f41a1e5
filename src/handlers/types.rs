use crate::analyzer::MapContext;
use crate::classifier::{ResponseAnalysis, ResponseType};
use crate::types::ScaffoldingType;

/// Everything a pattern handler may draw on.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    /// The learner's response, trimmed, case preserved.
    pub text: &'a str,
    /// Scaffolding type of the current round.
    pub scaffolding_type: ScaffoldingType,
    /// Zero-based turn the response was given on.
    pub turn: u32,
    /// Classification of the response.
    pub analysis: &'a ResponseAnalysis,
    /// Map context captured at round start.
    pub map: &'a MapContext,
}

/// Produces the agent reply for one response category.
pub trait PatternHandler: Send + Sync {
    /// Category this handler serves.
    fn category(&self) -> ResponseType;

    /// Build the reply for a classified response.
    fn handle(&self, ctx: &HandlerContext<'_>) -> String;
}

/// A handler backed by a plain function.
#[derive(Clone, Copy)]
pub struct FnHandler {
    category: ResponseType,
    respond: fn(&HandlerContext<'_>) -> String,
}

impl FnHandler {
    /// Wrap `respond` as the handler for `category`.
    pub const fn new(category: ResponseType, respond: fn(&HandlerContext<'_>) -> String) -> Self {
        Self { category, respond }
    }
}

impl std::fmt::Debug for FnHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler")
            .field("category", &self.category)
            .finish()
    }
}

impl PatternHandler for FnHandler {
    fn category(&self) -> ResponseType {
        self.category
    }

    fn handle(&self, ctx: &HandlerContext<'_>) -> String {
        (self.respond)(ctx)
    }
}
