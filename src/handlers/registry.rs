//! Registry mapping response categories to pattern handlers.

use std::collections::HashMap;

use tracing::{debug, error};

use super::builtins;
use super::types::{HandlerContext, PatternHandler};
use crate::classifier::ResponseType;
use crate::error::{EngineError, EngineResult};
use crate::prompts;

/// Registry for pattern handlers.
///
/// Built-in handlers are registered on creation. A category without a
/// handler falls back to the scaffolding type's generic prompt.
pub struct PatternHandlerRegistry {
    handlers: HashMap<ResponseType, Box<dyn PatternHandler>>,
}

impl PatternHandlerRegistry {
    /// Create a new registry with built-in handlers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtins();
        registry
    }

    /// Create a registry with no handlers.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler.
    ///
    /// # Errors
    /// Returns error if a handler for the same category already exists.
    pub fn register(&mut self, handler: Box<dyn PatternHandler>) -> EngineResult<()> {
        let category = handler.category();
        if self.handlers.contains_key(&category) {
            return Err(EngineError::DuplicateHandler {
                category: category.to_string(),
            });
        }
        self.handlers.insert(category, handler);
        Ok(())
    }

    /// Register a handler, replacing any existing one for its category.
    pub fn replace(&mut self, handler: Box<dyn PatternHandler>) -> Option<Box<dyn PatternHandler>> {
        self.handlers.insert(handler.category(), handler)
    }

    /// Whether a handler exists for `category`.
    pub fn contains(&self, category: ResponseType) -> bool {
        self.handlers.contains_key(&category)
    }

    /// Get the number of registered handlers.
    pub fn count(&self) -> usize {
        self.handlers.len()
    }

    /// Produce the reply for a classified response.
    pub fn handle(&self, category: ResponseType, ctx: &HandlerContext<'_>) -> String {
        match self.handlers.get(&category) {
            Some(handler) => handler.handle(ctx),
            None => {
                debug!(category = %category, "No pattern handler registered, using fallback prompt");
                prompts::fallback_prompt(ctx.scaffolding_type).to_string()
            }
        }
    }

    fn register_builtins(&mut self) {
        for handler in builtins::all() {
            let category = handler.category();
            if let Err(e) = self.register(Box::new(handler)) {
                error!(
                    category = %category,
                    error = %e,
                    "Failed to register builtin handler - this indicates a programming error"
                );
            }
        }
    }
}

impl Default for PatternHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PatternHandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut categories: Vec<_> = self.handlers.keys().map(|c| c.as_str()).collect();
        categories.sort();
        f.debug_struct("PatternHandlerRegistry")
            .field("categories", &categories)
            .finish()
    }
}
