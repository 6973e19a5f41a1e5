use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prompts;
use crate::types::ScaffoldingType;

/// A chosen template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Unrendered template text.
    pub prompt: String,
    /// Index in the bank, `None` when the type fallback was used.
    pub index: Option<usize>,
}

/// Non-repeating template selection.
///
/// Picks the lowest index not yet used in the round. When every template has
/// been used the set is cleared and selection starts over, so a round never
/// runs dry. An empty bank yields the type's fallback prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSelector;

impl TemplateSelector {
    /// Select the next template from `bank`, recording its index in `used`.
    pub fn select<S: AsRef<str>>(
        bank: &[S],
        used: &mut BTreeSet<usize>,
        turn: u32,
        scaffolding_type: ScaffoldingType,
    ) -> Selection {
        if bank.is_empty() {
            debug!(turn, scaffolding_type = %scaffolding_type, "Empty template bank, using fallback");
            return Selection {
                prompt: prompts::fallback_prompt(scaffolding_type).to_string(),
                index: None,
            };
        }

        // Indices from a larger bank no longer apply.
        used.retain(|i| *i < bank.len());
        if used.len() >= bank.len() {
            debug!(turn, bank_size = bank.len(), "Template bank exhausted, resetting");
            used.clear();
        }

        // Non-empty bank with a free slot.
        let index = (0..bank.len()).find(|i| !used.contains(i)).unwrap_or(0);
        used.insert(index);

        debug!(turn, index, "Selected template");
        Selection {
            prompt: bank[index].as_ref().to_string(),
            index: Some(index),
        }
    }
}
