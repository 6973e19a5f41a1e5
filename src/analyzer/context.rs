use serde::{Deserialize, Serialize};

use super::map::{ConceptMap, ResolvedRelationship};
use super::metrics::MapMetrics;

/// The slice of a map snapshot that prompts and handlers may reference.
///
/// Kept inside the conversation state so a round can be resumed without the
/// original snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapContext {
    /// All concept labels in map order.
    pub labels: Vec<String>,
    /// Highest-degree concept labels.
    pub central_concepts: Vec<String>,
    /// Labels of unconnected concepts.
    pub isolated_concepts: Vec<String>,
    /// Relationships with resolved endpoint labels.
    pub relationships: Vec<ResolvedRelationship>,
    /// Concept count at round start.
    pub node_count: usize,
    /// Relationship count at round start.
    pub edge_count: usize,
}

impl MapContext {
    /// Capture the context of a snapshot and its metrics.
    pub fn new(map: &ConceptMap, metrics: &MapMetrics) -> Self {
        Self {
            labels: map.concepts.iter().map(|c| c.label.clone()).collect(),
            central_concepts: metrics.central_concepts.clone(),
            isolated_concepts: metrics.isolated_nodes.clone(),
            relationships: map.resolved_relationships(),
            node_count: metrics.node_count,
            edge_count: metrics.edge_count,
        }
    }

    /// The concept a prompt should anchor on: the most central one, else the first label.
    pub fn focus_concept(&self) -> Option<&str> {
        self.central_concepts
            .first()
            .or_else(|| self.labels.first())
            .map(String::as_str)
    }

    /// A second concept distinct from the focus, when the map has one.
    pub fn secondary_concept(&self) -> Option<&str> {
        let focus = self.focus_concept()?;
        self.central_concepts
            .iter()
            .chain(self.labels.iter())
            .map(String::as_str)
            .find(|label| *label != focus)
    }

    /// Whether any concept label contains `keyword` (case-insensitive).
    pub fn mentions(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.labels
            .iter()
            .any(|label| label.to_lowercase().contains(&needle))
    }

    /// One-sentence structural observation used to fill `{observation}`.
    pub fn observation(&self) -> String {
        if self.node_count == 0 {
            return "your map is still empty".to_string();
        }
        if let Some(isolated) = self.isolated_concepts.first() {
            if self.isolated_concepts.len() == 1 {
                return format!("'{}' is not connected to anything yet", isolated);
            }
            return format!(
                "{} concepts, including '{}', are not connected yet",
                self.isolated_concepts.len(),
                isolated
            );
        }
        format!(
            "you have {} {} linked by {} {}",
            self.node_count,
            plural(self.node_count, "concept", "concepts"),
            self.edge_count,
            plural(self.edge_count, "relationship", "relationships")
        )
    }
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}
