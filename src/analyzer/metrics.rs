use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::map::ConceptMap;
use crate::types::{Intensity, ScaffoldingType};

/// Weight of the node count in the complexity score.
pub const NODE_WEIGHT: f64 = 0.6;
/// Weight of the edge count in the complexity score.
pub const EDGE_WEIGHT: f64 = 0.4;
/// Number of central concepts reported.
pub const CENTRAL_CONCEPT_LIMIT: usize = 3;

/// Complexity band of a map, derived from its complexity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityBucket {
    /// Score below 5.
    Sparse,
    /// Score in [5, 8).
    Developing,
    /// Score in [8, 12).
    Connected,
    /// Score of 12 or more.
    Dense,
}

impl ComplexityBucket {
    /// Bucket for a complexity score.
    pub fn from_score(score: f64) -> Self {
        if score < 5.0 {
            ComplexityBucket::Sparse
        } else if score < 8.0 {
            ComplexityBucket::Developing
        } else if score < 12.0 {
            ComplexityBucket::Connected
        } else {
            ComplexityBucket::Dense
        }
    }

    /// Intensity recommended for maps in this bucket.
    pub fn intensity(&self) -> Intensity {
        match self {
            ComplexityBucket::Sparse => Intensity::High,
            ComplexityBucket::Developing | ComplexityBucket::Connected => Intensity::Medium,
            ComplexityBucket::Dense => Intensity::Low,
        }
    }

    /// Scaffolding type used when no type is assigned for the round.
    pub fn leaning_type(&self) -> ScaffoldingType {
        match self {
            ComplexityBucket::Sparse => ScaffoldingType::Conceptual,
            ComplexityBucket::Developing => ScaffoldingType::Strategic,
            ComplexityBucket::Connected => ScaffoldingType::Metacognitive,
            ComplexityBucket::Dense => ScaffoldingType::Procedural,
        }
    }

    /// Get the bucket name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityBucket::Sparse => "sparse",
            ComplexityBucket::Developing => "developing",
            ComplexityBucket::Connected => "connected",
            ComplexityBucket::Dense => "dense",
        }
    }
}

impl fmt::Display for ComplexityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structural metrics of a concept map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMetrics {
    /// Number of concepts.
    pub node_count: usize,
    /// Number of relationships.
    pub edge_count: usize,
    /// Labels of concepts that touch no relationship.
    pub isolated_nodes: Vec<String>,
    /// `edge_count / max(node_count, 1)`.
    pub connectivity_ratio: f64,
    /// `0.6 * node_count + 0.4 * edge_count`.
    pub complexity_score: f64,
    /// Band the score falls into.
    pub bucket: ComplexityBucket,
    /// Up to three labels with the highest degree.
    pub central_concepts: Vec<String>,
}

impl MapMetrics {
    /// Intensity recommended by the complexity bucket.
    pub fn intensity(&self) -> Intensity {
        self.bucket.intensity()
    }

    /// Scaffolding type the complexity bucket leans towards.
    pub fn leaning_type(&self) -> ScaffoldingType {
        self.bucket.leaning_type()
    }
}

/// Change between two snapshots of the same learner's map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapGrowth {
    /// Concepts added (negative when removed).
    pub node_growth: i64,
    /// Relationships added (negative when removed).
    pub edge_growth: i64,
    /// Labels present now but absent from the previous snapshot.
    pub new_concepts: Vec<String>,
}

/// Derives complexity metrics from concept-map snapshots.
///
/// Stateless; malformed input is treated as the empty map.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConceptMapAnalyzer;

impl ConceptMapAnalyzer {
    /// Create an analyzer.
    pub fn new() -> Self {
        Self
    }

    /// Compute metrics for a normalized map.
    pub fn analyze(&self, map: &ConceptMap) -> MapMetrics {
        let node_count = map.concepts.len();
        let edge_count = map.relationships.len();

        let mut degree: HashMap<&str, usize> = HashMap::new();
        for rel in &map.relationships {
            *degree.entry(rel.source.as_str()).or_default() += 1;
            *degree.entry(rel.target.as_str()).or_default() += 1;
        }

        let isolated_nodes = map
            .concepts
            .iter()
            .filter(|c| !degree.contains_key(c.id.as_str()))
            .map(|c| c.label.clone())
            .collect();

        // Stable sort keeps map order among equal degrees.
        let mut ranked: Vec<_> = map
            .concepts
            .iter()
            .filter_map(|c| degree.get(c.id.as_str()).map(|d| (c, *d)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let central_concepts = ranked
            .into_iter()
            .take(CENTRAL_CONCEPT_LIMIT)
            .map(|(c, _)| c.label.clone())
            .collect();

        let complexity_score = NODE_WEIGHT * node_count as f64 + EDGE_WEIGHT * edge_count as f64;
        let bucket = ComplexityBucket::from_score(complexity_score);

        debug!(
            node_count,
            edge_count,
            complexity_score,
            bucket = %bucket,
            "Analyzed concept map"
        );

        MapMetrics {
            node_count,
            edge_count,
            isolated_nodes,
            connectivity_ratio: edge_count as f64 / node_count.max(1) as f64,
            complexity_score,
            bucket,
            central_concepts,
        }
    }

    /// Normalize a raw snapshot and compute its metrics.
    pub fn analyze_value(&self, value: &Value) -> MapMetrics {
        self.analyze(&ConceptMap::from_value(value))
    }

    /// Compare a snapshot with the learner's previous one.
    pub fn growth(&self, previous: &ConceptMap, current: &ConceptMap) -> MapGrowth {
        let before: HashSet<String> = previous
            .concepts
            .iter()
            .map(|c| c.label.trim().to_lowercase())
            .collect();
        MapGrowth {
            node_growth: current.concepts.len() as i64 - previous.concepts.len() as i64,
            edge_growth: current.relationships.len() as i64 - previous.relationships.len() as i64,
            new_concepts: current
                .concepts
                .iter()
                .filter(|c| !before.contains(&c.label.trim().to_lowercase()))
                .map(|c| c.label.clone())
                .collect(),
        }
    }
}
