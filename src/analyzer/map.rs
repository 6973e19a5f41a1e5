//! Canonical concept-map shape and the adapter that builds it from either input shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// A concept (node) on the learner's map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Stable node identifier.
    pub id: String,
    /// Text shown on the node.
    pub label: String,
    /// Canvas x position, when the editor reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Canvas y position, when the editor reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// A directed, optionally labelled link between two concepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Edge identifier.
    pub id: String,
    /// Source concept id.
    pub source: String,
    /// Target concept id.
    pub target: String,
    /// Linking phrase, empty when unlabelled.
    #[serde(default)]
    pub label: String,
}

/// A relationship with its endpoints resolved to concept labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRelationship {
    /// Label of the source concept (falls back to the id).
    pub source_text: String,
    /// Label of the target concept (falls back to the id).
    pub target_text: String,
    /// Linking phrase.
    pub label: String,
}

/// Canonical map snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptMap {
    /// Concepts in editor order.
    pub concepts: Vec<Concept>,
    /// Relationships in editor order.
    pub relationships: Vec<Relationship>,
}

impl ConceptMap {
    /// Create a map from already-normalized parts.
    pub fn new(concepts: Vec<Concept>, relationships: Vec<Relationship>) -> Self {
        Self {
            concepts,
            relationships,
        }
    }

    /// Build a map from any accepted snapshot shape.
    ///
    /// Accepted shapes:
    /// - a flat element list, items optionally wrapped in `data`, where a `source`
    ///   field marks an edge (bare or under an `elements` key);
    /// - `{ "elements": { "nodes": [...], "edges": [...] } }`;
    /// - `{ "concepts": [...], "relationships": [...] }` or `{ "nodes": [...], "edges": [...] }`,
    ///   where nodes may be plain strings;
    /// - a JSON string containing any of the above.
    ///
    /// Anything else yields the empty map.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => {
                debug!("No concept map supplied, treating as empty");
                Self::default()
            }
            Value::String(raw) => Self::from_json_str(raw),
            Value::Array(items) => Self::from_elements(items),
            Value::Object(obj) => Self::from_object(obj),
            other => {
                warn!(kind = %value_kind(other), "Unsupported concept map shape, treating as empty");
                Self::default()
            }
        }
    }

    /// Parse a JSON string snapshot. Malformed JSON yields the empty map.
    pub fn from_json_str(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(value @ (Value::Array(_) | Value::Object(_))) => Self::from_value(&value),
            Ok(other) => {
                warn!(kind = %value_kind(&other), "Concept map JSON is not a list or object, treating as empty");
                Self::default()
            }
            Err(e) => {
                warn!(error = %e, "Malformed concept map JSON, treating as empty");
                Self::default()
            }
        }
    }

    fn from_object(obj: &Map<String, Value>) -> Self {
        if let Some(elements) = obj.get("elements") {
            return match elements {
                Value::Array(items) => Self::from_elements(items),
                Value::Object(inner) => Self::from_object(inner),
                other => {
                    warn!(kind = %value_kind(other), "Unsupported elements field, treating map as empty");
                    Self::default()
                }
            };
        }

        let nodes = obj.get("concepts").or_else(|| obj.get("nodes"));
        let edges = obj.get("relationships").or_else(|| obj.get("edges"));
        if nodes.is_none() && edges.is_none() {
            warn!("Concept map object has no recognizable node or edge lists, treating as empty");
            return Self::default();
        }

        let concepts = nodes
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(Concept {
                            id: s.clone(),
                            label: s.clone(),
                            x: None,
                            y: None,
                        }),
                        other => parse_concept(unwrap_data(other)?),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let relationships = edges
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, item)| parse_relationship(unwrap_data(item)?, i))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            concepts,
            relationships,
        }
    }

    fn from_elements(items: &[Value]) -> Self {
        let mut map = Self::default();
        for (i, item) in items.iter().enumerate() {
            let Some(data) = unwrap_data(item) else {
                debug!(index = i, "Skipping non-object map element");
                continue;
            };
            if data.contains_key("source") {
                if let Some(rel) = parse_relationship(data, i) {
                    map.relationships.push(rel);
                }
            } else if let Some(concept) = parse_concept(data) {
                map.concepts.push(concept);
            }
        }
        map
    }

    /// Whether the map has neither concepts nor relationships.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty() && self.relationships.is_empty()
    }

    /// Label of the concept with `id`, if present.
    pub fn label_for(&self, id: &str) -> Option<&str> {
        self.concepts
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.label.as_str())
    }

    /// Relationships with endpoint ids replaced by concept labels.
    pub fn resolved_relationships(&self) -> Vec<ResolvedRelationship> {
        self.relationships
            .iter()
            .map(|rel| ResolvedRelationship {
                source_text: self.label_for(&rel.source).unwrap_or(&rel.source).to_string(),
                target_text: self.label_for(&rel.target).unwrap_or(&rel.target).to_string(),
                label: rel.label.clone(),
            })
            .collect()
    }
}

fn unwrap_data(item: &Value) -> Option<&Map<String, Value>> {
    let obj = item.as_object()?;
    match obj.get("data") {
        Some(Value::Object(data)) => Some(data),
        _ => Some(obj),
    }
}

fn parse_concept(data: &Map<String, Value>) -> Option<Concept> {
    let label = ["label", "text", "name"]
        .iter()
        .find_map(|key| data.get(*key).and_then(scalar_text));
    let id = data.get("id").and_then(scalar_text).or_else(|| label.clone())?;
    Some(Concept {
        label: label.unwrap_or_else(|| id.clone()),
        id,
        x: data.get("x").and_then(Value::as_f64),
        y: data.get("y").and_then(Value::as_f64),
    })
}

fn parse_relationship(data: &Map<String, Value>, index: usize) -> Option<Relationship> {
    let source = data.get("source").and_then(scalar_text)?;
    let target = data.get("target").and_then(scalar_text)?;
    Some(Relationship {
        id: data
            .get("id")
            .and_then(scalar_text)
            .unwrap_or_else(|| format!("e{}", index)),
        source,
        target,
        label: data.get("label").and_then(scalar_text).unwrap_or_default(),
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
