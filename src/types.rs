//! Shared scaffolding vocabulary: the four scaffolding types and three intensities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The style of support an agent gives during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaffoldingType {
    /// Relationships and meaning between concepts.
    Conceptual,
    /// Organization, prioritization and overall approach.
    Strategic,
    /// Reflection on the learner's own thinking.
    Metacognitive,
    /// Concrete construction steps on the map itself.
    Procedural,
}

impl ScaffoldingType {
    /// All scaffolding types in canonical order.
    pub const ALL: [ScaffoldingType; 4] = [
        ScaffoldingType::Conceptual,
        ScaffoldingType::Strategic,
        ScaffoldingType::Metacognitive,
        ScaffoldingType::Procedural,
    ];

    /// Get the type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaffoldingType::Conceptual => "conceptual",
            ScaffoldingType::Strategic => "strategic",
            ScaffoldingType::Metacognitive => "metacognitive",
            ScaffoldingType::Procedural => "procedural",
        }
    }

    /// Display marker prefixed to agent messages of this type.
    pub fn marker(&self) -> &'static str {
        match self {
            ScaffoldingType::Conceptual => "💡",
            ScaffoldingType::Strategic => "🧭",
            ScaffoldingType::Metacognitive => "🧠",
            ScaffoldingType::Procedural => "🛠️",
        }
    }
}

impl fmt::Display for ScaffoldingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScaffoldingType {
    type Err = String;

    /// Accepts the bare name or the agent form (`conceptual_scaffolding`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let name = lowered
            .strip_suffix("_scaffolding")
            .unwrap_or(lowered.as_str());
        match name {
            "conceptual" => Ok(ScaffoldingType::Conceptual),
            "strategic" => Ok(ScaffoldingType::Strategic),
            "metacognitive" => Ok(ScaffoldingType::Metacognitive),
            "procedural" => Ok(ScaffoldingType::Procedural),
            _ => Err(format!("Unknown scaffolding type: {}", s)),
        }
    }
}

/// How directive the scaffolding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    /// Frequent, explicit guidance.
    High,
    /// Balanced guidance.
    Medium,
    /// Light touch, learner-led.
    Low,
}

impl Intensity {
    /// Get the intensity name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::High => "high",
            Intensity::Medium => "medium",
            Intensity::Low => "low",
        }
    }

    /// One step less directive, saturating at low.
    pub fn lower(self) -> Self {
        match self {
            Intensity::High => Intensity::Medium,
            Intensity::Medium | Intensity::Low => Intensity::Low,
        }
    }

    /// One step more directive, saturating at high.
    pub fn raise(self) -> Self {
        match self {
            Intensity::Low => Intensity::Medium,
            Intensity::Medium | Intensity::High => Intensity::High,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Intensity::High),
            "medium" => Ok(Intensity::Medium),
            "low" => Ok(Intensity::Low),
            _ => Err(format!("Unknown intensity: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffolding_type_as_str() {
        assert_eq!(ScaffoldingType::Conceptual.as_str(), "conceptual");
        assert_eq!(ScaffoldingType::Strategic.as_str(), "strategic");
        assert_eq!(ScaffoldingType::Metacognitive.as_str(), "metacognitive");
        assert_eq!(ScaffoldingType::Procedural.as_str(), "procedural");
    }

    #[test]
    fn test_scaffolding_type_display() {
        assert_eq!(format!("{}", ScaffoldingType::Metacognitive), "metacognitive");
    }

    #[test]
    fn test_scaffolding_type_from_str_valid() {
        assert_eq!(
            "conceptual".parse::<ScaffoldingType>().unwrap(),
            ScaffoldingType::Conceptual
        );
        assert_eq!(
            "STRATEGIC".parse::<ScaffoldingType>().unwrap(),
            ScaffoldingType::Strategic
        );
        assert_eq!(
            "procedural_scaffolding".parse::<ScaffoldingType>().unwrap(),
            ScaffoldingType::Procedural
        );
    }

    #[test]
    fn test_scaffolding_type_from_str_invalid() {
        let err = "socratic".parse::<ScaffoldingType>().unwrap_err();
        assert_eq!(err, "Unknown scaffolding type: socratic");
        assert!("neutral".parse::<ScaffoldingType>().is_err());
        assert!("".parse::<ScaffoldingType>().is_err());
    }

    #[test]
    fn test_scaffolding_type_serde_snake_case() {
        let json = serde_json::to_string(&ScaffoldingType::Metacognitive).unwrap();
        assert_eq!(json, "\"metacognitive\"");
        let parsed: ScaffoldingType = serde_json::from_str("\"procedural\"").unwrap();
        assert_eq!(parsed, ScaffoldingType::Procedural);
    }

    #[test]
    fn test_intensity_from_str() {
        assert_eq!("High".parse::<Intensity>().unwrap(), Intensity::High);
        assert_eq!(" low ".parse::<Intensity>().unwrap(), Intensity::Low);
        assert!("extreme".parse::<Intensity>().is_err());
    }

    #[test]
    fn test_intensity_steps_saturate() {
        assert_eq!(Intensity::High.lower(), Intensity::Medium);
        assert_eq!(Intensity::Low.lower(), Intensity::Low);
        assert_eq!(Intensity::Low.raise(), Intensity::Medium);
        assert_eq!(Intensity::High.raise(), Intensity::High);
    }

    #[test]
    fn test_markers_are_distinct() {
        let mut markers: Vec<_> = ScaffoldingType::ALL.iter().map(|t| t.marker()).collect();
        markers.sort();
        markers.dedup();
        assert_eq!(markers.len(), 4);
    }
}
