//! Centralized prompt definitions for scaffolding rounds.
//!
//! This module holds every fixed string the engine can emit: opening template
//! banks per (type, intensity), follow-up banks, closing remarks and
//! fallbacks. Templates may contain `{concept}`, `{second_concept}`,
//! `{node_count}`, `{edge_count}` and `{observation}` placeholders, which are
//! filled from the round's map context.

use crate::types::{Intensity, ScaffoldingType};

/// Shown for round 0, where the learner maps without an agent.
pub const BASELINE_INSTRUCTION: &str = "Please create your initial concept map on the topic of market entry under Adaptive Market Gatekeeping (AMG). Add the concepts you think matter and connect them with labelled relationships.";

// ============================================================================
// Opening template banks
// ============================================================================

const CONCEPTUAL_HIGH: &[&str] = &[
    "Looking at your map, {observation}. How does '{concept}' relate to the other concepts you have included?",
    "What is the key idea behind '{concept}', and which concept in your map does it depend on most?",
    "Your map has {node_count} concepts. Which two of them are most closely connected, and why?",
    "How would you describe the relationship between '{concept}' and '{second_concept}' in your own words?",
    "Which concept in your map best explains why market entry can be blocked? What links it to the others?",
    "Is there a concept that is missing from your map but needed to explain how AMG works?",
];

const CONCEPTUAL_MEDIUM: &[&str] = &[
    "How does '{concept}' connect to the rest of your map?",
    "Which relationship in your map captures the core of AMG best?",
    "Are there concepts in your map that mean nearly the same thing? How do they differ?",
    "What would change in your map if '{concept}' were removed?",
    "Which link in your map are you least sure about?",
];

const CONCEPTUAL_LOW: &[&str] = &[
    "Which connection in your map do you find most important?",
    "Is anything about '{concept}' still unclear to you?",
    "Do the relationship labels in your map say what you mean?",
    "Is there one more link that would make your map clearer?",
];

const STRATEGIC_HIGH: &[&str] = &[
    "Looking at your map, {observation}. What is your plan for organizing the remaining concepts?",
    "Which concept should sit at the center of your map, and how should the others be arranged around it?",
    "Could you group your {node_count} concepts into two or three themes? Which themes would you choose?",
    "What order would you build the remaining connections in, and why that order?",
    "Which part of your map would benefit most from more detail right now?",
    "How could you make the overall structure of your map easier for someone else to follow?",
];

const STRATEGIC_MEDIUM: &[&str] = &[
    "How are you deciding which concepts to add next?",
    "Is '{concept}' in the right place in your map's structure?",
    "Which area of your map is least developed, and how would you extend it?",
    "Would a hierarchy or a cluster layout fit your map better?",
    "What is your approach for connecting the isolated parts of your map?",
];

const STRATEGIC_LOW: &[&str] = &[
    "Is your current organization working for you?",
    "What would you prioritize if you had five more minutes?",
    "Does the structure of your map reflect how you think about the topic?",
    "Is there a section you would reorganize?",
];

const METACOGNITIVE_HIGH: &[&str] = &[
    "Looking at your map, {observation}. How confident are you that it captures your understanding of AMG?",
    "Which part of your map was hardest to build, and what made it difficult?",
    "How did you decide on the connection between '{concept}' and '{second_concept}'?",
    "If you explained your map to a classmate, which part would you struggle to justify?",
    "What have you learned about the topic while building these {node_count} concepts?",
    "Which of your assumptions about market entry would you most like to check?",
];

const METACOGNITIVE_MEDIUM: &[&str] = &[
    "How well does your map reflect what you actually know?",
    "What made you place '{concept}' where it is?",
    "Which connection are you most and least certain about?",
    "Has your thinking about the topic changed since you started the map?",
    "What would you do differently if you started this map again?",
];

const METACOGNITIVE_LOW: &[&str] = &[
    "How satisfied are you with your map so far?",
    "Is there a part of your map you would like to think through again?",
    "What is one thing your map shows that you did not realize before?",
    "Where do you feel your understanding is strongest?",
];

const PROCEDURAL_HIGH: &[&str] = &[
    "Looking at your map, {observation}. Try selecting '{concept}' and drawing a link to a related concept. Which one will you connect?",
    "Add a label to each relationship that does not have one yet. Which link will you label first?",
    "Your map has {node_count} concepts and {edge_count} links. Pick one concept with few links and add a connection to it.",
    "Try adding one new concept that explains how companies respond to AMG, then connect it.",
    "Check each link direction: does every arrow point from cause to effect?",
    "Move related concepts closer together on the canvas. Which ones belong side by side?",
];

const PROCEDURAL_MEDIUM: &[&str] = &[
    "Which concept could use another connection? Try adding it now.",
    "Are any relationships missing a label? Add one that describes the link.",
    "Try connecting '{concept}' to a concept it is not yet linked to.",
    "Is there a concept you could split into two more specific ones?",
    "Review your links and remove any that no longer fit.",
];

const PROCEDURAL_LOW: &[&str] = &[
    "Is there a final link you want to add?",
    "Do all your relationships have clear labels?",
    "Would any concept benefit from a more precise name?",
    "Take a moment to tidy the layout of your map.",
];

/// Opening template bank for a (type, intensity) pair.
pub fn opening_templates(scaffolding_type: ScaffoldingType, intensity: Intensity) -> &'static [&'static str] {
    match (scaffolding_type, intensity) {
        (ScaffoldingType::Conceptual, Intensity::High) => CONCEPTUAL_HIGH,
        (ScaffoldingType::Conceptual, Intensity::Medium) => CONCEPTUAL_MEDIUM,
        (ScaffoldingType::Conceptual, Intensity::Low) => CONCEPTUAL_LOW,
        (ScaffoldingType::Strategic, Intensity::High) => STRATEGIC_HIGH,
        (ScaffoldingType::Strategic, Intensity::Medium) => STRATEGIC_MEDIUM,
        (ScaffoldingType::Strategic, Intensity::Low) => STRATEGIC_LOW,
        (ScaffoldingType::Metacognitive, Intensity::High) => METACOGNITIVE_HIGH,
        (ScaffoldingType::Metacognitive, Intensity::Medium) => METACOGNITIVE_MEDIUM,
        (ScaffoldingType::Metacognitive, Intensity::Low) => METACOGNITIVE_LOW,
        (ScaffoldingType::Procedural, Intensity::High) => PROCEDURAL_HIGH,
        (ScaffoldingType::Procedural, Intensity::Medium) => PROCEDURAL_MEDIUM,
        (ScaffoldingType::Procedural, Intensity::Low) => PROCEDURAL_LOW,
    }
}

// ============================================================================
// Follow-up banks
// ============================================================================

/// Follow-ups asked after an ordinary statement.
pub fn follow_up_templates(scaffolding_type: ScaffoldingType) -> &'static [&'static str] {
    match scaffolding_type {
        ScaffoldingType::Conceptual => &[
            "Can you say more about how that connects to '{concept}'?",
            "What would be a concrete example of that relationship?",
            "How could you show that idea as a labelled link in your map?",
            "Which other concept in your map is affected by that?",
        ],
        ScaffoldingType::Strategic => &[
            "How would that change the way you organize your map?",
            "Where in your map's structure does that idea belong?",
            "What would be your next step based on that?",
            "Does that suggest a group of concepts that belong together?",
        ],
        ScaffoldingType::Metacognitive => &[
            "What makes you confident about that?",
            "How did you arrive at that view?",
            "Is there anything that would make you reconsider it?",
            "How is your map helping you think about that?",
        ],
        ScaffoldingType::Procedural => &[
            "Can you add that to your map now? Which concept will you start from?",
            "What label would you give the link that represents that?",
            "Which existing concept should that connect to?",
            "Does that need a new concept, or can an existing one be extended?",
        ],
    }
}

/// Asked when a bank is empty.
pub fn fallback_prompt(scaffolding_type: ScaffoldingType) -> &'static str {
    match scaffolding_type {
        ScaffoldingType::Conceptual => "How do the concepts in your map relate to each other?",
        ScaffoldingType::Strategic => "What is your approach for organizing your concept map?",
        ScaffoldingType::Metacognitive => "How well does your map reflect your understanding so far?",
        ScaffoldingType::Procedural => "What would you like to add or change in your map next?",
    }
}

// ============================================================================
// Closing remarks
// ============================================================================

/// Closing remarks attached when a round concludes.
///
/// May use `{concept_1}`, `{concept_2}`, `{key_concept}` and `{specific_approach}`.
pub fn closing_remarks(scaffolding_type: ScaffoldingType) -> &'static [&'static str] {
    match scaffolding_type {
        ScaffoldingType::Conceptual => &[
            "Thank you for exploring these ideas. Your thinking about how '{concept_1}' relates to '{concept_2}' has added depth to your map.",
            "Great work on the conceptual side of your map. Keep an eye on how '{key_concept}' connects to the rest as you continue.",
            "You have clarified several relationships this round. Carry that precision into your next revision.",
        ],
        ScaffoldingType::Strategic => &[
            "Thanks for working through the structure of your map. Using {specific_approach} gives it a clear direction.",
            "Your organization is taking shape. Keep '{key_concept}' in view as the anchor of your map.",
            "Good strategic thinking this round. A clear plan makes the next revision easier.",
        ],
        ScaffoldingType::Metacognitive => &[
            "Thank you for reflecting on your own thinking. Noticing where you feel unsure is a valuable step.",
            "Your reflections on '{key_concept}' show how your understanding is developing.",
            "Well done. Keep asking yourself how confident you are in each link as you continue.",
        ],
        ScaffoldingType::Procedural => &[
            "Thanks for building out your map. The connection between '{concept_1}' and '{concept_2}' is a good addition.",
            "Nice progress on the mechanics of your map. Keep labelling links as you add them.",
            "Good work this round. Your map is more complete and easier to read.",
        ],
    }
}

/// Used if a closing pool is ever empty.
pub const DEFAULT_CLOSING: &str = "Thank you for working on your concept map this round.";

/// Used if [`SPECIFIC_APPROACHES`] is ever empty.
pub const DEFAULT_APPROACH: &str = "a clear structure";

/// Phrases that can fill `{specific_approach}` in a closing remark.
pub const SPECIFIC_APPROACHES: &[&str] = &[
    "hierarchical grouping",
    "thematic clusters",
    "cause-and-effect chains",
    "a central anchor concept",
];

// ============================================================================
// Concrete-idea follow-up
// ============================================================================

/// Type-specific action appended after reflecting a learner's idea back.
pub fn concrete_idea_action(scaffolding_type: ScaffoldingType) -> &'static str {
    match scaffolding_type {
        ScaffoldingType::Conceptual => "Which concepts and relationships in your map express it?",
        ScaffoldingType::Strategic => "Where in your map's structure would this idea fit best?",
        ScaffoldingType::Metacognitive => "How confident are you in this idea, and what led you to it?",
        ScaffoldingType::Procedural => "If not, which concept and link could you add to show it?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_sizes_shrink_with_intensity() {
        for t in ScaffoldingType::ALL {
            assert_eq!(opening_templates(t, Intensity::High).len(), 6);
            assert_eq!(opening_templates(t, Intensity::Medium).len(), 5);
            assert_eq!(opening_templates(t, Intensity::Low).len(), 4);
        }
    }

    #[test]
    fn test_every_type_has_follow_ups_and_closings() {
        for t in ScaffoldingType::ALL {
            assert!(!follow_up_templates(t).is_empty());
            assert!(!closing_remarks(t).is_empty());
            assert!(!fallback_prompt(t).is_empty());
            assert!(!concrete_idea_action(t).is_empty());
        }
    }

    #[test]
    fn test_templates_have_no_unbalanced_braces() {
        let all = ScaffoldingType::ALL.iter().flat_map(|t| {
            [Intensity::High, Intensity::Medium, Intensity::Low]
                .into_iter()
                .flat_map(move |i| opening_templates(*t, i).iter())
                .chain(follow_up_templates(*t).iter())
                .chain(closing_remarks(*t).iter())
        });
        for template in all {
            assert_eq!(
                template.matches('{').count(),
                template.matches('}').count(),
                "unbalanced placeholder in: {}",
                template
            );
        }
    }
}
