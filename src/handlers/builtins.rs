//! Built-in pattern handlers.
//!
//! Each handler returns a reply flavored by the round's scaffolding type.
//! None of them answers a domain question or judges content.

use super::types::{FnHandler, HandlerContext};
use crate::classifier::{DisagreementKind, ResponseType};
use crate::prompts;
use crate::templates::render;
use crate::types::ScaffoldingType;

/// Longest learner snippet quoted back in a concrete-idea follow-up.
pub const IDEA_SNIPPET_CHARS: usize = 120;

/// All built-in handlers.
pub fn all() -> Vec<FnHandler> {
    vec![
        FnHandler::new(ResponseType::Empty, empty_input),
        FnHandler::new(ResponseType::Gibberish, gibberish),
        FnHandler::new(ResponseType::InappropriateLanguage, inappropriate_language),
        FnHandler::new(ResponseType::DomainQuestion, domain_question),
        FnHandler::new(ResponseType::SystemQuestion, system_question),
        FnHandler::new(ResponseType::Disagreement, disagreement),
        FnHandler::new(ResponseType::OffTopic, off_topic),
        FnHandler::new(ResponseType::Frustration, frustration),
        FnHandler::new(ResponseType::PrematureEnding, premature_ending),
        FnHandler::new(ResponseType::ConcreteIdea, concrete_idea),
    ]
}

/// Re-prompt after an empty response.
pub fn empty_input(ctx: &HandlerContext<'_>) -> String {
    let ask = match ctx.scaffolding_type {
        ScaffoldingType::Conceptual => "Take a moment to think about the conceptual relationships in your map: how does AMG connect to the other concepts you have included?",
        ScaffoldingType::Strategic => "What is your strategy for organizing the concepts in your map?",
        ScaffoldingType::Metacognitive => "Take a moment to reflect: how confident do you feel about your map so far?",
        ScaffoldingType::Procedural => "What is one concept or link you could add to your map right now?",
    };
    format!("It looks like your response was empty. {}", ask)
}

/// Polite re-prompt after unreadable input.
pub fn gibberish(ctx: &HandlerContext<'_>) -> String {
    format!(
        "I couldn't quite understand that response. {}",
        prompts::fallback_prompt(ctx.scaffolding_type)
    )
}

/// Neutral, firm redirect.
pub fn inappropriate_language(ctx: &HandlerContext<'_>) -> String {
    format!(
        "Let's keep our conversation respectful and focused on your concept map. {}",
        prompts::fallback_prompt(ctx.scaffolding_type)
    )
}

/// Turn a subject-matter question back to the learner's own reasoning.
pub fn domain_question(ctx: &HandlerContext<'_>) -> String {
    let topic = ctx
        .analysis
        .keywords
        .first()
        .map(|k| format!("'{}'", k))
        .unwrap_or_else(|| "that".to_string());
    let ask = match ctx.scaffolding_type {
        ScaffoldingType::Conceptual => format!(
            "What do you already know about {}, and how does it connect to the concepts in your map?",
            topic
        ),
        ScaffoldingType::Strategic => format!(
            "How could you organize what you already know about {} in your map to work it out?",
            topic
        ),
        ScaffoldingType::Metacognitive => {
            "What do you think the answer might be, and how sure are you about it?".to_string()
        }
        ScaffoldingType::Procedural => format!(
            "Try adding {} to your map and linking it to what you think it affects. What would you connect it to?",
            topic
        ),
    };
    format!(
        "That's a good question about {}. Rather than giving you an answer, let's use your own reasoning. {}",
        topic, ask
    )
}

/// Brief procedural help with the mapping interface.
pub fn system_question(ctx: &HandlerContext<'_>) -> String {
    let lower = ctx.text.to_lowercase();
    let has = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));
    let guidance = if has(&["delete", "remove"]) {
        "To delete a concept or link, select it and press the delete button."
    } else if has(&["connect", "link", "edge", "arrow", "relationship"]) {
        "To connect two concepts, drag from one concept to the other, then type a label for the link."
    } else if has(&["label", "rename", "edit"]) {
        "To change a label, double-click the concept or link and type the new text."
    } else if has(&["move", "drag", "zoom", "canvas"]) {
        "To rearrange your map, drag concepts on the canvas and use the zoom controls to see the whole map."
    } else if has(&["node", "add", "create", "concept"]) {
        "To add a concept, use the add node button and type its name."
    } else if has(&["save", "submit", "finish", "next round"]) {
        "Your map is saved automatically. Use the finish button when you are ready to end the round."
    } else {
        "Add concepts with the add node button, connect them by dragging from one to another, and double-click any label to edit it."
    };
    let next = match ctx.scaffolding_type {
        ScaffoldingType::Conceptual => "Which relationship would you like to add first?",
        ScaffoldingType::Strategic => "Where in your map will you start?",
        ScaffoldingType::Metacognitive => "Let me know how it goes.",
        ScaffoldingType::Procedural => "Give it a try now.",
    };
    format!("{} {}", guidance, next)
}

/// Validate the learner's stance and invite revision.
pub fn disagreement(ctx: &HandlerContext<'_>) -> String {
    let lead = match ctx
        .analysis
        .disagreement_kind
        .unwrap_or(DisagreementKind::General)
    {
        DisagreementKind::Structure => {
            "That's a fair point, and there is more than one good way to organize a map."
        }
        DisagreementKind::Content => "It's fine to see this differently, and your perspective matters.",
        DisagreementKind::General => "Thanks for pushing back; disagreeing is part of thinking it through.",
    };
    let invite = match ctx.scaffolding_type {
        ScaffoldingType::Conceptual => "Which concepts in your map support your view?",
        ScaffoldingType::Strategic => "How would you restructure your map to reflect it?",
        ScaffoldingType::Metacognitive => "What led you to see it this way?",
        ScaffoldingType::Procedural => "Feel free to revise your map to show it. What would you change first?",
    };
    format!("{} {}", lead, invite)
}

/// Redirect chit-chat back to the task.
pub fn off_topic(ctx: &HandlerContext<'_>) -> String {
    let redirect = match ctx.scaffolding_type {
        ScaffoldingType::Conceptual => "How does '{concept}' fit into the rest of your map?",
        ScaffoldingType::Strategic => "What is your next step in organizing your map?",
        ScaffoldingType::Metacognitive => "How do you feel your map is developing?",
        ScaffoldingType::Procedural => "Which concept would you like to work on next?",
    };
    format!(
        "That sounds interesting, but let's stay focused on your concept map. {}",
        render(redirect, ctx.map)
    )
}

/// Encourage and ask for something smaller.
pub fn frustration(ctx: &HandlerContext<'_>) -> String {
    let step = match ctx.scaffolding_type {
        ScaffoldingType::Conceptual => "Pick just one concept in your map: what is one thing it connects to?",
        ScaffoldingType::Strategic => "Which single concept feels most important? We can start there.",
        ScaffoldingType::Metacognitive => "Which part of your map feels most familiar to you?",
        ScaffoldingType::Procedural => "Try adding just one link between two concepts you already have.",
    };
    format!(
        "That's completely understandable, concept mapping can be challenging. Let's take a small step. {}",
        step
    )
}

/// Probe once for remaining ideas.
pub fn premature_ending(ctx: &HandlerContext<'_>) -> String {
    let probe = match ctx.scaffolding_type {
        ScaffoldingType::Conceptual => "is there one more relationship between concepts you'd like to add?",
        ScaffoldingType::Strategic => "is there any part of your map's organization you'd still adjust?",
        ScaffoldingType::Metacognitive => "is there anything about your understanding you'd still like to capture?",
        ScaffoldingType::Procedural => "is there one last concept or link you'd like to add?",
    };
    format!("Before we wrap up, {}", probe)
}

/// Reflect the learner's idea back and ask whether the map shows it.
pub fn concrete_idea(ctx: &HandlerContext<'_>) -> String {
    let mut reply = format!(
        "You said: \"{}\". Does your current concept map reflect this idea? {}",
        snippet(ctx.text),
        prompts::concrete_idea_action(ctx.scaffolding_type)
    );

    let missing: Vec<String> = ctx
        .analysis
        .keywords
        .iter()
        .filter(|k| !ctx.map.mentions(k))
        .take(2)
        .map(|k| format!("'{}'", k))
        .collect();
    if !missing.is_empty() {
        reply.push_str(&format!(
            " I don't see {} in your map yet. Would adding it make the idea clearer?",
            missing.join(" or ")
        ));
    }
    reply
}

fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= IDEA_SNIPPET_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(IDEA_SNIPPET_CHARS).collect();
    format!("{}...", cut.trim_end())
}
