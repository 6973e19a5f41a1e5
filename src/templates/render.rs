use crate::analyzer::MapContext;

const FOCUS_FALLBACK: &str = "your main concept";
const SECONDARY_FALLBACK: &str = "another concept";

/// Fill map placeholders in a template.
///
/// Unknown placeholders are left untouched.
pub fn render(template: &str, ctx: &MapContext) -> String {
    let focus = ctx.focus_concept().unwrap_or(FOCUS_FALLBACK);
    let secondary = ctx.secondary_concept().unwrap_or(SECONDARY_FALLBACK);
    template
        .replace("{observation}", &ctx.observation())
        .replace("{node_count}", &ctx.node_count.to_string())
        .replace("{edge_count}", &ctx.edge_count.to_string())
        .replace("{second_concept}", secondary)
        .replace("{concept}", focus)
}

/// Fill closing-remark placeholders.
///
/// `{concept_1}`/`{concept_2}` prefer the first resolved relationship so the
/// remark names a link the learner actually drew.
pub fn render_closing(template: &str, ctx: &MapContext, approach: &str) -> String {
    let (first, second) = match ctx.relationships.first() {
        Some(rel) => (rel.source_text.as_str(), rel.target_text.as_str()),
        None => (
            ctx.focus_concept().unwrap_or(FOCUS_FALLBACK),
            ctx.secondary_concept().unwrap_or(SECONDARY_FALLBACK),
        ),
    };
    template
        .replace("{concept_1}", first)
        .replace("{concept_2}", second)
        .replace("{key_concept}", ctx.focus_concept().unwrap_or(FOCUS_FALLBACK))
        .replace("{specific_approach}", approach)
}
