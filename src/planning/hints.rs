use std::fmt::Write;

use crate::controls::control_model::SpecialControlRecommendation;

/// Render recommendations as plain-text hints for the planner's action
/// context. Empty input gives an empty string.
pub fn format_recommendations_to_text(recommendations: &[SpecialControlRecommendation]) -> String {
    if recommendations.is_empty() {
        return String::new();
    }

    let mut text = String::from("Special Control Hints:\n");
    for (index, rec) in recommendations.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(text, "{}. For element (ID: '{}'):", index + 1, rec.detected_element_id);

        if let Some(fragment) = rec.original_instruction_fragment.as_deref().filter(|f| !f.is_empty()) {
            let _ = writeln!(
                text,
                "   User seems to want to interact with this regarding: \"{}\".",
                fragment
            );
        }

        if !rec.recommended_steps.is_empty() {
            text.push_str("   Suggested interaction steps:\n");
            for (step_index, step) in rec.recommended_steps.iter().enumerate() {
                let _ = write!(
                    text,
                    "   {}) {} (Action: {}",
                    step_index + 1,
                    step.description,
                    step.action_type
                );
                if let Some(value) = step.value.as_deref().filter(|v| !v.is_empty()) {
                    let _ = write!(text, ", Value: \"{}\"", value);
                }
                if let Some(target) = step
                    .target_element_id
                    .as_deref()
                    .filter(|t| !t.is_empty() && *t != rec.detected_element_id)
                {
                    let _ = write!(text, ", Target Sub-Element ID: {}", target);
                }
                if let Some(selector) = step.target_element_selector.as_deref().filter(|s| !s.is_empty()) {
                    let _ = write!(text, ", Target Selector: \"{}\"", selector);
                }
                text.push_str(").\n");
            }
        }

        if let Some(confidence) = rec.confidence.filter(|c| *c != 0.0 && !c.is_nan()) {
            let _ = writeln!(
                text,
                "   Confidence in this hint: {}%.",
                (confidence * 100.0).round() as i64
            );
        }
    }

    text
}

/// Action context for a replan: the failed step first, then any hints.
pub fn replan_action_context(failed_description: &str, hints: &str) -> String {
    format!("Replanning after failed step: {}\n{}", failed_description, hints)
        .trim()
        .to_string()
}
