use serde_json::Value;
use tracing::debug;

use crate::controls::control_model::{
    ActionType, DATE_FORMAT, DATE_PICKER_CONFIDENCE, RecommendedActionStep,
    SpecialControlRecommendation, StepParameters,
};
use crate::controls::date::{ExtractedDate, extract_date};
use crate::controls::detector::is_date_picker;
use crate::dom::dom_model::{DomNode, ElementInfo};
use crate::dom::traversal::traverse;

/// Scan the tree for special controls the instruction refers to.
///
/// Recommendations come back in pre-order discovery order, one per qualifying
/// element. Nodes without an element are skipped. Never fails; the worst case
/// is an empty list.
pub fn identify_special_controls(
    root: &DomNode,
    instruction: &str,
) -> Vec<SpecialControlRecommendation> {
    let mut recommendations = Vec::new();

    traverse(root, |node| {
        let Some(element) = node.element.as_ref() else {
            return;
        };

        if !is_date_picker(element) {
            return;
        }

        match extract_date(instruction) {
            Some(date) => {
                debug!(element_id = %element.id, fragment = %date.fragment, "date picker matched");
                recommendations.push(date_picker_recommendation(element, &date));
            }
            None => debug!(element_id = %element.id, "date picker found but no date in instruction"),
        }
    });

    recommendations
}

fn date_picker_recommendation(
    element: &ElementInfo,
    date: &ExtractedDate,
) -> SpecialControlRecommendation {
    let id = &element.id;
    let associated = |extra: Option<(&str, &str)>| -> StepParameters {
        let mut params = StepParameters::new();
        params.insert("associatedText".into(), Value::from(date.fragment.as_str()));
        if let Some((key, value)) = extra {
            params.insert(key.into(), Value::from(value));
        }
        params
    };

    let steps = vec![
        RecommendedActionStep {
            action_type: ActionType::Click,
            target_element_id: Some(id.clone()),
            target_element_selector: None,
            value: None,
            parameters: Some(associated(None)),
            description: format!(
                "Click the identified date picker input (id: {}) to open the calendar.",
                id
            ),
        },
        RecommendedActionStep {
            action_type: ActionType::Input,
            target_element_id: Some(id.clone()),
            target_element_selector: None,
            value: Some(date.normalized.clone()),
            parameters: Some(associated(Some(("format", DATE_FORMAT)))),
            description: format!(
                "Directly input normalized date \"{}\" into the date picker (id: {}).",
                date.normalized, id
            ),
        },
    ];

    SpecialControlRecommendation {
        detected_element_id: id.clone(),
        original_instruction_fragment: Some(date.fragment.clone()),
        confidence: Some(DATE_PICKER_CONFIDENCE),
        recommended_steps: steps,
    }
}
