use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DATE_FORMAT: &str = "MM/DD/YYYY";
pub const DATE_PICKER_CONFIDENCE: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    Click,
    Type,
    Navigate,
    Scroll,
    Wait,
    Tap,
    Input,
    /// Anything a planner returns that we do not recognise.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionType::Click => "CLICK",
            ActionType::Type => "TYPE",
            ActionType::Navigate => "NAVIGATE",
            ActionType::Scroll => "SCROLL",
            ActionType::Wait => "WAIT",
            ActionType::Tap => "TAP",
            ActionType::Input => "INPUT",
            ActionType::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

pub type StepParameters = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedActionStep {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_element_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_element_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<StepParameters>,
    pub description: String,
}

impl RecommendedActionStep {
    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.as_ref()?.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialControlRecommendation {
    pub detected_element_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_instruction_fragment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    pub recommended_steps: Vec<RecommendedActionStep>,
}

impl SpecialControlRecommendation {
    pub fn step(&self, action_type: ActionType) -> Option<&RecommendedActionStep> {
        self.recommended_steps
            .iter()
            .find(|s| s.action_type == action_type)
    }
}
