use serde::{Deserialize, Serialize};

use crate::controls::control_model::{ActionType, SpecialControlRecommendation, StepParameters};
use crate::dom::dom_model::{DomNode, WindowSize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStep {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<StepParameters>,
}

impl ActionStep {
    pub fn wait(description: &str, milliseconds: u64) -> Self {
        let mut params = StepParameters::new();
        params.insert("milliseconds".into(), milliseconds.into());
        Self {
            action_type: ActionType::Wait,
            description: description.to_string(),
            element_id: None,
            value: None,
            parameters: Some(params),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub goal: String,
    pub steps: Vec<ActionStep>,
}

/// Payload for a first planning pass over a captured page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPageRequest {
    pub instruction: String,
    pub dom_tree: DomNode,
    pub screenshot_data: String,
    pub url: String,
    pub window_size: WindowSize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<SpecialControlRecommendation>,
}

/// Payload for planning again after `problematic_step` failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplanRequest {
    pub instruction: String,
    pub problematic_step: ActionStep,
    pub dom_tree: DomNode,
    pub screenshot_data: String,
    pub url: String,
    pub window_size: WindowSize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<SpecialControlRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub message: String,
    pub plan: ActionPlan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRole {
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationLog {
    pub role: LogRole,
    pub content: String,
}

/// Everything a planner gets to look at besides the instruction.
#[derive(Debug, Clone)]
pub struct PlanningContext<'a> {
    pub screenshot: &'a str,
    pub tree: &'a DomNode,
    pub url: &'a str,
    pub window_size: WindowSize,
    pub action_context: String,
    pub previous_logs: Vec<ConversationLog>,
    pub recommendations: &'a [SpecialControlRecommendation],
}
