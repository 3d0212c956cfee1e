use tracing::{debug, info};

use crate::{
    agent::error::AgentError,
    dom::dom_model::{DomNode, WindowSize},
    planning::{
        hints::{format_recommendations_to_text, replan_action_context},
        plan_model::{
            ActionPlan, ConversationLog, LogRole, PlanResponse, PlanningContext,
            ProcessPageRequest, ReplanRequest,
        },
        planner::Planner,
    },
};

/// Validates planning requests, turns recommendations into hint text and
/// hands the result to the configured planner.
pub struct PlanningService {
    planner: Box<dyn Planner>,
}

impl PlanningService {
    pub fn new(planner: Box<dyn Planner>) -> Self {
        Self { planner }
    }

    pub fn process_page(&self, request: &ProcessPageRequest) -> Result<PlanResponse, AgentError> {
        info!(
            instruction = %request.instruction,
            url = %request.url,
            window = %format!("{}x{}", request.window_size.width, request.window_size.height),
            root = request.dom_tree.describe(),
            screenshot_len = request.screenshot_data.len(),
            recommendations = request.recommendations.len(),
            "process-page request"
        );

        validate(
            &request.instruction,
            &request.dom_tree,
            &request.screenshot_data,
            &request.url,
            request.window_size,
        )?;

        let hints = format_recommendations_to_text(&request.recommendations);
        if !hints.is_empty() {
            debug!("special control hints:\n{}", hints);
        }

        let context = PlanningContext {
            screenshot: &request.screenshot_data,
            tree: &request.dom_tree,
            url: &request.url,
            window_size: request.window_size,
            action_context: hints,
            previous_logs: vec![],
            recommendations: &request.recommendations,
        };

        let steps = self.planner.plan(&request.instruction, &context)?;
        Ok(PlanResponse {
            message: "Plan generated successfully.".into(),
            plan: ActionPlan {
                goal: request.instruction.clone(),
                steps,
            },
        })
    }

    pub fn replan(&self, request: &ReplanRequest) -> Result<PlanResponse, AgentError> {
        info!(
            instruction = %request.instruction,
            url = %request.url,
            problematic_step = %request.problematic_step.description,
            recommendations = request.recommendations.len(),
            "replan request"
        );

        validate(
            &request.instruction,
            &request.dom_tree,
            &request.screenshot_data,
            &request.url,
            request.window_size,
        )?;

        let step_json = serde_json::to_string(&request.problematic_step).map_err(|source| {
            AgentError::JsonSerialize {
                context: "problematic step".into(),
                source,
            }
        })?;

        let previous_logs = vec![
            ConversationLog {
                role: LogRole::Assistant,
                content: format!("I previously tried this step: {}", step_json),
            },
            ConversationLog {
                role: LogRole::User,
                content: "This step failed to achieve the desired outcome or an error occurred. \
                          Please provide a new plan based on the current state to achieve the original goal."
                    .into(),
            },
        ];

        let hints = format_recommendations_to_text(&request.recommendations);
        let context = PlanningContext {
            screenshot: &request.screenshot_data,
            tree: &request.dom_tree,
            url: &request.url,
            window_size: request.window_size,
            action_context: replan_action_context(&request.problematic_step.description, &hints),
            previous_logs,
            recommendations: &request.recommendations,
        };

        let steps = self.planner.plan(&request.instruction, &context)?;
        Ok(PlanResponse {
            message: "Replan successful.".into(),
            plan: ActionPlan {
                goal: request.instruction.clone(),
                steps,
            },
        })
    }
}

/// Shared checks for both request kinds.
pub fn validate(
    instruction: &str,
    dom_tree: &DomNode,
    screenshot: &str,
    url: &str,
    window_size: WindowSize,
) -> Result<(), AgentError> {
    if instruction.trim().is_empty() {
        return Err(AgentError::MissingField("instruction"));
    }
    if dom_tree.element.is_none() && dom_tree.children.is_empty() {
        return Err(AgentError::MissingField("domTree"));
    }
    if screenshot.is_empty() {
        return Err(AgentError::MissingField("screenshotData"));
    }
    if url.is_empty() {
        return Err(AgentError::MissingField("url"));
    }
    if window_size.width == 0 || window_size.height == 0 {
        return Err(AgentError::MissingField("windowSize"));
    }
    Ok(())
}

