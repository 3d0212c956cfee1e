use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    agent::error::AgentError,
    dom::dom_model::DomNode,
    planning::plan_model::{ActionStep, PlanningContext},
};

/// The external planning function: instruction + page context in, steps out.
pub trait Planner {
    fn plan(&self, instruction: &str, context: &PlanningContext<'_>) -> Result<Vec<ActionStep>, AgentError>;
}

// ============================================================================
// Mock Planner (for running without a model)
// ============================================================================

/// Deterministic stand-in: follows the special-control hints when there are
/// any, otherwise waits.
pub struct MockPlanner {
    pub default_wait_ms: u64,
}

impl Default for MockPlanner {
    fn default() -> Self {
        Self { default_wait_ms: 500 }
    }
}

impl Planner for MockPlanner {
    fn plan(&self, instruction: &str, context: &PlanningContext<'_>) -> Result<Vec<ActionStep>, AgentError> {
        let steps: Vec<ActionStep> = context
            .recommendations
            .iter()
            .flat_map(|rec| {
                rec.recommended_steps.iter().map(|step| ActionStep {
                    action_type: step.action_type,
                    description: step.description.clone(),
                    element_id: step
                        .target_element_id
                        .clone()
                        .or_else(|| Some(rec.detected_element_id.clone())),
                    value: step.value.clone(),
                    parameters: step.parameters.clone(),
                })
            })
            .collect();

        if steps.is_empty() {
            return Ok(vec![ActionStep::wait(
                &format!("No special controls apply to \"{}\"; waiting for the page", instruction),
                self.default_wait_ms,
            )]);
        }

        Ok(steps)
    }
}

// ============================================================================
// Ollama Planner
// ============================================================================

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:1.5b";

/// Cap on interactive elements listed in the prompt.
const MAX_PROMPT_ELEMENTS: usize = 60;

pub struct OllamaPlanner {
    pub endpoint: String,
    pub model: String,
}

impl Default for OllamaPlanner {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OLLAMA_ENDPOINT.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: &'static str,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

#[derive(Deserialize)]
struct ModelPlanResponse {
    #[serde(default)]
    steps: Vec<ActionStep>,
}

impl OllamaPlanner {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
        }
    }

    pub fn build_prompt(&self, instruction: &str, context: &PlanningContext<'_>) -> String {
        let elements = summarize_elements(context.tree);

        let history = context
            .previous_logs
            .iter()
            .map(|log| format!("  [{:?}] {}", log.role, log.content))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
r#"You are a web automation planner. Produce the steps that accomplish the goal.

GOAL: {}

PAGE:
- URL: {}
- Window: {}x{}
- Elements:
{}

CONTEXT:
{}

HISTORY:
{}

Respond with ONLY valid JSON of the form:
{{"steps":[{{"type":"CLICK|INPUT|NAVIGATE|SCROLL|WAIT","description":"...","elementId":"...","value":"..."}}]}}"#,
            instruction,
            context.url,
            context.window_size.width,
            context.window_size.height,
            if elements.is_empty() { "  (none)" } else { &elements },
            if context.action_context.is_empty() { "(none)" } else { &context.action_context },
            if history.is_empty() { "  (none)" } else { &history },
        )
    }

    pub fn parse_response(&self, response: &str) -> Result<Vec<ActionStep>, AgentError> {
        let parsed: ModelPlanResponse =
            serde_json::from_str(response).map_err(|source| AgentError::JsonParse {
                context: "planner response".into(),
                source,
            })?;

        if parsed.steps.is_empty() {
            return Err(AgentError::PlannerResponse("plan has no steps".into()));
        }

        Ok(parsed.steps)
    }
}

impl Planner for OllamaPlanner {
    fn plan(&self, instruction: &str, context: &PlanningContext<'_>) -> Result<Vec<ActionStep>, AgentError> {
        let prompt = self.build_prompt(instruction, context);
        debug!(endpoint = %self.endpoint, model = %self.model, "sending planning prompt");

        let request = OllamaRequest {
            model: self.model.clone(),
            prompt,
            stream: false,
            format: "json",
        };

        let request_error = |source| AgentError::PlannerRequest {
            endpoint: self.endpoint.clone(),
            source,
        };

        let client = reqwest::blocking::Client::new();
        let ollama_response: OllamaResponse = client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(request_error)?
            .json()
            .map_err(request_error)?;

        self.parse_response(&ollama_response.response)
    }
}

/// One line per element worth acting on: id, tag and a short label.
fn summarize_elements(tree: &DomNode) -> String {
    tree.iter()
        .filter_map(|node| node.element.as_ref())
        .filter(|el| el.is_visible.unwrap_or(true))
        .filter(|el| {
            let tag = el.html_tag_name.as_deref().unwrap_or("").to_lowercase();
            matches!(tag.as_str(), "input" | "button" | "a" | "select" | "textarea")
                || el.attributes.contains_key("role")
        })
        .take(MAX_PROMPT_ELEMENTS)
        .map(|el| {
            let label = el
                .attr("aria-label")
                .or_else(|| el.attr("placeholder"))
                .unwrap_or(el.content.trim());
            format!(
                "  - id={} tag={} type={} label=\"{}\"",
                el.id,
                el.html_tag_name.as_deref().unwrap_or("?"),
                el.node_type,
                label
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
