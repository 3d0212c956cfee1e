use std::cell::RefCell;
use std::rc::Rc;

use web_agent::agent::error::AgentError;
use web_agent::controls::control_model::ActionType;
use web_agent::controls::recommender::identify_special_controls;
use web_agent::dom::dom_model::{DomNode, WindowSize};
use web_agent::planning::{
    hints::format_recommendations_to_text,
    plan_model::{ActionStep, LogRole, PlanningContext, ProcessPageRequest, ReplanRequest},
    planner::{MockPlanner, OllamaPlanner, Planner},
    service::PlanningService,
};

use crate::common::utils::{button, div, page_with_picker};

mod common;

// =========================================================================
// Helpers
// =========================================================================

type Seen = Rc<RefCell<Vec<(String, String, Vec<(LogRole, String)>)>>>;

/// Remembers what the service handed to the planner.
struct RecordingPlanner {
    seen: Seen,
}

impl Planner for RecordingPlanner {
    fn plan(&self, instruction: &str, context: &PlanningContext<'_>) -> Result<Vec<ActionStep>, AgentError> {
        self.seen.borrow_mut().push((
            instruction.to_string(),
            context.action_context.clone(),
            context
                .previous_logs
                .iter()
                .map(|l| (l.role, l.content.clone()))
                .collect(),
        ));
        Ok(vec![ActionStep::wait("recorded", 1)])
    }
}

fn recording_service() -> (PlanningService, Seen) {
    let seen = Seen::default();
    let planner = RecordingPlanner { seen: Rc::clone(&seen) };
    (PlanningService::new(Box::new(planner)), seen)
}

fn request(instruction: &str, dom: DomNode) -> ProcessPageRequest {
    let recommendations = identify_special_controls(&dom, instruction);
    ProcessPageRequest {
        instruction: instruction.into(),
        dom_tree: dom,
        screenshot_data: "data:image/png;base64,AAAA".into(),
        url: "https://example.com".into(),
        window_size: WindowSize { width: 1024, height: 768 },
        recommendations,
    }
}

fn failed_click() -> ActionStep {
    ActionStep {
        action_type: ActionType::Click,
        description: "Click submit".into(),
        element_id: Some("submit".into()),
        value: None,
        parameters: None,
    }
}

fn replan_request(instruction: &str, dom: DomNode) -> ReplanRequest {
    let page = request(instruction, dom);
    ReplanRequest {
        instruction: page.instruction,
        problematic_step: failed_click(),
        dom_tree: page.dom_tree,
        screenshot_data: page.screenshot_data,
        url: page.url,
        window_size: page.window_size,
        recommendations: page.recommendations,
    }
}

// =========================================================================
// Hint text
// =========================================================================

#[test]
fn hint_text_for_date_picker() {
    let recs = identify_special_controls(&page_with_picker(), "Need it by March 15, 2024 thanks.");
    let text = format_recommendations_to_text(&recs);

    let expected = "Special Control Hints:\n\
1. For element (ID: 'dp1'):\n\
\x20  User seems to want to interact with this regarding: \"March 15, 2024\".\n\
\x20  Suggested interaction steps:\n\
\x20  1) Click the identified date picker input (id: dp1) to open the calendar. (Action: CLICK).\n\
\x20  2) Directly input normalized date \"03/15/2024\" into the date picker (id: dp1). (Action: INPUT, Value: \"03/15/2024\").\n\
\x20  Confidence in this hint: 75%.\n";
    assert_eq!(text, expected);
}

#[test]
fn hint_text_is_empty_without_recommendations() {
    assert_eq!(format_recommendations_to_text(&[]), "");
}

#[test]
fn hint_text_numbers_each_recommendation() {
    let dom = div(
        "root",
        vec![
            common::utils::input("a", &[("type", "date")]),
            common::utils::input("b", &[("type", "date")]),
        ],
    );
    let text = format_recommendations_to_text(&identify_special_controls(&dom, "01/02/2025"));
    assert!(text.contains("1. For element (ID: 'a'):"));
    assert!(text.contains("2. For element (ID: 'b'):"));
}

// =========================================================================
// Service
// =========================================================================

#[test]
fn process_page_passes_hints_as_action_context() {
    let (service, seen) = recording_service();

    let response = service
        .process_page(&request("Book 03/15/2024", page_with_picker()))
        .unwrap();

    assert_eq!(response.message, "Plan generated successfully.");
    assert_eq!(response.plan.goal, "Book 03/15/2024");
    assert_eq!(response.plan.steps.len(), 1);

    let seen = seen.borrow();
    assert_eq!(seen[0].0, "Book 03/15/2024");
    assert!(seen[0].1.starts_with("Special Control Hints:\n"));
    assert!(seen[0].2.is_empty());
}

#[test]
fn process_page_without_hints_has_empty_context() {
    let (service, seen) = recording_service();

    service
        .process_page(&request("Search for shoes", div("root", vec![button("b", "Go")])))
        .unwrap();

    assert_eq!(seen.borrow()[0].1, "");
}

#[test]
fn replan_carries_failed_step_and_conversation() {
    let (service, seen) = recording_service();

    let response = service
        .replan(&replan_request("Book 03/15/2024", page_with_picker()))
        .unwrap();
    assert_eq!(response.message, "Replan successful.");
    assert_eq!(response.plan.goal, "Book 03/15/2024");

    let seen = seen.borrow();
    let (_, context, logs) = &seen[0];
    assert!(context.starts_with("Replanning after failed step: Click submit\nSpecial Control Hints:\n"));
    assert!(!context.ends_with('\n'));

    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].0, LogRole::Assistant);
    assert!(logs[0].1.starts_with("I previously tried this step: {"));
    assert!(logs[0].1.contains("\"elementId\":\"submit\""));
    assert_eq!(logs[1].0, LogRole::User);
    assert!(logs[1].1.starts_with("This step failed"));
}

#[test]
fn replan_without_hints_only_mentions_failed_step() {
    let (service, seen) = recording_service();

    service
        .replan(&replan_request("Click the button", div("root", vec![button("submit", "Go")])))
        .unwrap();
    assert_eq!(seen.borrow()[0].1, "Replanning after failed step: Click submit");
}

#[test]
fn missing_fields_are_rejected_before_planning() {
    let (service, seen) = recording_service();

    let mut no_instruction = request("Book 03/15/2024", page_with_picker());
    no_instruction.instruction = "  ".into();
    assert!(matches!(
        service.process_page(&no_instruction),
        Err(AgentError::MissingField("instruction"))
    ));

    let mut no_screenshot = request("Book 03/15/2024", page_with_picker());
    no_screenshot.screenshot_data.clear();
    assert!(matches!(
        service.process_page(&no_screenshot),
        Err(AgentError::MissingField("screenshotData"))
    ));

    let empty_tree = request("Book 03/15/2024", DomNode::wrapper(vec![]));
    assert!(matches!(
        service.process_page(&empty_tree),
        Err(AgentError::MissingField("domTree"))
    ));

    let mut no_window = replan_request("Book 03/15/2024", page_with_picker());
    no_window.window_size = WindowSize { width: 0, height: 768 };
    assert!(matches!(
        service.replan(&no_window),
        Err(AgentError::MissingField("windowSize"))
    ));

    assert!(seen.borrow().is_empty());
}

// =========================================================================
// Request payloads
// =========================================================================

#[test]
fn empty_recommendations_are_omitted_from_payload() {
    let payload = request("Search", div("root", vec![]));
    let json = serde_json::to_value(&payload).unwrap();
    assert!(json.get("recommendations").is_none());
    assert_eq!(json["windowSize"]["width"], 1024);
    assert!(json.get("domTree").is_some());
    assert!(json.get("screenshotData").is_some());
}

#[test]
fn recommendations_travel_in_payload() {
    let payload = request("Book 03/15/2024", page_with_picker());
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["recommendations"][0]["detectedElementId"], "dp1");

    let back: ProcessPageRequest = serde_json::from_value(json).unwrap();
    assert_eq!(back.recommendations, payload.recommendations);
}

// =========================================================================
// Planners
// =========================================================================

#[test]
fn mock_planner_follows_hints() {
    let service = PlanningService::new(Box::new(MockPlanner::default()));
    let response = service
        .process_page(&request("Need it by March 15, 2024 thanks.", page_with_picker()))
        .unwrap();

    let steps = &response.plan.steps;
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].action_type, ActionType::Click);
    assert_eq!(steps[0].element_id.as_deref(), Some("dp1"));
    assert_eq!(steps[1].action_type, ActionType::Input);
    assert_eq!(steps[1].value.as_deref(), Some("03/15/2024"));
}

#[test]
fn mock_planner_waits_without_hints() {
    let service = PlanningService::new(Box::new(MockPlanner { default_wait_ms: 5 }));
    let response = service
        .process_page(&request("Search for shoes", div("root", vec![])))
        .unwrap();

    let steps = &response.plan.steps;
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].action_type, ActionType::Wait);
    assert_eq!(
        steps[0].parameters.as_ref().and_then(|p| p.get("milliseconds")).and_then(|v| v.as_u64()),
        Some(5)
    );
}

#[test]
fn ollama_prompt_lists_elements_and_context() {
    let page = request("Need it by March 15, 2024 thanks.", page_with_picker());
    let context = PlanningContext {
        screenshot: &page.screenshot_data,
        tree: &page.dom_tree,
        url: &page.url,
        window_size: page.window_size,
        action_context: format_recommendations_to_text(&page.recommendations),
        previous_logs: vec![],
        recommendations: &page.recommendations,
    };

    let prompt = OllamaPlanner::default().build_prompt(&page.instruction, &context);
    assert!(prompt.contains("GOAL: Need it by March 15, 2024 thanks."));
    assert!(prompt.contains("- URL: https://example.com"));
    assert!(prompt.contains("- Window: 1024x768"));
    assert!(prompt.contains("id=dp1 tag=input"));
    assert!(!prompt.contains("id=root"));
    assert!(prompt.contains("Special Control Hints:"));
}

#[test]
fn unreachable_ollama_is_a_request_error() {
    let planner = OllamaPlanner::new("http://127.0.0.1:9/api/generate", "none");
    let service = PlanningService::new(Box::new(planner));
    let result = service.process_page(&request("Search", div("root", vec![])));
    assert!(matches!(result, Err(AgentError::PlannerRequest { .. })));
}
