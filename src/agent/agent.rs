use tracing::{info, warn};

use crate::{
    agent::{
        capture::{PageCapture, PageSnapshot},
        error::AgentError,
        executor::{FailedStep, PlanExecutor},
    },
    controls::{control_model::SpecialControlRecommendation, recommender::identify_special_controls},
    planning::{
        plan_model::{ActionPlan, ProcessPageRequest, ReplanRequest},
        planner::Planner,
        service::PlanningService,
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
};

pub const DEFAULT_MAX_REPLANS: u32 = 2;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub instruction: String,
    /// Planning passes made, the first plan included.
    pub attempts: u32,
    pub recommendations: Vec<SpecialControlRecommendation>,
    pub final_plan: ActionPlan,
    pub success: bool,
    pub failed: Option<FailedStep>,
}

/// Demo driver: capture, hint, plan, execute, and replan on failure.
pub struct WebAgent {
    service: PlanningService,
    executor: PlanExecutor,
    tracer: TraceLogger,
    pub max_replans: u32,
}

impl WebAgent {
    pub fn new(planner: Box<dyn Planner>, executor: PlanExecutor, tracer: TraceLogger) -> Self {
        Self {
            service: PlanningService::new(planner),
            executor,
            tracer,
            max_replans: DEFAULT_MAX_REPLANS,
        }
    }

    pub fn with_max_replans(mut self, max_replans: u32) -> Self {
        self.max_replans = max_replans;
        self
    }

    pub fn run(&self, capture: &mut dyn PageCapture, instruction: &str) -> Result<RunReport, AgentError> {
        self.tracer.begin_run(instruction);
        let mut snapshot = capture.capture()?;
        let recommendations = identify_special_controls(&snapshot.dom.root_node, instruction);
        info!(count = recommendations.len(), "special control recommendations");

        let request = process_page_request(&snapshot, instruction, recommendations.clone());
        let mut plan = self.service.process_page(&request)?.plan;
        self.tracer.log(
            &TraceEvent::now(1, "plan").with_detail(format!("{} steps", plan.steps.len())),
        );

        let mut attempts = 1;
        let mut recommendations = recommendations;

        loop {
            let outcome = self
                .executor
                .execute_plan(&plan, &snapshot.dom.root_node, &self.tracer, attempts);

            let failed = match outcome.failed {
                None => {
                    info!(attempts, "plan completed");
                    return Ok(RunReport {
                        instruction: instruction.to_string(),
                        attempts,
                        recommendations,
                        final_plan: plan,
                        success: true,
                        failed: None,
                    });
                }
                Some(failed) => failed,
            };

            if attempts > self.max_replans {
                warn!(attempts, "replan budget exhausted");
                return Ok(RunReport {
                    instruction: instruction.to_string(),
                    attempts,
                    recommendations,
                    final_plan: plan,
                    success: false,
                    failed: Some(failed),
                });
            }

            // The page may have moved on; plan against a fresh capture.
            snapshot = capture.capture()?;
            recommendations = identify_special_controls(&snapshot.dom.root_node, instruction);

            let request = ReplanRequest {
                instruction: instruction.to_string(),
                problematic_step: failed.step.clone(),
                dom_tree: snapshot.dom.root_node.clone(),
                screenshot_data: snapshot.screenshot.clone(),
                url: snapshot.dom.url.clone(),
                window_size: snapshot.dom.window_size,
                recommendations: recommendations.clone(),
            };

            attempts += 1;
            plan = self.service.replan(&request)?.plan;
            self.tracer.log(
                &TraceEvent::now(attempts, "replan")
                    .with_detail(format!("after failed step: {}", failed.step.description)),
            );
        }
    }
}

pub fn process_page_request(
    snapshot: &PageSnapshot,
    instruction: &str,
    recommendations: Vec<SpecialControlRecommendation>,
) -> ProcessPageRequest {
    ProcessPageRequest {
        instruction: instruction.to_string(),
        dom_tree: snapshot.dom.root_node.clone(),
        screenshot_data: snapshot.screenshot.clone(),
        url: snapshot.dom.url.clone(),
        window_size: snapshot.dom.window_size,
        recommendations,
    }
}
