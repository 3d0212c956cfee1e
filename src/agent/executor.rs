use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    controls::control_model::ActionType,
    dom::dom_model::DomNode,
    planning::plan_model::{ActionPlan, ActionStep},
    trace::{logger::TraceLogger, trace::TraceEvent},
};

pub const DEFAULT_STEP_DELAY_MS: u64 = 200;
pub const DEFAULT_WAIT_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct FailedStep {
    pub index: usize,
    pub step: ActionStep,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub completed_steps: usize,
    pub failed: Option<FailedStep>,
}

/// Simulated executor. Steps are checked against the captured tree instead
/// of being sent to a browser, so a plan that targets elements the page does
/// not have fails the way it would live.
pub struct PlanExecutor {
    pub step_delay: Duration,
    pub default_wait_ms: u64,
}

impl Default for PlanExecutor {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_millis(DEFAULT_STEP_DELAY_MS),
            default_wait_ms: DEFAULT_WAIT_MS,
        }
    }
}

impl PlanExecutor {
    pub fn new(step_delay_ms: u64, default_wait_ms: u64) -> Self {
        Self {
            step_delay: Duration::from_millis(step_delay_ms),
            default_wait_ms,
        }
    }

    pub fn execute_plan(
        &self,
        plan: &ActionPlan,
        dom: &DomNode,
        tracer: &TraceLogger,
        attempt: u32,
    ) -> ExecutionOutcome {
        info!(goal = %plan.goal, steps = plan.steps.len(), "executing plan");

        for (index, step) in plan.steps.iter().enumerate() {
            if !self.step_delay.is_zero() {
                thread::sleep(self.step_delay);
            }

            let trace = TraceEvent::now(attempt, "step").with_step(index, step);
            match self.execute_step(step, dom) {
                Ok(()) => tracer.log(&trace.with_outcome("ok")),
                Err(reason) => {
                    warn!(index, step = %step.description, %reason, "step failed");
                    tracer.log(&trace.with_outcome("failed").with_detail(&reason));
                    return ExecutionOutcome {
                        success: false,
                        completed_steps: index,
                        failed: Some(FailedStep {
                            index,
                            step: step.clone(),
                            reason,
                        }),
                    };
                }
            }
        }

        ExecutionOutcome {
            success: true,
            completed_steps: plan.steps.len(),
            failed: None,
        }
    }

    fn execute_step(&self, step: &ActionStep, dom: &DomNode) -> Result<(), String> {
        let params = step
            .parameters
            .as_ref()
            .and_then(|p| serde_json::to_string(p).ok())
            .unwrap_or_else(|| "{}".into());

        match step.action_type {
            ActionType::Click | ActionType::Tap => {
                let id = require_element(step, dom)?;
                debug!("{} on element {} with params {}", step.action_type, id, params);
            }
            ActionType::Input | ActionType::Type => {
                let id = require_element(step, dom)?;
                let value = require_value(step)?;
                debug!("{} \"{}\" into element {} with params {}", step.action_type, value, id, params);
            }
            ActionType::Scroll => {
                debug!(
                    "{} on {} with params {}",
                    step.action_type,
                    step.element_id.as_deref().unwrap_or("document"),
                    params
                );
            }
            ActionType::Navigate => {
                let url = require_value(step)?;
                debug!("{} to {} with params {}", step.action_type, url, params);
            }
            ActionType::Wait => {
                let ms = step
                    .parameters
                    .as_ref()
                    .and_then(|p| p.get("milliseconds"))
                    .and_then(|v| v.as_u64())
                    .unwrap_or(self.default_wait_ms);
                debug!("{} for {}ms", step.action_type, ms);
                thread::sleep(Duration::from_millis(ms));
            }
            ActionType::Unknown => {
                warn!(step = %step.description, params = %params, "unknown action type, skipping");
            }
        }

        Ok(())
    }
}

fn require_element<'a>(step: &'a ActionStep, dom: &DomNode) -> Result<&'a str, String> {
    let id = step
        .element_id
        .as_deref()
        .ok_or_else(|| format!("{} step has no target element", step.action_type))?;

    match dom.find_element(id) {
        Some(_) => Ok(id),
        None => Err(format!("element '{}' not found on page", id)),
    }
}

fn require_value(step: &ActionStep) -> Result<&str, String> {
    step.value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("{} step has no value", step.action_type))
}
