use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::planning::plan_model::ActionStep;

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub attempt: u32,

    pub kind: String,

    pub step_index: Option<usize>,
    pub action: Option<String>,
    pub element_id: Option<String>,

    pub outcome: Option<String>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(attempt: u32, kind: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            attempt,
            kind: kind.to_string(),
            step_index: None,
            action: None,
            element_id: None,
            outcome: None,
            detail: None,
        }
    }

    pub fn with_step(mut self, index: usize, step: &ActionStep) -> Self {
        self.step_index = Some(index);
        self.action = Some(step.action_type.to_string());
        self.element_id = step.element_id.clone();
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
