use tracing::info;

use crate::agent::agent::{WebAgent, process_page_request};
use crate::agent::capture::{FileCapture, load_snapshot};
use crate::agent::executor::PlanExecutor;
use crate::cli::config::{AppConfig, PlannerSettings};
use crate::controls::recommender::identify_special_controls;
use crate::planning::hints::format_recommendations_to_text;
use crate::planning::planner::{
    DEFAULT_OLLAMA_ENDPOINT, DEFAULT_OLLAMA_MODEL, MockPlanner, OllamaPlanner, Planner,
};
use crate::planning::service::PlanningService;
use crate::trace::logger::TraceLogger;

// ============================================================================
// recommend subcommand
// ============================================================================

pub fn cmd_recommend(dom_path: &str, instruction: &str, hints: bool) -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", render_recommendations(dom_path, instruction, hints)?);
    Ok(())
}

/// Recommendations for a snapshot file, as pretty JSON or as hint text.
pub fn render_recommendations(
    dom_path: &str,
    instruction: &str,
    hints: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(dom_path)?;
    let recommendations = identify_special_controls(&snapshot.dom.root_node, instruction);
    info!(count = recommendations.len(), "recommendations computed");

    if hints {
        return Ok(format_recommendations_to_text(&recommendations));
    }

    let mut json = serde_json::to_string_pretty(&recommendations)?;
    json.push('\n');
    Ok(json)
}

// ============================================================================
// plan subcommand
// ============================================================================

pub fn cmd_plan(
    dom_path: &str,
    instruction: &str,
    planner: &PlannerSettings,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(dom_path)?;
    let recommendations = identify_special_controls(&snapshot.dom.root_node, instruction);
    let request = process_page_request(&snapshot, instruction, recommendations);

    let service = PlanningService::new(build_planner(planner, config));
    let response = service.process_page(&request)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

// ============================================================================
// run subcommand
// ============================================================================

/// Run the demo driver and return whether the plan completed.
pub fn cmd_run(
    dom_path: &str,
    instruction: &str,
    max_replans: Option<u32>,
    planner: &PlannerSettings,
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let executor = PlanExecutor::new(config.executor.step_delay_ms, config.executor.default_wait_ms);
    let tracer = TraceLogger::new(&config.trace.path);
    if tracer.is_enabled() {
        info!(path = %config.trace.path, "appending execution trace");
    }
    let agent = WebAgent::new(build_planner(planner, config), executor, tracer)
        .with_max_replans(max_replans.unwrap_or(config.executor.max_replans));

    let mut capture = FileCapture::new(dom_path);
    let report = agent.run(&mut capture, instruction)?;

    println!(
        "{} after {} planning pass(es): {} steps in final plan, {} recommendation(s)",
        if report.success { "Completed" } else { "Failed" },
        report.attempts,
        report.final_plan.steps.len(),
        report.recommendations.len()
    );
    if let Some(failed) = &report.failed {
        println!("  step {} \"{}\": {}", failed.index + 1, failed.step.description, failed.reason);
    }

    Ok(report.success)
}

// ============================================================================
// Helpers
// ============================================================================

/// Build the planner named in the resolved settings. Unknown names fall back
/// to the mock planner.
pub fn build_planner(settings: &PlannerSettings, config: &AppConfig) -> Box<dyn Planner> {
    match settings.kind.as_str() {
        "ollama" => {
            let endpoint = settings.endpoint.as_deref().unwrap_or(DEFAULT_OLLAMA_ENDPOINT);
            let model = settings.model.as_deref().unwrap_or(DEFAULT_OLLAMA_MODEL);
            Box::new(OllamaPlanner::new(endpoint, model))
        }
        _ => Box::new(MockPlanner {
            default_wait_ms: config.executor.default_wait_ms,
        }),
    }
}
