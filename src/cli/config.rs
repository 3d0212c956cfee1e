use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::agent::agent::DEFAULT_MAX_REPLANS;
use crate::agent::executor::{DEFAULT_STEP_DELAY_MS, DEFAULT_WAIT_MS};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "web-agent",
    version,
    about = "Special-control hints and plan execution for a browser agent"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Planner: mock or ollama
    #[arg(long, global = true)]
    pub planner: Option<String>,

    /// Ollama API endpoint
    #[arg(long, global = true)]
    pub ollama_endpoint: Option<String>,

    /// Ollama model name
    #[arg(long, global = true)]
    pub ollama_model: Option<String>,

    /// Path to config file (default: web-agent.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print special-control recommendations for a captured page
    Recommend {
        /// Path to a page snapshot JSON file
        #[arg(long)]
        dom: String,

        /// Natural-language instruction
        #[arg(long)]
        instruction: String,

        /// Print planner hint text instead of JSON
        #[arg(long, default_value_t = false)]
        hints: bool,
    },

    /// Ask the planner for a plan and print it
    Plan {
        /// Path to a page snapshot JSON file
        #[arg(long)]
        dom: String,

        /// Natural-language instruction
        #[arg(long)]
        instruction: String,
    },

    /// Plan, execute, and replan on failure
    Run {
        /// Path to a page snapshot JSON file
        #[arg(long)]
        dom: String,

        /// Natural-language instruction
        #[arg(long)]
        instruction: String,

        /// Maximum replanning passes after a failed step
        #[arg(long)]
        max_replans: Option<u32>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `web-agent.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_mock")]
    pub kind: String,
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            kind: "mock".to_string(),
            endpoint: None,
            model: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default = "default_step_delay")]
    pub step_delay_ms: u64,

    #[serde(default = "default_wait")]
    pub default_wait_ms: u64,

    #[serde(default = "default_max_replans")]
    pub max_replans: u32,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            default_wait_ms: DEFAULT_WAIT_MS,
            max_replans: DEFAULT_MAX_REPLANS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default = "default_trace_path")]
    pub path: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            path: default_trace_path(),
        }
    }
}

// Serde default helpers
fn default_mock() -> String { "mock".to_string() }
fn default_step_delay() -> u64 { DEFAULT_STEP_DELAY_MS }
fn default_wait() -> u64 { DEFAULT_WAIT_MS }
fn default_max_replans() -> u32 { DEFAULT_MAX_REPLANS }
fn default_trace_path() -> String { "agent_trace.jsonl".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("web-agent.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "malformed config, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolution (CLI > config > defaults)
// ============================================================================

/// Planner settings after merging CLI flags over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSettings {
    pub kind: String,
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

pub fn resolve_planner(cli: &Cli, config: &AppConfig) -> PlannerSettings {
    PlannerSettings {
        kind: cli
            .planner
            .clone()
            .unwrap_or_else(|| config.planner.kind.clone()),
        endpoint: cli
            .ollama_endpoint
            .clone()
            .or_else(|| config.planner.endpoint.clone()),
        model: cli
            .ollama_model
            .clone()
            .or_else(|| config.planner.model.clone()),
    }
}
