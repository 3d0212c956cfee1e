use std::fmt;

#[derive(Debug)]
pub enum AgentError {
    /// Reading a snapshot or config file, or appending to the trace, failed
    Io { path: String, source: std::io::Error },

    /// JSON parsing failed (snapshot file or planner output)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (problematic step, trace payloads)
    JsonSerialize { context: String, source: serde_json::Error },

    /// A planning request is missing one of its required fields
    MissingField(&'static str),

    /// The planner endpoint could not be reached or returned an error status
    PlannerRequest { endpoint: String, source: reqwest::Error },

    /// The planner answered, but not with a usable plan
    PlannerResponse(String),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path, source)
            }
            AgentError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            AgentError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            AgentError::MissingField(field) => {
                write!(f, "Missing required field: {}", field)
            }
            AgentError::PlannerRequest { endpoint, source } => {
                write!(f, "Planner request to {} failed: {}", endpoint, source)
            }
            AgentError::PlannerResponse(msg) => {
                write!(f, "Unusable planner response: {}", msg)
            }
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentError::Io { source, .. } => Some(source),
            AgentError::JsonParse { source, .. } => Some(source),
            AgentError::JsonSerialize { source, .. } => Some(source),
            AgentError::PlannerRequest { source, .. } => Some(source),
            _ => None,
        }
    }
}
