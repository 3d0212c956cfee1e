use serde::{Deserialize, Serialize};

use crate::{agent::error::AgentError, dom::dom_model::DomData};

/// One capture of the page: tree, metadata and screenshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(flatten)]
    pub dom: DomData,
    /// Base64 image data URL.
    #[serde(default, rename = "screenshotData")]
    pub screenshot: String,
}

/// Source of page snapshots. A live browser would implement this; the demo
/// driver reads snapshots from disk.
pub trait PageCapture {
    fn capture(&mut self) -> Result<PageSnapshot, AgentError>;
}

/// Re-reads a JSON snapshot file on every capture.
pub struct FileCapture {
    path: String,
}

impl FileCapture {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

impl PageCapture for FileCapture {
    fn capture(&mut self) -> Result<PageSnapshot, AgentError> {
        load_snapshot(&self.path)
    }
}

pub fn load_snapshot(path: &str) -> Result<PageSnapshot, AgentError> {
    let content = std::fs::read_to_string(path).map_err(|source| AgentError::Io {
        path: path.to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| AgentError::JsonParse {
        context: format!("snapshot {}", path),
        source,
    })
}
