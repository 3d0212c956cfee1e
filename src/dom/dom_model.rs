use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Bounding box reported by the capture layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
}

/// Snapshot of a single captured element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_hash_id: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub rect: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default)]
    pub node_type: String,
    #[serde(default, alias = "tagName", skip_serializing_if = "Option::is_none")]
    pub html_tag_name: Option<String>,
}

impl ElementInfo {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// A node in the captured tree. Wrapper nodes carry no element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomNode {
    pub element: Option<ElementInfo>,
    #[serde(default)]
    pub children: Vec<DomNode>,
}

impl DomNode {
    pub fn new(element: ElementInfo) -> Self {
        Self {
            element: Some(element),
            children: vec![],
        }
    }

    pub fn wrapper(children: Vec<DomNode>) -> Self {
        Self {
            element: None,
            children,
        }
    }

    pub fn with_children(mut self, children: Vec<DomNode>) -> Self {
        self.children = children;
        self
    }

    /// First element with `id`, in pre-order.
    pub fn find_element(&self, id: &str) -> Option<&ElementInfo> {
        self.iter()
            .filter_map(|node| node.element.as_ref())
            .find(|el| el.id == id)
    }

    /// Label used in log lines: tag name, falling back to node type.
    pub fn describe(&self) -> &str {
        match &self.element {
            Some(el) => el.html_tag_name.as_deref().unwrap_or(&el.node_type),
            None => "(wrapper)",
        }
    }
}

// Children are unlinked onto a heap stack so very deep trees drop without
// recursing once per level.
impl Drop for DomNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// A full page capture: tree plus the page metadata the planner needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomData {
    pub root_node: DomNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_string: Option<String>,
    pub url: String,
    pub window_size: WindowSize,
}
