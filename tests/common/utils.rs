#![allow(dead_code)]

use web_agent::dom::dom_model::{DomNode, ElementInfo};

pub fn fixture(name: &str) -> String {
    let base = std::env::current_dir().unwrap();
    base.join("tests")
        .join("fixtures")
        .join(name)
        .display()
        .to_string()
}

pub fn element(id: &str, tag: &str, node_type: &str, attrs: &[(&str, &str)]) -> ElementInfo {
    ElementInfo {
        id: id.into(),
        html_tag_name: Some(tag.into()),
        node_type: node_type.into(),
        is_visible: Some(true),
        attributes: attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        ..Default::default()
    }
}

pub fn div(id: &str, children: Vec<DomNode>) -> DomNode {
    DomNode::new(element(id, "div", "DIV", &[])).with_children(children)
}

pub fn input(id: &str, attrs: &[(&str, &str)]) -> DomNode {
    DomNode::new(element(id, "input", "INPUT_TEXT", attrs))
}

pub fn button(id: &str, label: &str) -> DomNode {
    DomNode::new(element(id, "button", "BUTTON", &[("aria-label", label)]))
}

/// root div with a single test-id date picker `dp1`.
pub fn page_with_picker() -> DomNode {
    div("root", vec![input("dp1", &[("data-testid", "date-picker-input")])])
}
