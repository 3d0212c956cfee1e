use crate::dom::dom_model::ElementInfo;

pub type ControlRule = fn(&ElementInfo) -> bool;

/// Independent heuristics; an element matching any one is a date picker.
pub const DATE_PICKER_RULES: &[ControlRule] = &[
    has_date_picker_test_id,
    has_date_picker_aria_label,
    has_date_placeholder,
    is_native_date_input,
];

pub fn is_date_picker(el: &ElementInfo) -> bool {
    DATE_PICKER_RULES.iter().any(|rule| rule(el))
}

fn has_date_picker_test_id(el: &ElementInfo) -> bool {
    el.attr("data-testid") == Some("date-picker-input")
}

fn has_date_picker_aria_label(el: &ElementInfo) -> bool {
    el.attr("aria-label")
        .map(|label| label.to_lowercase().contains("date picker"))
        .unwrap_or(false)
}

fn has_date_placeholder(el: &ElementInfo) -> bool {
    el.attr("placeholder")
        .map(|p| p.to_lowercase().contains("date"))
        .unwrap_or(false)
}

fn is_native_date_input(el: &ElementInfo) -> bool {
    let is_input = el
        .html_tag_name
        .as_deref()
        .map(|tag| tag.eq_ignore_ascii_case("input"))
        .unwrap_or(false);

    is_input && el.attr("type") == Some("date")
}
