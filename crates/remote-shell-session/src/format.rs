//! Text rendering for listings and results.

use remote_shell_core::{ComponentInfo, Container, MethodInfo, traits::simple_type_name};

/// `name[SimpleType]`
#[must_use]
pub fn component_line(component: &ComponentInfo) -> String {
    format!("{}[{}]", component.name, simple_type_name(&component.type_name))
}

/// `SimpleReturn name(SimpleType param, ...)`
#[must_use]
pub fn method_line(method: &MethodInfo) -> String {
    method.signature()
}

/// Enumerated, 1-indexed candidate list.
#[must_use]
pub fn choice_list(methods: &[&MethodInfo]) -> String {
    methods
        .iter()
        .enumerate()
        .map(|(i, m)| format!("{}: {}", i + 1, m.signature()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty-print `text` if it is JSON, otherwise return it unchanged.
#[must_use]
pub fn pretty_result(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or_else(|| text.to_owned())
}

/// `type: ...` / `value: ...`
#[must_use]
pub fn container_text(container: &Container) -> String {
    format!("type: {}\nvalue: {}", container.type_name, container.value)
}
