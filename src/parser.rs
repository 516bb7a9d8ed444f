use serde_json::Value;
use tracing::{debug, warn};

use crate::ir::{Branch, Child, MindMap};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpecError {
    #[error("spec is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("spec must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("spec has no usable topic")]
    MissingTopic,
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Display string of a spec node: `label` wins over `text`, and a bare
/// string node is its own label.
pub fn get_text(node: &Value) -> Option<String> {
    if node.is_string() {
        return non_blank(Some(node));
    }
    non_blank(node.get("label")).or_else(|| non_blank(node.get("text")))
}

fn node_children(node: &Value) -> &[Value] {
    node.get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn parse_topic(spec: &Value) -> Result<String, SpecError> {
    match spec.get("topic") {
        Some(Value::String(topic)) => Ok(topic.trim().to_string()),
        Some(node @ Value::Object(_)) => get_text(node).ok_or(SpecError::MissingTopic),
        _ => Err(SpecError::MissingTopic),
    }
}

/// Normalizes a spec into the canonical tree.
///
/// Branches or children without a display string are dropped with a warning;
/// the survivors keep their original indices.
pub fn parse_spec(spec: &Value) -> Result<MindMap, SpecError> {
    if !spec.is_object() {
        return Err(SpecError::NotAnObject(kind_name(spec)));
    }
    let topic = parse_topic(spec)?;
    let mut map = MindMap::new(topic);

    for (branch_index, raw_branch) in node_children(spec).iter().enumerate() {
        let Some(label) = get_text(raw_branch) else {
            warn!(branch_index, "skipping branch without label or text");
            continue;
        };
        let mut children = Vec::new();
        for (child_index, raw_child) in node_children(raw_branch).iter().enumerate() {
            let Some(child_label) = get_text(raw_child) else {
                warn!(branch_index, child_index, "skipping child without label or text");
                continue;
            };
            let nested = node_children(raw_child).len();
            if nested > 0 {
                debug!(
                    branch_index,
                    child_index, nested, "ignoring nodes deeper than two levels"
                );
            }
            children.push(Child {
                index: child_index,
                label: child_label,
            });
        }
        map.branches.push(Branch {
            index: branch_index,
            label,
            children,
        });
    }

    Ok(map)
}

/// Parses JSON text, accepting relaxed JSON5 when strict JSON fails.
pub fn parse_value(input: &str) -> Result<Value, SpecError> {
    match serde_json::from_str::<Value>(input) {
        Ok(value) => Ok(value),
        Err(strict) => json5::from_str::<Value>(input)
            .map_err(|_| SpecError::InvalidJson(strict.to_string())),
    }
}

pub fn parse_spec_str(input: &str) -> Result<MindMap, SpecError> {
    parse_spec(&parse_value(input)?)
}
