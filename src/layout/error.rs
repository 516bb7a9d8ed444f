use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::ir::{NodeType, topic_id};
use crate::text_metrics::estimate_dimensions;

use super::canvas::size_canvas;
use super::validate::ValidationReport;
use super::{ALGORITHM, LayoutParams, LayoutResult, PositionedNode, check_config, column_positions};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid layout config: {field} must be finite and non-negative, got {value}")]
    InvalidConfig { field: &'static str, value: f64 },
    #[error("node {id} ended up at a non-finite position")]
    NonFiniteCoordinate { id: String },
}

/// Topic-only layout carrying an error note.
pub(crate) fn compute_error_layout(topic: &str, note: &str, config: &LayoutConfig) -> LayoutResult {
    let defaults = LayoutConfig::default();
    let config = if check_config(config).is_ok() {
        config
    } else {
        &defaults
    };
    let dims = estimate_dimensions(topic, NodeType::Topic);
    let topic_node = PositionedNode::new(topic, NodeType::Topic, dims, 0.0, 0.0);
    let columns = column_positions(dims, 0, 0, config);
    let canvas = size_canvas([&topic_node], &config.canvas);
    let mut positions = BTreeMap::new();
    positions.insert(topic_id(), topic_node);
    LayoutResult {
        algorithm: ALGORITHM.to_string(),
        positions,
        connections: Vec::new(),
        params: LayoutParams::new(&columns, &canvas, 0, 0, &config.background),
        validation: ValidationReport::failed(note),
        error: Some(note.to_string()),
    }
}
