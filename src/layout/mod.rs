pub(crate) mod branches;
pub(crate) mod canvas;
pub(crate) mod column;
pub(crate) mod connections;
mod error;
pub(crate) mod overlap;
pub(crate) mod sides;
pub(crate) mod types;
pub(crate) mod validate;

pub use error::LayoutError;
pub use overlap::{min_center_distance, required_separation};
pub use types::*;
pub use validate::{Severity, ValidationIssue, ValidationReport};

use branches::{center_branches, translate_sides};
use canvas::size_canvas;
use column::stack_children;
use connections::build_connections;
use error::compute_error_layout;
use overlap::resolve_overlaps;
use sides::allocate_sides;
use validate::validate_layout;

use std::collections::BTreeMap;

use tracing::{debug, error};

use crate::config::LayoutConfig;
use crate::ir::{MindMap, NodeType, child_id, topic_id};
use crate::parser::{get_text, parse_spec, parse_spec_str};
use crate::text_metrics::{NodeDimensions, TextMeasurer};

pub const ALGORITHM: &str = "simple_balanced_layout";

/// State owned by a single layout call.
///
/// The memo table starts empty for every call, so nothing measured for one
/// mind map can leak into another.
pub struct LayoutContext<'a> {
    pub config: &'a LayoutConfig,
    pub measurer: TextMeasurer,
}

impl<'a> LayoutContext<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            measurer: TextMeasurer::new(),
        }
    }

    pub fn measure(&mut self, text: &str, node_type: NodeType) -> NodeDimensions {
        self.measurer.measure(text, node_type)
    }
}

/// Column x positions, derived from the widest box of each role so that
/// neighbouring columns never touch.
pub(crate) fn column_positions(
    topic: NodeDimensions,
    max_branch_width: u32,
    max_child_width: u32,
    config: &LayoutConfig,
) -> Columns {
    let branch_offset =
        f64::from(topic.width) / 2.0 + config.branch_gap + f64::from(max_branch_width) / 2.0;
    let child_offset = branch_offset
        + f64::from(max_branch_width) / 2.0
        + config.child_gap
        + f64::from(max_child_width) / 2.0;
    Columns {
        left_children: -child_offset,
        left_branches: -branch_offset,
        topic: 0.0,
        right_branches: branch_offset,
        right_children: child_offset,
    }
}

pub(crate) fn check_config(config: &LayoutConfig) -> Result<(), LayoutError> {
    let fields = [
        ("branch_gap", config.branch_gap),
        ("child_gap", config.child_gap),
        ("childless_spacing", config.childless_spacing),
        ("gap_base", config.gap_base),
        ("gap_font_factor", config.gap_font_factor),
        ("boundary_gap_multiplier", config.boundary_gap_multiplier),
        ("canvas.padding_x", config.canvas.padding_x),
        ("canvas.padding_y", config.canvas.padding_y),
        ("canvas.min_width", config.canvas.min_width),
        ("canvas.min_height", config.canvas.min_height),
        ("overlap.base_separation", config.overlap.base_separation),
        ("overlap.long_text_bonus", config.overlap.long_text_bonus),
        ("validation.warning_threshold", config.validation.warning_threshold),
        ("validation.critical_threshold", config.validation.critical_threshold),
    ];
    for (field, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(LayoutError::InvalidConfig { field, value });
        }
    }
    Ok(())
}

fn check_finite(positions: &BTreeMap<String, PositionedNode>) -> Result<(), LayoutError> {
    match positions
        .iter()
        .find(|(_, node)| !node.x.is_finite() || !node.y.is_finite())
    {
        Some((id, _)) => Err(LayoutError::NonFiniteCoordinate { id: id.clone() }),
        None => Ok(()),
    }
}

/// Runs the full pipeline, surfacing internal failures as errors.
///
/// Stages run strictly in order because each reads the coordinates the
/// previous one finalized: stack, center, translate, resolve overlaps, then
/// connections, canvas and validation on the final geometry.
pub fn try_compute_layout(
    map: &MindMap,
    config: &LayoutConfig,
) -> Result<LayoutResult, LayoutError> {
    check_config(config)?;
    let mut ctx = LayoutContext::new(config);
    let mut positions: BTreeMap<String, PositionedNode> = BTreeMap::new();

    let topic_dims = ctx.measure(&map.topic, NodeType::Topic);
    positions.insert(
        topic_id(),
        PositionedNode::new(&map.topic, NodeType::Topic, topic_dims, 0.0, 0.0),
    );

    let mut max_branch_width = 0;
    let mut max_child_width = 0;
    for branch in &map.branches {
        let branch_dims = ctx.measure(&branch.label, NodeType::Branch);
        max_branch_width = max_branch_width.max(branch_dims.width);
        for child in &branch.children {
            let child_dims = ctx.measure(&child.label, NodeType::Child);
            max_child_width = max_child_width.max(child_dims.width);
        }
    }
    let columns = column_positions(topic_dims, max_branch_width, max_child_width, ctx.config);

    let sides = allocate_sides(&map.branches);
    if sides.is_empty() {
        debug!(topic = %map.topic, "no branches; laying out the topic alone");
    }
    debug!(
        branches = sides.len(),
        right = sides.right.len(),
        left = sides.left.len(),
        "allocated sides"
    );

    for (side, branches) in sides.sides() {
        for entry in stack_children(side, branches, &mut ctx.measurer, ctx.config) {
            let node = PositionedNode::new(
                entry.text,
                NodeType::Child,
                entry.dims,
                columns.child_x(side),
                entry.y,
            )
            .with_indices(entry.branch_index, Some(entry.child_index));
            positions.insert(child_id(entry.branch_index, entry.child_index), node);
        }
    }

    center_branches(
        &sides,
        &columns,
        ctx.config.childless_spacing,
        &mut ctx.measurer,
        &mut positions,
    );
    let offsets = translate_sides(&sides, &mut positions);
    debug!(?offsets, "translated sides to the topic origin");

    let outcome = resolve_overlaps(&mut positions, &ctx.config.overlap);
    debug!(?outcome, "overlap resolution finished");
    check_finite(&positions)?;

    let connections = build_connections(map, &positions);
    let canvas = size_canvas(positions.values(), &ctx.config.canvas);
    let validation = validate_layout(map, &positions, &ctx.config.validation);
    debug!(summary = %validation.summary, measured = ctx.measurer.len(), "layout complete");

    Ok(LayoutResult {
        algorithm: ALGORITHM.to_string(),
        params: LayoutParams::new(
            &columns,
            &canvas,
            map.branches.len(),
            map.child_count(),
            &ctx.config.background,
        ),
        positions,
        connections,
        validation,
        error: None,
    })
}

/// Lays out a canonical mind map. Never fails: internal errors degrade to a
/// topic-only layout with an error note.
pub fn compute_layout(map: &MindMap, config: &LayoutConfig) -> LayoutResult {
    match try_compute_layout(map, config) {
        Ok(result) => result,
        Err(err) => {
            error!(%err, "layout failed; falling back to topic-only layout");
            compute_error_layout(&map.topic, &err.to_string(), config)
        }
    }
}

fn fallback_topic(spec: &serde_json::Value) -> String {
    match spec.get("topic") {
        Some(serde_json::Value::String(topic)) => topic.trim().to_string(),
        Some(node) => get_text(node).unwrap_or_default(),
        None => String::new(),
    }
}

/// Topic-only layout for a spec that could not be laid out.
pub fn spec_error_layout(
    spec: &serde_json::Value,
    note: &str,
    config: &LayoutConfig,
) -> LayoutResult {
    compute_error_layout(&fallback_topic(spec), note, config)
}

/// Lays out a raw spec as produced by the spec-generation collaborator.
pub fn layout_spec(spec: &serde_json::Value, config: &LayoutConfig) -> LayoutResult {
    match parse_spec(spec) {
        Ok(map) => compute_layout(&map, config),
        Err(err) => {
            error!(%err, "unusable mind map spec");
            spec_error_layout(spec, &err.to_string(), config)
        }
    }
}

/// Same as [`layout_spec`] for spec text.
pub fn layout_spec_str(input: &str, config: &LayoutConfig) -> LayoutResult {
    match parse_spec_str(input) {
        Ok(map) => compute_layout(&map, config),
        Err(err) => {
            error!(%err, "unusable mind map spec");
            compute_error_layout("", &err.to_string(), config)
        }
    }
}
