use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ir::NodeType;
use crate::text_metrics::NodeDimensions;

use super::validate::ValidationReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub node_type: NodeType,
    pub font_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_index: Option<usize>,
    pub angle: f64,
}

impl PositionedNode {
    pub fn new(text: &str, node_type: NodeType, dims: NodeDimensions, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            width: f64::from(dims.width),
            height: f64::from(dims.height),
            text: text.to_string(),
            node_type,
            font_size: dims.font_size,
            branch_index: None,
            child_index: None,
            angle: 0.0,
        }
    }

    pub fn with_indices(mut self, branch_index: usize, child_index: Option<usize>) -> Self {
        self.branch_index = Some(branch_index);
        self.child_index = child_index;
        self
    }

    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Strict AABB intersection; touching edges do not count.
    pub fn overlaps(&self, other: &PositionedNode) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    TopicToBranch,
    BranchToChild,
}

impl ConnectionKind {
    pub fn stroke_width(self) -> u32 {
        match self {
            ConnectionKind::TopicToBranch => 3,
            ConnectionKind::BranchToChild => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

impl From<&PositionedNode> for Endpoint {
    fn from(node: &PositionedNode) -> Self {
        Self {
            x: node.x,
            y: node.y,
            node_type: node.node_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
    pub from: Endpoint,
    pub to: Endpoint,
    pub branch_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_index: Option<usize>,
    pub stroke_width: u32,
}

/// Fixed x position of every role on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Columns {
    pub left_children: f64,
    pub left_branches: f64,
    pub topic: f64,
    pub right_branches: f64,
    pub right_children: f64,
}

impl Columns {
    pub fn branch_x(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left_branches,
            Side::Right => self.right_branches,
        }
    }

    pub fn child_x(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left_children,
            Side::Right => self.right_children,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSize {
    pub base_width: f64,
    pub base_height: f64,
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutParams {
    pub left_children_x: f64,
    pub left_branches_x: f64,
    pub topic_x: f64,
    pub topic_y: f64,
    pub right_branches_x: f64,
    pub right_children_x: f64,
    pub num_branches: usize,
    pub num_children: usize,
    pub base_width: f64,
    pub base_height: f64,
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub background: String,
}

impl LayoutParams {
    pub fn new(
        columns: &Columns,
        canvas: &CanvasSize,
        num_branches: usize,
        num_children: usize,
        background: &str,
    ) -> Self {
        Self {
            left_children_x: columns.left_children,
            left_branches_x: columns.left_branches,
            topic_x: columns.topic,
            topic_y: 0.0,
            right_branches_x: columns.right_branches,
            right_children_x: columns.right_children,
            num_branches,
            num_children,
            base_width: canvas.base_width,
            base_height: canvas.base_height,
            width: canvas.width,
            height: canvas.height,
            padding: canvas.padding,
            background: background.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub algorithm: String,
    pub positions: BTreeMap<String, PositionedNode>,
    pub connections: Vec<Connection>,
    pub params: LayoutParams,
    pub validation: ValidationReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LayoutResult {
    pub fn topic(&self) -> Option<&PositionedNode> {
        self.positions.get("topic")
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}
