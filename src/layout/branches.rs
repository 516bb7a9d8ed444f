use std::collections::BTreeMap;

use crate::ir::{Branch, NodeType, branch_id, child_id};
use crate::text_metrics::TextMeasurer;

use super::sides::SideAllocation;
use super::{Columns, PositionedNode, Side};

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn child_ys(branch: &Branch, positions: &BTreeMap<String, PositionedNode>) -> Vec<f64> {
    branch
        .children
        .iter()
        .filter_map(|child| positions.get(&child_id(branch.index, child.index)))
        .map(|node| node.y)
        .collect()
}

/// Y of a branch before side translation.
///
/// Branches with placed children sit at the arithmetic mean of the children
/// (not the midpoint of their span). Childless branches are spread by index
/// around zero.
pub fn branch_y(
    branch: &Branch,
    branch_count: usize,
    childless_spacing: f64,
    positions: &BTreeMap<String, PositionedNode>,
) -> f64 {
    match mean(&child_ys(branch, positions)) {
        Some(y) => y,
        None => (branch.index as f64 - (branch_count / 2) as f64) * childless_spacing,
    }
}

/// Inserts every branch at its column x and centered y.
pub fn center_branches(
    sides: &SideAllocation<'_>,
    columns: &Columns,
    childless_spacing: f64,
    measurer: &mut TextMeasurer,
    positions: &mut BTreeMap<String, PositionedNode>,
) {
    let branch_count = sides.len();
    for (side, branches) in sides.sides() {
        for branch in branches {
            let y = branch_y(branch, branch_count, childless_spacing, positions);
            let dims = measurer.measure(&branch.label, NodeType::Branch);
            let node = PositionedNode::new(
                &branch.label,
                NodeType::Branch,
                dims,
                columns.branch_x(side),
                y,
            )
            .with_indices(branch.index, None);
            positions.insert(branch_id(branch.index), node);
        }
    }
}

/// Mean branch y of one side, if the side has any placed branch.
pub fn side_center(
    branches: &[&Branch],
    positions: &BTreeMap<String, PositionedNode>,
) -> Option<f64> {
    let ys: Vec<f64> = branches
        .iter()
        .filter_map(|branch| positions.get(&branch_id(branch.index)))
        .map(|node| node.y)
        .collect();
    mean(&ys)
}

/// Shifts each side vertically so its mean branch y is zero.
///
/// The sides move independently and the topic never moves. Returns the
/// offset that was removed from each side.
pub fn translate_sides(
    sides: &SideAllocation<'_>,
    positions: &mut BTreeMap<String, PositionedNode>,
) -> Vec<(Side, f64)> {
    let mut applied = Vec::new();
    for (side, branches) in sides.sides() {
        let Some(center) = side_center(branches, positions) else {
            continue;
        };
        for branch in branches {
            if let Some(node) = positions.get_mut(&branch_id(branch.index)) {
                node.y -= center;
            }
            for child in &branch.children {
                if let Some(node) = positions.get_mut(&child_id(branch.index, child.index)) {
                    node.y -= center;
                }
            }
        }
        applied.push((side, center));
    }
    applied
}
