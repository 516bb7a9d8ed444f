use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::OverlapConfig;
use crate::ir::NodeType;

use super::PositionedNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlapOutcome {
    pub iterations: usize,
    pub moves: usize,
    pub converged: bool,
}

/// Minimum center-to-center distance between two same-column children.
///
/// Long labels get up to `long_text_bonus` extra room on top of the base.
pub fn min_center_distance(
    height_a: f64,
    height_b: f64,
    longest_label: usize,
    config: &OverlapConfig,
) -> f64 {
    let ratio = (longest_label as f64 / config.long_text_len.max(1) as f64).min(1.0);
    let min_separation = config.base_separation + config.long_text_bonus * ratio;
    ((height_a + height_b) / 2.0).max(min_separation)
}

/// Center-to-center distance two overlapping children must be pushed to.
pub fn required_separation(a: &PositionedNode, b: &PositionedNode, config: &OverlapConfig) -> f64 {
    let longest = a.text.chars().count().max(b.text.chars().count());
    min_center_distance(a.height, b.height, longest, config)
}

fn child_ids(positions: &BTreeMap<String, PositionedNode>) -> Vec<String> {
    positions
        .iter()
        .filter(|(_, node)| node.node_type == NodeType::Child)
        .map(|(id, _)| id.clone())
        .collect()
}

/// Pushes overlapping child boxes apart, moving the lower one down.
///
/// Bounded fixed-point iteration: stops after a clean pass or after
/// `max_iterations` passes, whichever comes first. Leftover overlaps are
/// reported by validation, not here.
pub fn resolve_overlaps(
    positions: &mut BTreeMap<String, PositionedNode>,
    config: &OverlapConfig,
) -> OverlapOutcome {
    let ids = child_ids(positions);
    let mut outcome = OverlapOutcome::default();

    for _ in 0..config.max_iterations {
        outcome.iterations += 1;
        let mut found = 0usize;
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let (Some(a), Some(b)) = (positions.get(&ids[i]), positions.get(&ids[j])) else {
                    continue;
                };
                if !a.overlaps(b) {
                    continue;
                }
                found += 1;
                let (upper, lower) = if b.y >= a.y { (a, b) } else { (b, a) };
                let lower_id = if b.y >= a.y { &ids[j] } else { &ids[i] };
                let deficit =
                    required_separation(upper, lower, config) - (lower.y - upper.y);
                if deficit <= 0.0 {
                    continue;
                }
                if let Some(node) = positions.get_mut(lower_id) {
                    node.y += deficit;
                    outcome.moves += 1;
                }
            }
        }
        if found == 0 {
            outcome.converged = true;
            break;
        }
    }

    if outcome.moves > 0 {
        debug!(
            iterations = outcome.iterations,
            moves = outcome.moves,
            "nudged overlapping children"
        );
    }
    if !outcome.converged {
        // The final pass moved nodes without re-checking them.
        outcome.converged = !has_child_overlap(positions);
        if !outcome.converged {
            warn!(
                iterations = outcome.iterations,
                "child overlaps remain after overlap resolution"
            );
        }
    }
    outcome
}

pub fn has_child_overlap(positions: &BTreeMap<String, PositionedNode>) -> bool {
    let children: Vec<&PositionedNode> = positions
        .values()
        .filter(|node| node.node_type == NodeType::Child)
        .collect();
    children
        .iter()
        .enumerate()
        .any(|(i, a)| children[i + 1..].iter().any(|b| a.overlaps(b)))
}
