use std::collections::BTreeMap;

use tracing::warn;

use crate::ir::{MindMap, branch_id, child_id, topic_id};

use super::{Connection, ConnectionKind, Endpoint, PositionedNode};

fn connect(
    kind: ConnectionKind,
    from: &PositionedNode,
    to: &PositionedNode,
    branch_index: usize,
    child_index: Option<usize>,
) -> Connection {
    Connection {
        kind,
        from: Endpoint::from(from),
        to: Endpoint::from(to),
        branch_index,
        child_index,
        stroke_width: kind.stroke_width(),
    }
}

/// Builds line segments between node centers from finalized positions.
///
/// Only reads coordinates. A missing key drops the affected connections and
/// nothing else.
pub fn build_connections(
    map: &MindMap,
    positions: &BTreeMap<String, PositionedNode>,
) -> Vec<Connection> {
    let mut connections = Vec::with_capacity(map.branches.len() + map.child_count());
    let topic = positions.get(&topic_id());
    if topic.is_none() {
        warn!("topic position missing; topic connections skipped");
    }

    for branch in &map.branches {
        let key = branch_id(branch.index);
        let Some(branch_node) = positions.get(&key) else {
            warn!(%key, "branch position missing; connections skipped");
            continue;
        };
        if let Some(topic) = topic {
            connections.push(connect(
                ConnectionKind::TopicToBranch,
                topic,
                branch_node,
                branch.index,
                None,
            ));
        }
        for child in &branch.children {
            let key = child_id(branch.index, child.index);
            let Some(child_node) = positions.get(&key) else {
                warn!(%key, "child position missing; connection skipped");
                continue;
            };
            connections.push(connect(
                ConnectionKind::BranchToChild,
                branch_node,
                child_node,
                branch.index,
                Some(child.index),
            ));
        }
    }
    connections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeType;
    use crate::text_metrics::estimate_dimensions;

    fn node(text: &str, node_type: NodeType, x: f64, y: f64) -> PositionedNode {
        PositionedNode::new(text, node_type, estimate_dimensions(text, node_type), x, y)
    }

    fn sample() -> (MindMap, BTreeMap<String, PositionedNode>) {
        let map = MindMap::new("AI")
            .with_branch("ML", ["Supervised"])
            .with_branch("NLP", ["Parsing"]);
        let mut positions = BTreeMap::new();
        positions.insert(topic_id(), node("AI", NodeType::Topic, 0.0, 0.0));
        positions.insert(branch_id(0), node("ML", NodeType::Branch, 200.0, 0.0));
        positions.insert(branch_id(1), node("NLP", NodeType::Branch, -200.0, 0.0));
        positions.insert(child_id(0, 0), node("Supervised", NodeType::Child, 400.0, 0.0));
        positions.insert(child_id(1, 0), node("Parsing", NodeType::Child, -400.0, 0.0));
        (map, positions)
    }

    #[test]
    fn one_connection_per_branch_and_child() {
        let (map, positions) = sample();
        let connections = build_connections(&map, &positions);
        assert_eq!(connections.len(), 4);
        let first = &connections[0];
        assert_eq!(first.kind, ConnectionKind::TopicToBranch);
        assert_eq!(first.stroke_width, 3);
        assert_eq!(first.from.node_type, NodeType::Topic);
        assert_eq!((first.to.x, first.to.y), (200.0, 0.0));
        let second = &connections[1];
        assert_eq!(second.kind, ConnectionKind::BranchToChild);
        assert_eq!(second.stroke_width, 2);
        assert_eq!(second.child_index, Some(0));
        assert_eq!((second.to.x, second.to.y), (400.0, 0.0));
    }

    #[test]
    fn missing_child_keeps_topic_connection() {
        let (map, mut positions) = sample();
        positions.remove("child_1_0");
        let connections = build_connections(&map, &positions);
        assert_eq!(connections.len(), 3);
        assert!(connections.iter().any(|c| {
            c.kind == ConnectionKind::TopicToBranch && c.branch_index == 1
        }));
    }

    #[test]
    fn missing_branch_drops_its_subtree() {
        let (map, mut positions) = sample();
        positions.remove("branch_0");
        let connections = build_connections(&map, &positions);
        assert_eq!(connections.len(), 2);
        assert!(connections.iter().all(|c| c.branch_index == 1));
    }
}
