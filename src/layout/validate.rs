use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::ir::{MindMap, NodeType, branch_id, child_id};

use super::PositionedNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Warning,
    Critical,
    Overlap,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Overlap => "OVERLAP",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub nodes: Vec<String>,
    pub message: String,
    /// Alignment error or overlap depth in pixels.
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub summary: String,
    pub details: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn from_issues(checked_branches: usize, details: Vec<ValidationIssue>) -> Self {
        let count = |severity: Severity| details.iter().filter(|d| d.severity == severity).count();
        let warnings = count(Severity::Warning);
        let critical = count(Severity::Critical);
        let overlaps = count(Severity::Overlap);
        let summary = format!(
            "{checked_branches} branches checked: {critical} critical, {warnings} warnings, {overlaps} overlaps"
        );
        Self {
            is_valid: critical == 0 && overlaps == 0,
            summary,
            details,
        }
    }

    /// Report attached to a degraded layout.
    pub fn failed(note: &str) -> Self {
        Self {
            is_valid: false,
            summary: format!("layout failed: {note}"),
            details: Vec::new(),
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.details
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Distance between a branch and the mean y of its placed children.
pub fn alignment_error(
    map: &MindMap,
    branch_index: usize,
    positions: &BTreeMap<String, PositionedNode>,
) -> Option<f64> {
    let branch = map.branches.iter().find(|b| b.index == branch_index)?;
    let node = positions.get(&branch_id(branch_index))?;
    let ys: Vec<f64> = branch
        .children
        .iter()
        .filter_map(|c| positions.get(&child_id(branch_index, c.index)))
        .map(|c| c.y)
        .collect();
    if ys.is_empty() {
        return None;
    }
    let mean = ys.iter().sum::<f64>() / ys.len() as f64;
    Some((node.y - mean).abs())
}

fn overlap_depth(a: &PositionedNode, b: &PositionedNode) -> f64 {
    let dy = (a.height + b.height) / 2.0 - (a.y - b.y).abs();
    let dx = (a.width + b.width) / 2.0 - (a.x - b.x).abs();
    dx.min(dy)
}

/// Read-only diagnostics over a finished layout.
pub fn validate_layout(
    map: &MindMap,
    positions: &BTreeMap<String, PositionedNode>,
    config: &ValidationConfig,
) -> ValidationReport {
    let mut details = Vec::new();
    let mut checked = 0usize;

    for branch in &map.branches {
        let Some(error) = alignment_error(map, branch.index, positions) else {
            continue;
        };
        checked += 1;
        let severity = if error > config.critical_threshold {
            Severity::Critical
        } else if error > config.warning_threshold {
            Severity::Warning
        } else {
            continue;
        };
        details.push(ValidationIssue {
            severity,
            nodes: vec![branch_id(branch.index)],
            message: format!(
                "branch '{}' is {error:.1}px away from the mean of its children",
                branch.label
            ),
            magnitude: error,
        });
    }

    let children: Vec<(&String, &PositionedNode)> = positions
        .iter()
        .filter(|(_, node)| node.node_type == NodeType::Child)
        .collect();
    for (i, (id_a, a)) in children.iter().enumerate() {
        for (id_b, b) in &children[i + 1..] {
            if a.overlaps(b) {
                details.push(ValidationIssue {
                    severity: Severity::Overlap,
                    nodes: vec![(*id_a).clone(), (*id_b).clone()],
                    message: format!("'{}' overlaps '{}'", a.text, b.text),
                    magnitude: overlap_depth(a, b),
                });
            }
        }
    }

    ValidationReport::from_issues(checked, details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_metrics::NodeDimensions;

    fn place(positions: &mut BTreeMap<String, PositionedNode>, id: &str, t: NodeType, y: f64) {
        let x = if t == NodeType::Branch { 200.0 } else { 400.0 };
        let dims = NodeDimensions::new(14, 100, 40);
        positions.insert(id.to_string(), PositionedNode::new(id, t, dims, x, y));
    }

    fn fixture(branch_y: f64, second_child_y: f64) -> (MindMap, BTreeMap<String, PositionedNode>) {
        let map = MindMap::new("T").with_branch("B", ["c0", "c1"]);
        let mut positions = BTreeMap::new();
        place(&mut positions, "branch_0", NodeType::Branch, branch_y);
        place(&mut positions, "child_0_0", NodeType::Child, -50.0);
        place(&mut positions, "child_0_1", NodeType::Child, second_child_y);
        (map, positions)
    }

    #[test]
    fn aligned_layout_is_valid() {
        let (map, positions) = fixture(0.0, 50.0);
        let report = validate_layout(&map, &positions, &ValidationConfig::default());
        assert!(report.is_valid);
        assert!(report.details.is_empty());
        assert!(report.summary.starts_with("1 branches checked"));
    }

    #[test]
    fn moderate_misalignment_warns() {
        let (map, positions) = fixture(20.0, 50.0);
        let report = validate_layout(&map, &positions, &ValidationConfig::default());
        assert!(report.is_valid);
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn large_misalignment_is_critical() {
        let (map, positions) = fixture(40.0, 50.0);
        let report = validate_layout(&map, &positions, &ValidationConfig::default());
        assert!(!report.is_valid);
        assert_eq!(report.count(Severity::Critical), 1);
        assert!((report.details[0].magnitude - 40.0).abs() < 1e-9);
    }

    #[test]
    fn overlapping_children_are_reported() {
        let (map, positions) = fixture(-35.0, -20.0);
        let report = validate_layout(&map, &positions, &ValidationConfig::default());
        assert!(!report.is_valid);
        assert_eq!(report.count(Severity::Overlap), 1);
        let overlap = report
            .details
            .iter()
            .find(|d| d.severity == Severity::Overlap)
            .unwrap();
        assert_eq!(overlap.nodes, vec!["child_0_0", "child_0_1"]);
        assert!((overlap.magnitude - 10.0).abs() < 1e-9);
    }

    #[test]
    fn failed_report_is_invalid() {
        let report = ValidationReport::failed("boom");
        assert!(!report.is_valid);
        assert_eq!(report.summary, "layout failed: boom");
        assert_eq!(Severity::Overlap.to_string(), "OVERLAP");
    }
}
