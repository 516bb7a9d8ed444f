use crate::config::LayoutConfig;
use crate::ir::{Branch, Child, NodeType};
use crate::text_metrics::{NodeDimensions, TextMeasurer};

use super::Side;
use super::overlap::min_center_distance;

#[derive(Debug, Clone, PartialEq)]
pub struct StackedChild<'a> {
    pub branch_index: usize,
    pub child_index: usize,
    pub text: &'a str,
    pub dims: NodeDimensions,
    pub y: f64,
}

/// Vertical gap between two neighbouring child boxes.
pub fn pair_gap(config: &LayoutConfig, font_a: u32, font_b: u32, crosses_boundary: bool) -> f64 {
    let avg_font = f64::from(font_a + font_b) / 2.0;
    let gap = config
        .gap_base
        .max(config.gap_base + config.gap_font_factor * avg_font);
    if crosses_boundary {
        gap * config.boundary_gap_multiplier
    } else {
        gap
    }
}

/// Stacks every child of one side into a single column starting at y = 0.
///
/// Neighbouring centers sit `avg(h_a, h_b) / 2 + gap` apart, widened to the
/// minimum separation the overlap resolver would otherwise enforce.
///
/// The left side reads bottom-up, so each branch's children are reversed
/// there. Entries keep the indices the children had in the input.
pub fn stack_children<'a>(
    side: Side,
    branches: &[&'a Branch],
    measurer: &mut TextMeasurer,
    config: &LayoutConfig,
) -> Vec<StackedChild<'a>> {
    let mut stacked: Vec<StackedChild<'a>> = Vec::new();
    for &branch in branches {
        let children: Box<dyn Iterator<Item = &'a Child>> = match side {
            Side::Right => Box::new(branch.children.iter()),
            Side::Left => Box::new(branch.children.iter().rev()),
        };
        for child in children {
            let dims = measurer.measure(&child.label, NodeType::Child);
            let y = match stacked.last() {
                None => 0.0,
                Some(prev) => {
                    let crosses = prev.branch_index != branch.index;
                    let avg_height = f64::from(prev.dims.height + dims.height) / 2.0;
                    let spaced = avg_height / 2.0
                        + pair_gap(config, prev.dims.font_size, dims.font_size, crosses);
                    let longest = prev.text.chars().count().max(child.label.chars().count());
                    let required = min_center_distance(
                        f64::from(prev.dims.height),
                        f64::from(dims.height),
                        longest,
                        &config.overlap,
                    );
                    prev.y + spaced.max(required)
                }
            };
            stacked.push(StackedChild {
                branch_index: branch.index,
                child_index: child.index,
                text: &child.label,
                dims,
                y,
            });
        }
    }
    stacked
}
