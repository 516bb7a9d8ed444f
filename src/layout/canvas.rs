use crate::config::CanvasConfig;

use super::{CanvasSize, PositionedNode};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

pub fn bounds<'a>(nodes: impl IntoIterator<Item = &'a PositionedNode>) -> Option<Bounds> {
    nodes.into_iter().fold(None, |acc, node| {
        let next = Bounds {
            min_x: node.left(),
            min_y: node.top(),
            max_x: node.right(),
            max_y: node.bottom(),
        };
        Some(match acc {
            None => next,
            Some(b) => Bounds {
                min_x: b.min_x.min(next.min_x),
                min_y: b.min_y.min(next.min_y),
                max_x: b.max_x.max(next.max_x),
                max_y: b.max_y.max(next.max_y),
            },
        })
    })
}

/// Recommended canvas: padded content box, never smaller than the minimum.
pub fn size_canvas<'a>(
    nodes: impl IntoIterator<Item = &'a PositionedNode>,
    config: &CanvasConfig,
) -> CanvasSize {
    let (content_width, content_height) = bounds(nodes)
        .map(|b| (b.width(), b.height()))
        .unwrap_or((0.0, 0.0));
    let base_width = (content_width + 2.0 * config.padding_x).ceil();
    let base_height = (content_height + 2.0 * config.padding_y).ceil();
    CanvasSize {
        base_width,
        base_height,
        width: base_width.max(config.min_width),
        height: base_height.max(config.min_height),
        padding: config.padding_x.max(config.padding_y),
    }
}
