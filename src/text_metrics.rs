//! Text dimension estimation shared with the renderer.
//!
//! Every constant here is part of the visual contract: the renderer draws
//! labels with exactly these font sizes, width caps and paddings, so changing
//! one of them moves text out of its box.

use std::collections::HashMap;

use serde::Serialize;

use crate::ir::NodeType;

pub const TOPIC_PADDING: u32 = 40;
pub const BRANCH_PADDING: u32 = 24;
pub const CHILD_PADDING: u32 = 20;

pub const BRANCH_MAX_TEXT_WIDTH: u32 = 200;
pub const CHILD_MAX_TEXT_WIDTH: u32 = 180;

// (max label length, value) pairs; the last entry of each pair list is
// followed by the floor for longer labels.
const TOPIC_FONT_STEPS: [(usize, u32); 4] = [(6, 28), (12, 26), (20, 24), (30, 22)];
const TOPIC_FONT_FLOOR: u32 = 20;
const BRANCH_FONT_STEPS: [(usize, u32); 2] = [(8, 20), (15, 18)];
const BRANCH_FONT_FLOOR: u32 = 16;
const CHILD_FONT_STEPS: [(usize, u32); 3] = [(10, 16), (20, 14), (35, 13)];
const CHILD_FONT_FLOOR: u32 = 12;

const TOPIC_HEIGHT_STEPS: [(usize, u32); 2] = [(10, 60), (20, 70)];
const TOPIC_HEIGHT_MAX: u32 = 80;
const BRANCH_HEIGHT_STEPS: [(usize, u32); 3] = [(10, 50), (20, 55), (30, 60)];
const BRANCH_HEIGHT_MAX: u32 = 70;
const CHILD_HEIGHT_STEPS: [(usize, u32); 4] = [(10, 40), (20, 45), (30, 50), (45, 55)];
const CHILD_HEIGHT_MAX: u32 = 65;

pub const EMPTY_TOPIC: NodeDimensions = NodeDimensions::new(28, 120, 120);
pub const EMPTY_BRANCH: NodeDimensions = NodeDimensions::new(20, 100, 50);
pub const EMPTY_CHILD: NodeDimensions = NodeDimensions::new(16, 80, 40);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeDimensions {
    pub font_size: u32,
    pub width: u32,
    pub height: u32,
}

impl NodeDimensions {
    pub const fn new(font_size: u32, width: u32, height: u32) -> Self {
        Self {
            font_size,
            width,
            height,
        }
    }
}

/// Glyph classes with distinct advance widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphClass {
    Wide,
    Uppercase,
    Lowercase,
    Digit,
    Space,
    Narrow,
    Punctuation,
    Other,
}

impl GlyphClass {
    pub fn of(ch: char) -> Self {
        if is_wide(ch) {
            return GlyphClass::Wide;
        }
        match ch {
            'i' | 'l' | 'j' | 'I' | '!' | '|' | '.' | ',' | ':' | ';' | '\'' | '(' | ')' | '['
            | ']' | '{' | '}' | '`' => GlyphClass::Narrow,
            ' ' | '\t' => GlyphClass::Space,
            'A'..='Z' => GlyphClass::Uppercase,
            'a'..='z' => GlyphClass::Lowercase,
            '0'..='9' => GlyphClass::Digit,
            c if c.is_ascii_punctuation() => GlyphClass::Punctuation,
            _ => GlyphClass::Other,
        }
    }

    /// Advance width as a fraction of the font size.
    pub fn width_factor(self) -> f64 {
        match self {
            GlyphClass::Wide => 1.2,
            GlyphClass::Uppercase => 0.7,
            GlyphClass::Lowercase | GlyphClass::Digit => 0.6,
            GlyphClass::Space => 0.3,
            GlyphClass::Narrow => 0.35,
            GlyphClass::Punctuation => 0.5,
            GlyphClass::Other => 0.65,
        }
    }
}

fn is_wide(ch: char) -> bool {
    matches!(
        ch as u32,
        0x1100..=0x11FF
            | 0x2E80..=0x9FFF
            | 0xAC00..=0xD7AF
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x20000..=0x2FFFF
    )
}

fn step(len: usize, steps: &[(usize, u32)], floor: u32) -> u32 {
    steps
        .iter()
        .find(|(max_len, _)| len <= *max_len)
        .map(|(_, value)| *value)
        .unwrap_or(floor)
}

fn label_len(text: &str) -> usize {
    text.chars().count()
}

pub fn font_size(text: &str, node_type: NodeType) -> u32 {
    let len = label_len(text);
    match node_type {
        NodeType::Topic => step(len, &TOPIC_FONT_STEPS, TOPIC_FONT_FLOOR),
        NodeType::Branch => step(len, &BRANCH_FONT_STEPS, BRANCH_FONT_FLOOR),
        NodeType::Child => step(len, &CHILD_FONT_STEPS, CHILD_FONT_FLOOR),
    }
}

pub fn node_height(text: &str, node_type: NodeType) -> u32 {
    let len = label_len(text);
    match node_type {
        NodeType::Topic => step(len, &TOPIC_HEIGHT_STEPS, TOPIC_HEIGHT_MAX),
        NodeType::Branch => step(len, &BRANCH_HEIGHT_STEPS, BRANCH_HEIGHT_MAX),
        NodeType::Child => step(len, &CHILD_HEIGHT_STEPS, CHILD_HEIGHT_MAX),
    }
}

pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.trim_end_matches('\r'))
}

/// Raw text width in pixels: the widest explicit line, rounded up.
pub fn text_width(text: &str, font_size: u32) -> u32 {
    let size = f64::from(font_size);
    let widest = split_lines(text)
        .map(|line| {
            line.chars()
                .map(|ch| GlyphClass::of(ch).width_factor() * size)
                .sum::<f64>()
        })
        .fold(0.0, f64::max);
    widest.ceil() as u32
}

pub fn empty_dimensions(node_type: NodeType) -> NodeDimensions {
    match node_type {
        NodeType::Topic => EMPTY_TOPIC,
        NodeType::Branch => EMPTY_BRANCH,
        NodeType::Child => EMPTY_CHILD,
    }
}

pub fn estimate_dimensions(text: &str, node_type: NodeType) -> NodeDimensions {
    if text.trim().is_empty() {
        return empty_dimensions(node_type);
    }
    let font = font_size(text, node_type);
    let raw = text_width(text, font);
    let height = node_height(text, node_type);
    match node_type {
        NodeType::Topic => {
            // Circle: both sides are the diameter.
            let diameter = (raw + TOPIC_PADDING).max(height);
            NodeDimensions::new(font, diameter, diameter)
        }
        NodeType::Branch => NodeDimensions::new(
            font,
            raw.min(BRANCH_MAX_TEXT_WIDTH) + BRANCH_PADDING,
            height,
        ),
        NodeType::Child => NodeDimensions::new(
            font,
            raw.min(CHILD_MAX_TEXT_WIDTH) + CHILD_PADDING,
            height,
        ),
    }
}

/// Memo table for [`estimate_dimensions`], owned by a single layout call.
#[derive(Debug, Default)]
pub struct TextMeasurer {
    cache: HashMap<NodeType, HashMap<String, NodeDimensions>>,
}

impl TextMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measure(&mut self, text: &str, node_type: NodeType) -> NodeDimensions {
        let per_type = self.cache.entry(node_type).or_default();
        if let Some(dims) = per_type.get(text) {
            return *dims;
        }
        let dims = estimate_dimensions(text, node_type);
        per_type.insert(text.to_owned(), dims);
        dims
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of memoized (type, text) entries.
    pub fn len(&self) -> usize {
        self.cache.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_shrinks_with_length() {
        assert_eq!(font_size("AI", NodeType::Topic), 28);
        assert_eq!(font_size("Machine Learning", NodeType::Topic), 24);
        assert_eq!(font_size(&"x".repeat(80), NodeType::Topic), 20);
        assert_eq!(font_size("Data", NodeType::Branch), 20);
        assert_eq!(font_size(&"x".repeat(40), NodeType::Branch), 16);
        assert_eq!(font_size("Parsing", NodeType::Child), 16);
        assert_eq!(font_size(&"x".repeat(100), NodeType::Child), 12);
    }

    #[test]
    fn child_heights_span_forty_to_sixty_five() {
        assert_eq!(node_height("short", NodeType::Child), 40);
        assert_eq!(node_height(&"x".repeat(15), NodeType::Child), 45);
        assert_eq!(node_height(&"x".repeat(25), NodeType::Child), 50);
        assert_eq!(node_height(&"x".repeat(40), NodeType::Child), 55);
        assert_eq!(node_height(&"x".repeat(90), NodeType::Child), 65);
    }

    #[test]
    fn glyph_classes() {
        assert_eq!(GlyphClass::of('中'), GlyphClass::Wide);
        assert_eq!(GlyphClass::of('한'), GlyphClass::Wide);
        assert_eq!(GlyphClass::of('Q'), GlyphClass::Uppercase);
        assert_eq!(GlyphClass::of('q'), GlyphClass::Lowercase);
        assert_eq!(GlyphClass::of('i'), GlyphClass::Narrow);
        assert_eq!(GlyphClass::of('7'), GlyphClass::Digit);
        assert_eq!(GlyphClass::of('-'), GlyphClass::Punctuation);
        assert_eq!(GlyphClass::of('é'), GlyphClass::Other);
    }

    #[test]
    fn cjk_is_wider_than_latin() {
        assert!(text_width("机器学习", 16) > text_width("abcd", 16));
        assert!(text_width("机器", 100) >= 240);
        assert!(text_width("ab", 100) < 240);
    }

    #[test]
    fn longest_line_governs_width() {
        let single = text_width("a much longer line", 14);
        let multi = text_width("short\na much longer line\nmid line", 14);
        assert_eq!(single, multi);
    }

    #[test]
    fn widths_are_capped_then_padded() {
        let long = "w".repeat(200);
        let branch = estimate_dimensions(&long, NodeType::Branch);
        assert_eq!(branch.width, BRANCH_MAX_TEXT_WIDTH + BRANCH_PADDING);
        let child = estimate_dimensions(&long, NodeType::Child);
        assert_eq!(child.width, CHILD_MAX_TEXT_WIDTH + CHILD_PADDING);
        let topic = estimate_dimensions(&long, NodeType::Topic);
        assert!(topic.width > 1000);
        assert_eq!(topic.width, topic.height);
    }

    #[test]
    fn small_topic_uses_step_height_as_diameter() {
        // 'I' is narrow: 0.7 * 28 + 0.35 * 28 rounds up to 30, plus 40 padding.
        let topic = estimate_dimensions("AI", NodeType::Topic);
        assert_eq!(topic, NodeDimensions::new(28, 70, 70));
        // Two uppercase glyphs: 39.2 rounds up to 40, plus padding.
        let wide = estimate_dimensions("AB", NodeType::Topic);
        assert_eq!(wide, NodeDimensions::new(28, 80, 80));
        // Padded width 50 is below the 60px step height, which wins.
        let tiny = estimate_dimensions("i", NodeType::Topic);
        assert_eq!(tiny, NodeDimensions::new(28, 60, 60));
    }

    #[test]
    fn empty_text_yields_minimum_box() {
        assert_eq!(estimate_dimensions("", NodeType::Child), EMPTY_CHILD);
        assert_eq!(estimate_dimensions("   ", NodeType::Branch), EMPTY_BRANCH);
        assert_eq!(estimate_dimensions("", NodeType::Topic), EMPTY_TOPIC);
    }

    #[test]
    fn measurer_memoizes_per_type() {
        let mut measurer = TextMeasurer::new();
        let a = measurer.measure("Parsing", NodeType::Child);
        let b = measurer.measure("Parsing", NodeType::Child);
        assert_eq!(a, b);
        assert_eq!(measurer.len(), 1);
        measurer.measure("Parsing", NodeType::Branch);
        assert_eq!(measurer.len(), 2);
        assert_eq!(
            measurer.measure("Parsing", NodeType::Branch),
            estimate_dimensions("Parsing", NodeType::Branch)
        );
        assert_eq!(measurer.len(), 2);
        measurer.clear();
        assert!(measurer.is_empty());
    }
}
