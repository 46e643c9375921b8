//! Node box sizing.
//!
//! The editor does not measure glyphs. Box sizes come from a per-family character width factor
//! and per-shape padding so the same document always lays out the same way.

use mindflow_core::{Node, Shape};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_FONT_FAMILY: &str = "Inter";

pub const MIN_WIDTH: f64 = 80.0;
pub const MIN_HEIGHT: f64 = 40.0;
pub const LINE_HEIGHT_FACTOR: f64 = 1.4;
pub const PADDING_Y: f64 = 16.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

pub trait NodeMeasurer {
    fn measure(&self, text: &str, font_size: f64, font_family: &str, shape: Shape) -> Dimensions;

    /// Measures a node with its style, substituting the layout defaults (16px, Inter, rounded)
    /// for a missing style and for a zero or NaN font size or an empty family.
    fn measure_node(&self, node: &Node) -> Dimensions {
        let (size, family, shape) = match &node.style {
            Some(style) => (style.font_size, style.font_family.as_str(), style.shape),
            None => (DEFAULT_FONT_SIZE, DEFAULT_FONT_FAMILY, Shape::Rounded),
        };
        let size = if size == 0.0 || size.is_nan() {
            DEFAULT_FONT_SIZE
        } else {
            size
        };
        let family = if family.is_empty() {
            DEFAULT_FONT_FAMILY
        } else {
            family
        };
        self.measure(&node.text, size, family, shape)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeasurer;

impl NodeMeasurer for HeuristicMeasurer {
    fn measure(&self, text: &str, font_size: f64, font_family: &str, shape: Shape) -> Dimensions {
        estimate(text, font_size, font_family, shape)
    }
}

fn char_width_factor(font_family: &str) -> f64 {
    // Handwriting wins over monospace when a family name mentions both.
    if font_family.contains("Caveat") {
        0.5
    } else if font_family.to_ascii_lowercase().contains("mono") {
        0.65
    } else {
        0.6
    }
}

pub fn horizontal_padding(shape: Shape) -> f64 {
    match shape {
        Shape::Pill | Shape::Leaf => 40.0,
        // Cut corners need clearance.
        Shape::Hexagon | Shape::Octagon => 50.0,
        // The skew eats into the usable width.
        Shape::Parallelogram => 48.0,
        Shape::Rounded | Shape::Rect | Shape::Diamond => 32.0,
    }
}

/// `(longest line in chars, line count)`; lines break on `\n` or `\r\n`.
fn text_extent(text: &str) -> (usize, usize) {
    let segments: Vec<&str> = text.split('\n').collect();
    let last = segments.len() - 1;
    let longest = segments
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let line = if i < last {
                line.strip_suffix('\r').unwrap_or(line)
            } else {
                line
            };
            line.chars().count()
        })
        .max()
        .unwrap_or(0);
    (longest, segments.len())
}

pub fn estimate(text: &str, font_size: f64, font_family: &str, shape: Shape) -> Dimensions {
    let char_width = font_size * char_width_factor(font_family);
    let (longest, line_count) = text_extent(text);

    let width = (longest as f64 * char_width + horizontal_padding(shape)).max(MIN_WIDTH);
    let height = (line_count as f64 * font_size * LINE_HEIGHT_FACTOR + PADDING_Y).max(MIN_HEIGHT);
    Dimensions { width, height }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindflow_core::NodeStyle;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn short_hexagon_label_hits_the_width_floor() {
        let d = estimate("Hi", 16.0, "Inter", Shape::Hexagon);
        // 2 * 9.6 + 50 = 69.2 -> floor
        assert_eq!(d.width, 80.0);
        assert_eq!(d.height, 40.0);
    }

    #[test]
    fn hexagon_padding_shows_once_text_is_long_enough() {
        let hex = estimate("Hello world", 16.0, "Inter", Shape::Hexagon);
        let rect = estimate("Hello world", 16.0, "Inter", Shape::Rect);
        assert!(close(hex.width, 11.0 * 9.6 + 50.0));
        assert!(close(hex.width - rect.width, 18.0));
    }

    #[test]
    fn padding_per_shape() {
        assert_eq!(horizontal_padding(Shape::Pill), 40.0);
        assert_eq!(horizontal_padding(Shape::Leaf), 40.0);
        assert_eq!(horizontal_padding(Shape::Octagon), 50.0);
        assert_eq!(horizontal_padding(Shape::Parallelogram), 48.0);
        assert_eq!(horizontal_padding(Shape::Diamond), 32.0);
    }

    #[test]
    fn family_factors() {
        let text = "abcdefghij";
        let plain = estimate(text, 20.0, "Roboto", Shape::Rect);
        let mono = estimate(text, 20.0, "JetBrains Mono", Shape::Rect);
        let hand = estimate(text, 20.0, "Caveat", Shape::Rect);
        assert!(close(plain.width, 10.0 * 12.0 + 32.0));
        assert!(close(mono.width, 10.0 * 13.0 + 32.0));
        assert!(close(hand.width, 10.0 * 10.0 + 32.0));
    }

    #[test]
    fn mono_matches_in_any_case() {
        let text = "abcdefghij";
        for family in ["monospace", "MONO", "Roboto Mono"] {
            let d = estimate(text, 20.0, family, Shape::Rect);
            assert!(close(d.width, 10.0 * 13.0 + 32.0), "{family}");
        }
        let courier = estimate(text, 20.0, "Courier", Shape::Rect);
        assert!(close(courier.width, 10.0 * 12.0 + 32.0));
        let both = estimate(text, 20.0, "Caveat Mono", Shape::Rect);
        assert!(close(both.width, 10.0 * 10.0 + 32.0));
    }

    #[test]
    fn multiline_uses_longest_line_and_line_count() {
        let d = estimate("one\r\nthree33\nx", 10.0, "Inter", Shape::Rounded);
        assert!(close(d.width, (7.0 * 6.0 + 32.0_f64).max(80.0)));
        assert!(close(d.height, 3.0 * 10.0 * 1.4 + 16.0));
    }

    #[test]
    fn empty_text_yields_floor_box() {
        let d = estimate("", 16.0, "Inter", Shape::Rounded);
        assert_eq!(d, Dimensions { width: 80.0, height: 40.0 });
    }

    #[test]
    fn unstyled_and_zero_size_nodes_use_layout_defaults() {
        let bare = Node::new("n", "A much longer label");
        let zero = Node::new("z", "A much longer label").with_style(NodeStyle {
            font_size: 0.0,
            font_family: String::new(),
            ..NodeStyle::default()
        });
        let expected = estimate("A much longer label", 16.0, "Inter", Shape::Rounded);
        assert_eq!(HeuristicMeasurer.measure_node(&bare), expected);
        assert_eq!(HeuristicMeasurer.measure_node(&zero), expected);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let ascii = estimate("aaaaaaaaaaaaaa", 16.0, "Inter", Shape::Rect);
        let accented = estimate("éééééééééééééé", 16.0, "Inter", Shape::Rect);
        assert_eq!(ascii, accented);
    }
}
