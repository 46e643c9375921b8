#![forbid(unsafe_code)]

//! Headless mind-map layout.
//!
//! [`layout_mindmap`] turns a [`mindflow_core::Node`] tree into absolute boxes and connectors:
//! - every node is sized by a [`NodeMeasurer`] (a deterministic heuristic by default)
//! - visible nodes are stacked vertically with a tidy-tree pass whose spacing depends on the
//!   heights of neighbouring boxes
//! - nodes are left-aligned in one column per depth, each column as wide as its widest box

pub mod estimate;
pub mod layout;
pub mod model;
pub mod tidy;

pub use estimate::{Dimensions, HeuristicMeasurer, NodeMeasurer, estimate};
pub use layout::layout_mindmap;
pub use model::{Bounds, ExportFrame, LayoutEdge, LayoutNode, LayoutPoint, MindmapLayout};

use mindflow_core::MindflowConfig;
use serde_json::Value;
use std::sync::Arc;

/// Spacing constants of the layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal gap between the widest box of one depth column and the next column.
    pub column_gap: f64,
    /// Extra vertical gap between neighbouring boxes on the same level, on top of their
    /// half-heights.
    pub sibling_gap: f64,
    /// Column width used when a depth has no usable width.
    pub fallback_column_width: f64,
    /// Margin around the content when framing a full-map export.
    pub export_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_gap: 120.0,
            sibling_gap: 28.0,
            fallback_column_width: 100.0,
            export_padding: 40.0,
        }
    }
}

impl LayoutConfig {
    const KEYS: [&'static str; 4] = [
        "layout.columnGap",
        "layout.siblingGap",
        "layout.fallbackColumnWidth",
        "export.padding",
    ];

    fn values(&self) -> [f64; 4] {
        [
            self.column_gap,
            self.sibling_gap,
            self.fallback_column_width,
            self.export_padding,
        ]
    }

    /// The spacing as config keys, in the shape [`LayoutConfig::from_config`] reads.
    pub fn to_config(&self) -> MindflowConfig {
        let mut config = MindflowConfig::default();
        for (key, value) in Self::KEYS.into_iter().zip(self.values()) {
            config.set_value(key, Value::from(value));
        }
        config
    }

    /// Layers `overrides` onto the default spacing and reads `layout.columnGap`,
    /// `layout.siblingGap`, `layout.fallbackColumnWidth` and `export.padding` back out. Keys that
    /// are missing or not numbers keep their defaults.
    pub fn from_config(overrides: &MindflowConfig) -> Self {
        let defaults = Self::default();
        let mut merged = defaults.to_config();
        merged.merge(overrides);

        let [column_gap, sibling_gap, fallback_column_width, export_padding] =
            Self::KEYS.map(|key| merged.get_f64(key));
        Self {
            column_gap: column_gap.unwrap_or(defaults.column_gap),
            sibling_gap: sibling_gap.unwrap_or(defaults.sibling_gap),
            fallback_column_width: fallback_column_width
                .unwrap_or(defaults.fallback_column_width),
            export_padding: export_padding.unwrap_or(defaults.export_padding),
        }
    }
}

#[derive(Clone)]
pub struct LayoutOptions {
    pub measurer: Arc<dyn NodeMeasurer + Send + Sync>,
    pub config: LayoutConfig,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            measurer: Arc::new(HeuristicMeasurer),
            config: LayoutConfig::default(),
        }
    }
}

impl LayoutOptions {
    pub fn from_config(config: &MindflowConfig) -> Self {
        Self {
            config: LayoutConfig::from_config(config),
            ..Self::default()
        }
    }
}

impl std::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
