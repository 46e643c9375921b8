use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Reserved id of the single root node. It is never deleted, reordered, or re-parented.
pub const ROOT_ID: &str = "root";

pub const FONT_SIZE_MIN: f64 = 10.0;
pub const FONT_SIZE_MAX: f64 = 72.0;

/// Font size (px) given to nodes created by "add child" / "add sibling".
pub const NEW_NODE_FONT_SIZE: f64 = 16.0;

/// Box outline of a node.
///
/// Unknown names (older documents, hand-edited files) load as [`Shape::Rounded`] instead of
/// failing the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Shape {
    #[default]
    Rounded,
    Pill,
    Rect,
    Diamond,
    Parallelogram,
    Hexagon,
    Octagon,
    Leaf,
}

impl Shape {
    pub const ALL: [Shape; 8] = [
        Shape::Rounded,
        Shape::Pill,
        Shape::Rect,
        Shape::Diamond,
        Shape::Parallelogram,
        Shape::Hexagon,
        Shape::Octagon,
        Shape::Leaf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Rounded => "rounded",
            Shape::Pill => "pill",
            Shape::Rect => "rect",
            Shape::Diamond => "diamond",
            Shape::Parallelogram => "parallelogram",
            Shape::Hexagon => "hexagon",
            Shape::Octagon => "octagon",
            Shape::Leaf => "leaf",
        }
    }

    /// Lenient lookup: anything unrecognized maps to the default shape.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == name)
            .unwrap_or_default()
    }
}

impl From<String> for Shape {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<Shape> for &'static str {
    fn from(value: Shape) -> Self {
        value.as_str()
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Pixels; the style domain keeps this within `FONT_SIZE_MIN..=FONT_SIZE_MAX`. Zero means
    /// unset and is read as the layout default.
    #[serde(default)]
    pub font_size: f64,
    #[serde(default)]
    pub font_family: String,
    #[serde(default)]
    pub shape: Shape,
}

/// The documented default style: blue rounded box, white 14px Consolas text.
impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            color: "#3b82f6".to_string(),
            text_color: Some("#ffffff".to_string()),
            font_size: 14.0,
            font_family: "Consolas".to_string(),
            shape: Shape::Rounded,
        }
    }
}

/// Partial style update. Fields left as `None` keep the node's current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    /// Sets the font size, clamped to the supported `10..=72` px range.
    pub fn font_size(mut self, px: f64) -> Self {
        self.font_size = Some(px.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX));
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(&self, base: &NodeStyle) -> NodeStyle {
        NodeStyle {
            color: self.color.clone().unwrap_or_else(|| base.color.clone()),
            text_color: self.text_color.clone().or_else(|| base.text_color.clone()),
            font_size: self.font_size.unwrap_or(base.font_size),
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| base.font_family.clone()),
            shape: self.shape.unwrap_or(base.shape),
        }
    }
}

fn default_expanded() -> bool {
    true
}

/// One idea in the mind map. Serializes field-for-field as the persisted document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default = "default_expanded")]
    pub is_expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
}

impl Node {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            children: Vec::new(),
            is_expanded: true,
            style: None,
        }
    }

    /// A fresh document: a purple "Central Idea" pill.
    pub fn initial() -> Self {
        Self::new(ROOT_ID, "Central Idea").with_style(NodeStyle {
            color: "#8b5cf6".to_string(),
            font_size: 24.0,
            shape: Shape::Pill,
            ..NodeStyle::default()
        })
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn collapsed(mut self) -> Self {
        self.is_expanded = false;
        self
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.iter().find(|n| n.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// The node whose `children` holds `id`.
    pub fn parent_of(&self, id: &str) -> Option<&Node> {
        self.iter()
            .find(|n| n.children.iter().any(|c| c.id == id))
    }

    pub(crate) fn parent_of_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.children.iter().any(|c| c.id == id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.parent_of_mut(id))
    }

    /// Pre-order traversal of this node and all of its descendants, hidden ones included.
    pub fn iter(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Checks the document invariants: the root is `"root"` and ids are unique.
    pub fn validate(&self) -> Result<()> {
        if !self.is_root() {
            return Err(Error::MissingRoot {
                found: self.id.clone(),
            });
        }
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for node in self.iter() {
            if !seen.insert(node.id.as_str()) {
                return Err(Error::DuplicateId {
                    id: node.id.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let root: Node = serde_json::from_str(text)?;
        root.validate()?;
        Ok(root)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
