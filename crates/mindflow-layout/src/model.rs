use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Raster size and the translation that maps layout space into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFrame {
    pub width: f64,
    pub height: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

/// A placed box. `x` is the left edge, `y` the vertical centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub depth: usize,
    /// Index of the parent in [`MindmapLayout::nodes`].
    pub parent: Option<usize>,
}

impl LayoutNode {
    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Connector from a parent's right edge to a child's left edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub source: usize,
    pub target: usize,
    /// Start, two control points and end of a horizontal cubic curve.
    pub points: Vec<LayoutPoint>,
}

impl LayoutEdge {
    pub(crate) fn connect(nodes: &[LayoutNode], source: usize, target: usize) -> Self {
        let s = &nodes[source];
        let t = &nodes[target];
        let (sx, sy) = (s.right(), s.y);
        let (tx, ty) = (t.left(), t.y);
        let mx = (sx + tx) / 2.0;
        Self {
            id: format!("edge_{}_{}", s.id, t.id),
            from: s.id.clone(),
            to: t.id.clone(),
            source,
            target,
            points: vec![
                LayoutPoint { x: sx, y: sy },
                LayoutPoint { x: mx, y: sy },
                LayoutPoint { x: mx, y: ty },
                LayoutPoint { x: tx, y: ty },
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindmapLayout {
    /// Breadth-first: the root, then each depth top to bottom.
    pub nodes: Vec<LayoutNode>,
    /// In the order of their target nodes.
    pub edges: Vec<LayoutEdge>,
}

impl MindmapLayout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn endpoints(&self, edge: &LayoutEdge) -> Option<(&LayoutNode, &LayoutNode)> {
        Some((self.nodes.get(edge.source)?, self.nodes.get(edge.target)?))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(
            self.nodes
                .iter()
                .flat_map(|n| [(n.left(), n.top()), (n.right(), n.bottom())]),
        )
    }

    pub fn export_frame(&self, padding: f64) -> Option<ExportFrame> {
        let b = self.bounds()?;
        Some(ExportFrame {
            width: (b.width() + 2.0 * padding).round().max(1.0),
            height: (b.height() + 2.0 * padding).round().max(1.0),
            translate_x: -b.min_x + padding,
            translate_y: -b.min_y + padding,
        })
    }
}
