//! Core data model: the shape tree of a page, pages and documents.
//!
//! A page's content is a tree: containers (shape collections) group child
//! shapes and carry their own transform; leaves are drawable content
//! (text, images, freehand and clip paths). Edges go parent → child. The
//! tree is owned by the page; the browser only reads geometry and, on
//! deletion, removes whole subtrees.

use crate::tags::{TagId, TagTree};
use crate::transform::Matrix;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let short = |i: usize| hex_val(bytes[i]).map(|v| v * 17);
        let long = |i: usize| Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?);

        match bytes.len() {
            3 => Some(Self::rgba8(short(0)?, short(1)?, short(2)?, 255)),
            4 => Some(Self::rgba8(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgba8(long(0)?, long(2)?, long(4)?, 255)),
            8 => Some(Self::rgba8(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        );
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color `{s}`")))
    }
}

// ─── Path data ───────────────────────────────────────────────────────────

/// One segment of a freehand or clip path, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// Sets the figure's start point.
    Start { x: f64, y: f64 },
    Line { x: f64, y: f64 },
    /// Cubic Bézier: two control points, then the end point.
    Bezier {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    },
}

/// A single figure of a freehand or clip shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeHandPath {
    #[serde(default)]
    pub closed: bool,
    pub segments: Vec<PathSegment>,
}

// ─── Shapes ──────────────────────────────────────────────────────────────

/// What a node in the shape tree is.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Shape collection. Groups children under its own transform.
    Collection,

    /// Text run with its measured extent.
    Text {
        text: String,
        measured_width: f64,
        measured_height: f64,
    },

    /// Raster image with its intrinsic size.
    Image { width: f64, height: f64 },

    /// Vector drawing.
    FreeHand { paths: Vec<FreeHandPath> },

    /// Clipping path.
    Clip { paths: Vec<FreeHandPath> },
}

impl ShapeKind {
    /// Type name shown in the shape tree.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Collection => "ShapeCollection",
            ShapeKind::Text { .. } => "TextShape",
            ShapeKind::Image { .. } => "ImageShape",
            ShapeKind::FreeHand { .. } => "FreeHandShape",
            ShapeKind::Clip { .. } => "ClipShape",
        }
    }
}

/// A single node in the shape tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    pub kind: ShapeKind,

    /// Local transform, relative to the enclosing collection.
    pub transform: Matrix,

    /// Position reported by the document (informational).
    pub x: f64,
    pub y: f64,

    /// Logical-structure tag this shape belongs to, if any.
    pub parent_tag: Option<TagId>,
}

impl ShapeNode {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            transform: Matrix::IDENTITY,
            x: 0.0,
            y: 0.0,
            parent_tag: None,
        }
    }

    pub fn with_transform(mut self, transform: Matrix) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_tag(mut self, tag: TagId) -> Self {
        self.parent_tag = Some(tag);
        self
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, ShapeKind::Collection)
    }
}

/// Read-only summary of a shape, for a properties panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeProperties {
    pub kind: &'static str,
    pub x: f64,
    pub y: f64,
    /// Only for text shapes.
    pub text: Option<String>,
    pub transform: Matrix,
}

impl From<&ShapeNode> for ShapeProperties {
    fn from(node: &ShapeNode) -> Self {
        let text = match &node.kind {
            ShapeKind::Text { text, .. } => Some(text.clone()),
            _ => None,
        };
        Self {
            kind: node.kind.name(),
            x: node.x,
            y: node.y,
            text,
            transform: node.transform,
        }
    }
}

// ─── Shape tree ──────────────────────────────────────────────────────────

/// The shape content of one page: a tree of `ShapeNode` values.
///
/// Indices are stable: removing a subtree never renumbers the survivors, so
/// an index held across a removal resolves to "not found" instead of to a
/// different shape.
#[derive(Debug, Clone)]
pub struct ShapeTree {
    /// The underlying directed graph, parent → child.
    pub graph: StableDiGraph<ShapeNode, ()>,

    /// The root collection.
    pub root: NodeIndex,
}

impl ShapeTree {
    /// A tree holding only an empty root collection.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(ShapeNode::new(ShapeKind::Collection))
    }

    #[must_use]
    pub fn with_root(root_node: ShapeNode) -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(root_node);
        Self { graph, root }
    }

    /// Add a node as the last child of `parent`. Returns the new node's index.
    pub fn add_node(&mut self, parent: NodeIndex, node: ShapeNode) -> NodeIndex {
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        idx
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&ShapeNode> {
        self.graph.node_weight(idx)
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.graph.contains_node(idx)
    }

    pub fn is_container(&self, idx: NodeIndex) -> bool {
        self.get(idx).is_some_and(ShapeNode::is_container)
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// Get the parent index of a node.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Get children of a node in document (insertion) order.
    ///
    /// Nodes are only ever appended while a tree is built, so index order
    /// is document order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// All live nodes in pre-order, root first.
    pub fn pre_order(&self) -> Vec<NodeIndex> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            out.push(idx);
            stack.extend(self.children(idx).into_iter().rev());
        }
        out
    }

    /// Remove `idx` and everything below it from the tree. Returns how many
    /// nodes were removed: 0 for the root and for nodes already gone.
    pub fn detach(&mut self, idx: NodeIndex) -> usize {
        if idx == self.root || !self.contains(idx) {
            return 0;
        }
        let mut doomed = vec![idx];
        let mut i = 0;
        while i < doomed.len() {
            doomed.extend(self.children(doomed[i]));
            i += 1;
        }
        for &node in &doomed {
            self.graph.remove_node(node);
        }
        doomed.len()
    }

    /// Deep-copy the subtree at `idx` under `dst_parent` in `dst`.
    pub fn copy_subtree_into(
        &self,
        idx: NodeIndex,
        dst: &mut ShapeTree,
        dst_parent: NodeIndex,
    ) -> Option<NodeIndex> {
        let node = self.get(idx)?.clone();
        let copied = dst.add_node(dst_parent, node);
        for child in self.children(idx) {
            self.copy_subtree_into(child, dst, copied);
        }
        Some(copied)
    }

    /// A fresh, compact tree holding a copy of the subtree at `idx`.
    pub fn subtree(&self, idx: NodeIndex) -> Option<ShapeTree> {
        let mut out = ShapeTree::with_root(self.get(idx)?.clone());
        let root = out.root;
        for child in self.children(idx) {
            self.copy_subtree_into(child, &mut out, root);
        }
        Some(out)
    }

    /// Wrap the whole tree under a synthetic identity collection.
    #[must_use]
    pub fn wrapped(&self) -> ShapeTree {
        let mut out = ShapeTree::new();
        let root = out.root;
        self.copy_subtree_into(self.root, &mut out, root);
        out
    }

    /// Inverse of [`ShapeTree::wrapped`]: the first child of the root, as a
    /// tree of its own.
    pub fn unwrapped(&self) -> Option<ShapeTree> {
        let first = self.children(self.root).into_iter().next()?;
        self.subtree(first)
    }
}

impl Default for ShapeTree {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Pages & documents ───────────────────────────────────────────────────

/// Page rotation as stored in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Rotate90,
    Rotate180,
    Rotate270,
}

/// One page: its size, rotation and shape content.
#[derive(Debug, Clone)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub orientation: Orientation,
    /// Root is the page's top-level shape collection.
    pub shapes: ShapeTree,
}

impl Page {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            orientation: Orientation::Portrait,
            shapes: ShapeTree::new(),
        }
    }

    /// Same size and orientation, different content.
    pub fn with_shapes(&self, shapes: ShapeTree) -> Self {
        Self {
            width: self.width,
            height: self.height,
            orientation: self.orientation,
            shapes,
        }
    }
}

/// A document: pages plus the logical structure their shapes refer to.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub title: Option<String>,
    pub pages: Vec<Page>,
    pub structure: TagTree,
}

impl Document {
    /// Title shown for the document, `[no title]` when absent or empty.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => "[no title]",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
