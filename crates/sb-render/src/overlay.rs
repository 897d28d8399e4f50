//! Selection overlays: the highlight drawn over a selected content shape.
//!
//! Text and image shapes get a filled rectangle of their local size; freehand
//! and clip shapes get their outline, filled and stroked. Either way the
//! primitive carries the shape's absolute transform and is placed by the
//! renderer, which only ever receives add and remove calls.

use kurbo::{BezPath, Rect, Shape};
use sb_core::geometry::{local_rect, paths_of, to_bez_path};
use sb_core::{Color, Matrix, NodeIndex, OverlayStyle, ShapeNode};
use std::collections::BTreeMap;

/// Handle to a materialized overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayGeometry {
    Rect(Rect),
    /// Every figure of the shape, in path order.
    Path(BezPath),
}

impl OverlayGeometry {
    /// Bounds in the shape's local space.
    pub fn local_bounds(&self) -> Rect {
        match self {
            OverlayGeometry::Rect(rect) => *rect,
            OverlayGeometry::Path(path) => path.bounding_box(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPrimitive {
    /// Shape this overlay highlights.
    pub shape: NodeIndex,
    pub geometry: OverlayGeometry,
    /// Absolute transform of the shape.
    pub transform: Matrix,
    pub fill: Color,
    pub stroke: Option<(Color, f64)>,
}

impl OverlayPrimitive {
    /// Axis-aligned bounds in page space.
    pub fn bounds(&self) -> Rect {
        self.transform.transform_bounds(self.geometry.local_bounds())
    }
}

/// Build the overlay for `node`. `None` for collections and for paths with
/// nothing drawn.
pub fn build_overlay(
    shape: NodeIndex,
    node: &ShapeNode,
    absolute: Matrix,
    style: &OverlayStyle,
) -> Option<OverlayPrimitive> {
    if let Some(rect) = local_rect(&node.kind) {
        return Some(OverlayPrimitive {
            shape,
            geometry: OverlayGeometry::Rect(rect),
            transform: absolute,
            fill: style.rect_fill,
            stroke: None,
        });
    }

    let mut outline = BezPath::new();
    for path in paths_of(&node.kind)? {
        if let Some(figure) = to_bez_path(path) {
            outline.extend(figure.elements().iter().copied());
        }
    }
    if outline.elements().is_empty() {
        log::trace!("no drawable outline for {shape:?}");
        return None;
    }
    Some(OverlayPrimitive {
        shape,
        geometry: OverlayGeometry::Path(outline),
        transform: absolute,
        fill: style.path_fill,
        stroke: Some((style.path_stroke, style.stroke_width)),
    })
}

// ─── Renderer boundary ───────────────────────────────────────────────────

/// Receiver of overlay changes.
pub trait OverlaySink {
    fn add(&mut self, id: OverlayId, primitive: OverlayPrimitive);
    fn remove(&mut self, id: OverlayId);
}

/// In-memory overlay layer, ordered by handle.
#[derive(Debug, Clone, Default)]
pub struct OverlayLayer {
    items: BTreeMap<OverlayId, OverlayPrimitive>,
}

impl OverlayLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: OverlayId) -> Option<&OverlayPrimitive> {
        self.items.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OverlayId, &OverlayPrimitive)> {
        self.items.iter().map(|(id, p)| (*id, p))
    }

    /// Shapes currently highlighted.
    pub fn shapes(&self) -> Vec<NodeIndex> {
        self.items.values().map(|p| p.shape).collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl OverlaySink for OverlayLayer {
    fn add(&mut self, id: OverlayId, primitive: OverlayPrimitive) {
        if self.items.insert(id, primitive).is_some() {
            log::warn!("overlay {id:?} replaced");
        }
    }

    fn remove(&mut self, id: OverlayId) {
        if self.items.remove(&id).is_none() {
            log::warn!("overlay {id:?} was not present");
        }
    }
}
