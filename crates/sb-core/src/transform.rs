//! Affine transforms and their composition along the shape tree.
//!
//! Shapes carry a local 6-parameter matrix. The absolute transform of a node
//! is its local matrix followed by every ancestor's local matrix, nearest
//! ancestor first. All composition goes through [`compose`] so the order is
//! decided in exactly one place.

use crate::address::ShapeIndex;
use crate::model::{Orientation, Page, ShapeTree};
use kurbo::{Affine, Point, Rect};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

// ─── Matrix ──────────────────────────────────────────────────────────────

/// A 2-D affine matrix in the six-parameter form used by PDF content:
///
/// ```text
/// | scale_x  shear_x  0 |
/// | shear_y  scale_y  0 |
/// | offset_x offset_y 1 |
/// ```
///
/// Points are row vectors: `x' = x·scale_x + y·shear_y + offset_x` and
/// `y' = x·shear_x + y·scale_y + offset_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Matrix {
    pub scale_x: f64,
    pub shear_x: f64,
    pub shear_y: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(
        scale_x: f64,
        shear_x: f64,
        shear_y: f64,
        scale_y: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> Self {
        Self {
            scale_x,
            shear_x,
            shear_y,
            scale_y,
            offset_x,
            offset_y,
        }
    }

    pub const fn translate(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Clockwise rotation in a y-down space, counter-clockwise in y-up.
    pub fn rotate_degrees(degrees: f64) -> Self {
        Self::from_affine(Affine::rotate(degrees.to_radians()))
    }

    /// Rotation by a whole number of quarter turns, with exact coefficients.
    pub const fn quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Self::IDENTITY,
            1 => Self::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0),
            2 => Self::new(-1.0, 0.0, 0.0, -1.0, 0.0, 0.0),
            _ => Self::new(0.0, -1.0, 1.0, 0.0, 0.0, 0.0),
        }
    }

    pub fn to_affine(self) -> Affine {
        Affine::new([
            self.scale_x,
            self.shear_x,
            self.shear_y,
            self.scale_y,
            self.offset_x,
            self.offset_y,
        ])
    }

    pub fn from_affine(affine: Affine) -> Self {
        let [a, b, c, d, e, f] = affine.as_coeffs();
        Self::new(a, b, c, d, e, f)
    }

    /// `self` applied first, then `outer`.
    #[must_use]
    pub fn then(self, outer: Matrix) -> Matrix {
        Matrix::from_affine(outer.to_affine() * self.to_affine())
    }

    pub fn transform_point(self, p: Point) -> Point {
        self.to_affine() * p
    }

    /// Axis-aligned bounding box of the four transformed corners of `rect`.
    pub fn transform_bounds(self, rect: Rect) -> Rect {
        self.to_affine().transform_rect_bbox(rect)
    }

    /// Inverse matrix, or `None` when the matrix is singular.
    pub fn inverse(self) -> Option<Matrix> {
        let det = self.scale_x * self.scale_y - self.shear_x * self.shear_y;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Matrix::from_affine(self.to_affine().inverse()))
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

// ─── Composition ─────────────────────────────────────────────────────────

/// Absolute transform of a child given its parent's absolute transform:
/// `child_local × parent_absolute`, i.e. the child's own matrix is applied
/// to its geometry first and the parent's afterwards.
#[must_use]
pub fn compose(child_local: Matrix, parent_absolute: Matrix) -> Matrix {
    child_local.then(parent_absolute)
}

/// Composition of every ancestor's local transform, nearest first.
/// Identity for the root.
pub fn parent_transform_of(tree: &ShapeTree, index: &ShapeIndex, node: NodeIndex) -> Matrix {
    let mut acc = Matrix::IDENTITY;
    let mut current = index.parent_of(node);
    while let Some(parent) = current {
        if let Some(shape) = tree.get(parent) {
            acc = compose(acc, shape.transform);
        }
        current = index.parent_of(parent);
    }
    acc
}

/// Absolute transform of `node`: its local matrix followed by every ancestor.
/// O(depth) per call; parents are resolved through the address index.
pub fn absolute_of(tree: &ShapeTree, index: &ShapeIndex, node: NodeIndex) -> Matrix {
    let local = tree
        .get(node)
        .map(|shape| shape.transform)
        .unwrap_or(Matrix::IDENTITY);
    compose(local, parent_transform_of(tree, index, node))
}

// ─── Page ↔ view ─────────────────────────────────────────────────────────

/// Transform from page space (origin bottom-left, y up) to a view of
/// `view_width × view_height` (origin top-left, y down).
///
/// Applied in order: orientation translate, rotation, scale
/// `(view_w / page_w, -view_h / page_h)`, translate `(0, view_h)`.
pub fn page_to_view(page: &Page, view_width: f64, view_height: f64) -> Matrix {
    let (turns, tx, ty) = match page.orientation {
        Orientation::Portrait => (0, 0.0, 0.0),
        Orientation::Rotate90 => (1, 0.0, -page.height),
        Orientation::Rotate180 => (2, -page.width, -page.height),
        Orientation::Rotate270 => (3, -page.width, 0.0),
    };
    let sx = if page.width > 0.0 { view_width / page.width } else { 1.0 };
    let sy = if page.height > 0.0 { view_height / page.height } else { 1.0 };

    Matrix::translate(tx, ty)
        .then(Matrix::quarter_turns(turns))
        .then(Matrix::scale(sx, -sy))
        .then(Matrix::translate(0.0, view_height))
}

/// Map a point in view space back into page space.
/// `None` when the page has a degenerate size.
pub fn view_to_page(page: &Page, view_width: f64, view_height: f64, p: Point) -> Option<Point> {
    page_to_view(page, view_width, view_height)
        .inverse()
        .map(|m| m.transform_point(p))
}
