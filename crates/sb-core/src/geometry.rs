//! Local geometry of shapes: bounding rectangles and path outlines in the
//! shape's own coordinate space (before any transform).

use crate::model::{FreeHandPath, PathSegment, ShapeKind};
use crate::transform::Matrix;
use kurbo::{BezPath, Point, Rect, Shape};

/// Local rectangle of a text or image shape: `(0, 0)` to its size.
/// `None` for collections and path-based shapes.
pub fn local_rect(kind: &ShapeKind) -> Option<Rect> {
    match kind {
        ShapeKind::Text {
            measured_width,
            measured_height,
            ..
        } => Some(Rect::new(0.0, 0.0, *measured_width, *measured_height)),
        ShapeKind::Image { width, height } => Some(Rect::new(0.0, 0.0, *width, *height)),
        ShapeKind::Collection | ShapeKind::FreeHand { .. } | ShapeKind::Clip { .. } => None,
    }
}

/// Path data of a freehand or clip shape.
pub fn paths_of(kind: &ShapeKind) -> Option<&[FreeHandPath]> {
    match kind {
        ShapeKind::FreeHand { paths } | ShapeKind::Clip { paths } => Some(paths),
        _ => None,
    }
}

/// Build a figure from path segments.
///
/// The figure starts at the last `Start` segment seen (or the origin when
/// there is none); every other segment is drawn in order. A path with no
/// drawing segments has no outline and yields `None`.
pub fn to_bez_path(path: &FreeHandPath) -> Option<BezPath> {
    let start = path
        .segments
        .iter()
        .rev()
        .find_map(|seg| match seg {
            PathSegment::Start { x, y } => Some(Point::new(*x, *y)),
            _ => None,
        })
        .unwrap_or(Point::ZERO);

    let mut bez = BezPath::new();
    bez.move_to(start);
    let mut drawn = false;
    for seg in &path.segments {
        match *seg {
            PathSegment::Start { .. } => {}
            PathSegment::Line { x, y } => {
                bez.line_to((x, y));
                drawn = true;
            }
            PathSegment::Bezier {
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
            } => {
                bez.curve_to((x1, y1), (x2, y2), (x3, y3));
                drawn = true;
            }
        }
    }
    if !drawn {
        return None;
    }
    if path.closed {
        bez.close_path();
    }
    Some(bez)
}

/// Axis-aligned bounds of each path after `transform`, in path order.
/// Paths without an outline are skipped.
pub fn transformed_path_bounds(paths: &[FreeHandPath], transform: Matrix) -> Vec<Rect> {
    let affine = transform.to_affine();
    paths
        .iter()
        .filter_map(to_bez_path)
        .map(|bez| (affine * bez).bounding_box())
        .collect()
}

/// Point-in-rect with every edge inclusive.
pub fn contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}
