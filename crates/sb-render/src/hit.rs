//! Hit testing: point → shape lookup.
//!
//! Walks the shape tree from the root in child order and returns the first
//! content shape whose transformed bounds contain the point. Bounds are the
//! axis-aligned box of the transformed geometry, edges inclusive; freehand
//! and clip shapes test each path's box separately.

use kurbo::Point;
use sb_core::geometry::{contains_inclusive, local_rect, paths_of, transformed_path_bounds};
use sb_core::{Matrix, NodeIndex, Page, ShapeKind, ShapeTree, compose, view_to_page};

/// Find the shape at `point` (page space).
/// Returns `None` if nothing is hit, including for an empty tree.
pub fn find_shape_at(tree: &ShapeTree, point: Point) -> Option<NodeIndex> {
    if !tree.is_container(tree.root) {
        return None;
    }
    let found = find_in(tree, tree.root, Matrix::IDENTITY, point);
    log::trace!("hit ({}, {}) -> {found:?}", point.x, point.y);
    found
}

/// Map a click in a `view_width × view_height` view of `page` into page
/// space, then hit test.
pub fn find_shape_in_view(
    page: &Page,
    view_width: f64,
    view_height: f64,
    point: Point,
) -> Option<NodeIndex> {
    let page_point = view_to_page(page, view_width, view_height, point)?;
    find_shape_at(&page.shapes, page_point)
}

fn find_in(tree: &ShapeTree, idx: NodeIndex, parent_abs: Matrix, point: Point) -> Option<NodeIndex> {
    let node = tree.get(idx)?;
    let abs = compose(node.transform, parent_abs);

    if !node.is_container() {
        return shape_contains(&node.kind, abs, point).then_some(idx);
    }

    for child in tree.children(idx) {
        if let Some(found) = find_in(tree, child, abs, point) {
            // Untagged content inside a tagged group stands for the group.
            let untagged = tree.get(found).is_some_and(|f| f.parent_tag.is_none());
            if untagged && node.parent_tag.is_some() {
                return Some(idx);
            }
            return Some(found);
        }
    }
    None
}

/// Does a content shape placed by `absolute` cover `point`?
/// Always false for collections.
pub fn shape_contains(kind: &ShapeKind, absolute: Matrix, point: Point) -> bool {
    if let Some(rect) = local_rect(kind) {
        return contains_inclusive(absolute.transform_bounds(rect), point);
    }
    match paths_of(kind) {
        Some(paths) => transformed_path_bounds(paths, absolute)
            .into_iter()
            .any(|bounds| contains_inclusive(bounds, point)),
        None => false,
    }
}
