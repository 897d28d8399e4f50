//! Structural changes to a page: deleting the selected shapes and keeping
//! only the selected shapes.
//!
//! Both produce replacement pages with the original size and orientation;
//! the loader persists and reopens them, after which every index is rebuilt.

use crate::selection::{SelectionController, SelectionEffects};
use sb_core::{Document, NodeIndex, Page, ShapeIndex, ShapeTree, absolute_of};

/// Outcome of [`prune_selected`].
#[derive(Debug)]
pub struct Pruned {
    /// Shapes removed, descendants included.
    pub removed: usize,
    pub effects: SelectionEffects,
    /// Every page of the document, with the current one pruned.
    pub pages: Vec<Page>,
}

/// Page with the original geometry and the content of `wrapped`, minus its
/// synthetic root. A page whose top-level collection was itself removed
/// comes back empty.
pub fn rebuild_page(original: &Page, wrapped: &ShapeTree) -> Page {
    original.with_shapes(wrapped.unwrapped().unwrap_or_default())
}

/// Remove the selected shapes from `wrapped` and build the document's new
/// page list.
pub fn prune_selected(
    selection: &mut SelectionController,
    wrapped: &mut ShapeTree,
    document: &Document,
    page_index: usize,
) -> Pruned {
    let (removed, effects) = selection.remove_selected_items(wrapped);
    let pages = document
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            if i == page_index {
                rebuild_page(page, wrapped)
            } else {
                page.clone()
            }
        })
        .collect();
    Pruned {
        removed,
        effects,
        pages,
    }
}

/// A page holding copies of the selected shapes, in selection order.
///
/// Shapes whose ancestor is also selected come along with that ancestor
/// and are not copied twice. Each copy takes its absolute transform so it
/// stays where it was drawn.
pub fn keep_selected(
    selection: &SelectionController,
    wrapped: &ShapeTree,
    index: &ShapeIndex,
    page: &Page,
) -> Page {
    let selected = selection.selected_shapes();
    let has_selected_ancestor = |shape: NodeIndex| {
        let mut current = wrapped.parent(shape);
        while let Some(parent) = current {
            if selection.is_selected(parent) {
                return true;
            }
            current = wrapped.parent(parent);
        }
        false
    };

    let mut kept = ShapeTree::new();
    let root = kept.root;
    for shape in selected {
        if !wrapped.contains(shape) || has_selected_ancestor(shape) {
            continue;
        }
        if shape == wrapped.root {
            for child in wrapped.children(shape) {
                wrapped.copy_subtree_into(child, &mut kept, root);
            }
            continue;
        }
        let absolute = absolute_of(wrapped, index, shape);
        if let Some(copy) = wrapped.copy_subtree_into(shape, &mut kept, root) {
            kept.graph[copy].transform = absolute;
        }
    }
    log::debug!("keeping {} shapes", kept.len() - 1);
    page.with_shapes(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::Modifiers;
    use sb_core::{BrowserConfig, Matrix, ShapeKind, ShapeNode};

    fn image() -> ShapeNode {
        ShapeNode::new(ShapeKind::Image {
            width: 5.0,
            height: 5.0,
        })
    }

    /// wrapper ── page root ── group(+10, 0) ── a, b
    fn page() -> (Page, ShapeTree) {
        let mut page = Page::new(100.0, 50.0);
        let root = page.shapes.root;
        let group = page.shapes.add_node(
            root,
            ShapeNode::new(ShapeKind::Collection).with_transform(Matrix::translate(10.0, 0.0)),
        );
        page.shapes.add_node(group, image());
        page.shapes.add_node(group, image().with_transform(Matrix::translate(0.0, 7.0)));
        let wrapped = page.shapes.wrapped();
        (page, wrapped)
    }

    fn leaves(wrapped: &ShapeTree) -> (NodeIndex, NodeIndex, NodeIndex) {
        let page_root = wrapped.children(wrapped.root)[0];
        let group = wrapped.children(page_root)[0];
        let kids = wrapped.children(group);
        (group, kids[0], kids[1])
    }

    #[test]
    fn deleting_only_child_keeps_empty_parent() {
        let (page, mut wrapped) = page();
        let index = ShapeIndex::build(&wrapped);
        let (group, a, b) = leaves(&wrapped);
        let mut sel = SelectionController::build(&wrapped, &BrowserConfig::default());
        sel.select(&wrapped, &index, a, Modifiers::None);
        sel.select(&wrapped, &index, b, Modifiers::Ctrl);

        let doc = Document {
            pages: vec![page.clone()],
            ..Document::default()
        };
        let pruned = prune_selected(&mut sel, &mut wrapped, &doc, 0);
        assert_eq!(pruned.removed, 2);
        assert!(wrapped.contains(group));
        assert!(wrapped.children(group).is_empty());

        let rebuilt = &pruned.pages[0];
        assert_eq!((rebuilt.width, rebuilt.height), (100.0, 50.0));
        assert_eq!(rebuilt.shapes.len(), 2);
        assert!(sel.selected_shapes().is_empty());

        // Nothing left to remove.
        let again = prune_selected(&mut sel, &mut wrapped, &doc, 0);
        assert_eq!(again.removed, 0);
    }

    #[test]
    fn deleting_page_root_empties_page() {
        let (page, mut wrapped) = page();
        let index = ShapeIndex::build(&wrapped);
        let page_root = wrapped.children(wrapped.root)[0];
        let mut sel = SelectionController::build(&wrapped, &BrowserConfig::default());
        sel.select(&wrapped, &index, page_root, Modifiers::None);

        let doc = Document {
            pages: vec![page],
            ..Document::default()
        };
        let pruned = prune_selected(&mut sel, &mut wrapped, &doc, 0);
        assert_eq!(pruned.removed, 4);
        assert!(pruned.pages[0].shapes.is_empty());
    }

    #[test]
    fn kept_shapes_carry_absolute_transform() {
        let (page, wrapped) = page();
        let index = ShapeIndex::build(&wrapped);
        let (_, _, b) = leaves(&wrapped);
        let mut sel = SelectionController::build(&wrapped, &BrowserConfig::default());
        sel.select(&wrapped, &index, b, Modifiers::None);

        let kept = keep_selected(&sel, &wrapped, &index, &page);
        let kids = kept.shapes.children(kept.shapes.root);
        assert_eq!(kids.len(), 1);
        assert_eq!(
            kept.shapes.get(kids[0]).unwrap().transform,
            Matrix::translate(10.0, 7.0)
        );
    }

    #[test]
    fn kept_group_is_copied_once() {
        let (page, wrapped) = page();
        let index = ShapeIndex::build(&wrapped);
        let (group, _, _) = leaves(&wrapped);
        let mut sel = SelectionController::build(&wrapped, &BrowserConfig::default());
        sel.select(&wrapped, &index, group, Modifiers::None);

        let kept = keep_selected(&sel, &wrapped, &index, &page);
        // root + group + two leaves
        assert_eq!(kept.shapes.len(), 4);
    }
}
