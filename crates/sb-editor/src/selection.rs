//! Shape-tree selection: single, toggle and range selection with marks and
//! overlays.
//!
//! Every shape in the page gets a [`SelectionNode`] when the controller is
//! built; the arena is laid out in pre-order, so a range selection is a slice
//! scan. Operations return [`SelectionEffects`] describing what changed
//! instead of notifying listeners, and the caller forwards them to the tag
//! mirror and the overlay renderer.
//!
//! A container is *marked* when every direct child is marked; a leaf is
//! marked when it is selected and its overlay was materialized. Marks are
//! recomputed bottom-up after every operation, skipping nodes already marked.
//! Any deselection clears marks on the subtree and on every ancestor, which
//! keeps the skip sound.

use crate::shortcuts::Modifiers;
use sb_core::{
    BrowserConfig, NodeIndex, OverlayStyle, ShapeIndex, ShapeKind, ShapeTree, absolute_of,
};
use sb_render::{OverlayId, OverlayPrimitive, OverlaySink, build_overlay};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

// ─── Nodes ───────────────────────────────────────────────────────────────

/// Position of a node in the selection arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelId(u32);

impl SelId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// View state of one shape.
#[derive(Debug, Clone)]
pub struct SelectionNode {
    pub shape: NodeIndex,
    pub parent: Option<SelId>,
    /// Fixed when the controller is built.
    pub children: SmallVec<[SelId; 4]>,
    pub is_container: bool,
    pub expanded: bool,
    pub selected: bool,
    pub marked: bool,
    pub overlay: Option<OverlayId>,
}

// ─── Effects ─────────────────────────────────────────────────────────────

/// Net result of one selection operation. Shapes appear in `selected` only
/// if they were not selected before the operation, and so on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionEffects {
    /// Newly selected shapes, in selection order.
    pub selected: Vec<NodeIndex>,
    pub deselected: Vec<NodeIndex>,
    pub marked: Vec<NodeIndex>,
    pub unmarked: Vec<NodeIndex>,
    pub overlays_added: Vec<(OverlayId, OverlayPrimitive)>,
    pub overlays_removed: Vec<OverlayId>,
}

impl SelectionEffects {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
            && self.deselected.is_empty()
            && self.marked.is_empty()
            && self.unmarked.is_empty()
            && self.overlays_added.is_empty()
            && self.overlays_removed.is_empty()
    }

    fn add_overlay(&mut self, id: OverlayId, primitive: OverlayPrimitive) {
        self.overlays_added.push((id, primitive));
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        match self.overlays_added.iter().position(|(added, _)| *added == id) {
            Some(pos) => {
                self.overlays_added.remove(pos);
            }
            None => self.overlays_removed.push(id),
        }
    }

    /// Forward overlay changes to a renderer: removals first.
    pub fn apply_overlays(&self, sink: &mut impl OverlaySink) {
        for &id in &self.overlays_removed {
            sink.remove(id);
        }
        for (id, primitive) in &self.overlays_added {
            sink.add(*id, primitive.clone());
        }
    }
}

struct Snapshot {
    selected: Vec<SelId>,
    marked: HashSet<SelId>,
}

// ─── Controller ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    nodes: Vec<SelectionNode>,
    by_shape: HashMap<NodeIndex, SelId>,
    /// Selected nodes in selection order.
    selected: Vec<SelId>,
    /// Fixed end of a range selection.
    anchor: Option<SelId>,
    next_overlay: u32,
    style: OverlayStyle,
    expand_on_select: bool,
}

impl SelectionController {
    /// One node per shape of `tree`, root expanded, nothing selected.
    pub fn build(tree: &ShapeTree, config: &BrowserConfig) -> Self {
        let mut controller = Self {
            nodes: Vec::with_capacity(tree.len()),
            by_shape: HashMap::with_capacity(tree.len()),
            selected: Vec::new(),
            anchor: None,
            next_overlay: 0,
            style: config.overlay.clone(),
            expand_on_select: config.expand_on_select,
        };
        controller.add_node(tree, tree.root, None);
        log::debug!("selection tree built: {} nodes", controller.nodes.len());
        controller
    }

    fn add_node(&mut self, tree: &ShapeTree, shape: NodeIndex, parent: Option<SelId>) -> SelId {
        let id = SelId(self.nodes.len() as u32);
        self.nodes.push(SelectionNode {
            shape,
            parent,
            children: SmallVec::new(),
            is_container: tree.is_container(shape),
            expanded: parent.is_none(),
            selected: false,
            marked: false,
            overlay: None,
        });
        self.by_shape.insert(shape, id);
        for child in tree.children(shape) {
            let child_id = self.add_node(tree, child, Some(id));
            self.nodes[id.index()].children.push(child_id);
        }
        id
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, shape: NodeIndex) -> Option<&SelectionNode> {
        self.by_shape.get(&shape).map(|id| &self.nodes[id.index()])
    }

    pub fn is_selected(&self, shape: NodeIndex) -> bool {
        self.node(shape).is_some_and(|n| n.selected)
    }

    pub fn is_marked(&self, shape: NodeIndex) -> bool {
        self.node(shape).is_some_and(|n| n.marked)
    }

    pub fn is_expanded(&self, shape: NodeIndex) -> bool {
        self.node(shape).is_some_and(|n| n.expanded)
    }

    /// Selected shapes in selection order.
    pub fn selected_shapes(&self) -> Vec<NodeIndex> {
        self.selected.iter().map(|id| self.shape_of(*id)).collect()
    }

    pub fn anchor(&self) -> Option<NodeIndex> {
        self.anchor.map(|id| self.shape_of(id))
    }

    fn shape_of(&self, id: SelId) -> NodeIndex {
        self.nodes[id.index()].shape
    }

    fn lookup(&self, tree: &ShapeTree, shape: NodeIndex) -> Option<SelId> {
        if !tree.contains(shape) {
            return None;
        }
        self.by_shape.get(&shape).copied()
    }

    // ─── Operations ──────────────────────────────────────────────────────

    /// Select `shape` combined with the current selection per `modifiers`.
    /// A shape that is not in the tree changes nothing.
    pub fn select(
        &mut self,
        tree: &ShapeTree,
        index: &ShapeIndex,
        shape: NodeIndex,
        modifiers: Modifiers,
    ) -> SelectionEffects {
        let Some(target) = self.lookup(tree, shape) else {
            log::debug!("select: {shape:?} not in the current tree");
            return SelectionEffects::default();
        };
        log::debug!("select {shape:?} ({modifiers:?})");

        let before = self.snapshot();
        let mut fx = SelectionEffects::default();
        match modifiers {
            Modifiers::None => {
                self.clear_all(&mut fx);
                self.select_node(tree, index, target, &mut fx);
                self.anchor = Some(target);
            }
            Modifiers::Ctrl => {
                if self.nodes[target.index()].selected {
                    self.deselect_node(target, &mut fx);
                    if self.selected.is_empty() {
                        self.anchor = None;
                    }
                } else {
                    self.select_node(tree, index, target, &mut fx);
                    self.anchor = Some(target);
                }
            }
            Modifiers::Shift => {
                self.clear_all(&mut fx);
                self.select_range(tree, index, target, &mut fx);
            }
            Modifiers::CtrlShift => self.select_range(tree, index, target, &mut fx),
        }
        self.finish(before, fx)
    }

    /// Replace the selection with `shapes`, skipping any not in the tree.
    /// The first one becomes the anchor.
    pub fn select_only(
        &mut self,
        tree: &ShapeTree,
        index: &ShapeIndex,
        shapes: &[NodeIndex],
    ) -> SelectionEffects {
        let before = self.snapshot();
        let mut fx = SelectionEffects::default();
        self.clear_all(&mut fx);
        for &shape in shapes {
            if let Some(id) = self.lookup(tree, shape) {
                self.select_node(tree, index, id, &mut fx);
                self.anchor.get_or_insert(id);
            }
        }
        self.finish(before, fx)
    }

    /// Deselect everything.
    pub fn clear(&mut self) -> SelectionEffects {
        let before = self.snapshot();
        let mut fx = SelectionEffects::default();
        self.clear_all(&mut fx);
        self.finish(before, fx)
    }

    /// Detach every selected shape from `tree` and clear the selection.
    /// Returns the number of shapes removed, descendants included. Shapes
    /// already gone count as zero; parents are never pruned, but they stop
    /// listing the removed nodes as children.
    pub fn remove_selected_items(&mut self, tree: &mut ShapeTree) -> (usize, SelectionEffects) {
        let before = self.snapshot();
        let removed: usize = self
            .selected
            .iter()
            .map(|id| tree.detach(self.nodes[id.index()].shape))
            .sum();
        let live: Vec<bool> = self.nodes.iter().map(|n| tree.contains(n.shape)).collect();
        for node in &mut self.nodes {
            node.children.retain(|child| live[child.index()]);
        }
        let mut fx = SelectionEffects::default();
        self.clear_all(&mut fx);
        log::debug!("removed {removed} shapes");
        (removed, self.finish(before, fx))
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            selected: self.selected.clone(),
            marked: (0..self.nodes.len())
                .map(|i| SelId(i as u32))
                .filter(|id| self.nodes[id.index()].marked)
                .collect(),
        }
    }

    fn finish(&mut self, before: Snapshot, mut fx: SelectionEffects) -> SelectionEffects {
        if !self.nodes.is_empty() {
            self.refresh_marks(SelId(0));
        }

        let was_selected: HashSet<SelId> = before.selected.iter().copied().collect();
        let now_selected: HashSet<SelId> = self.selected.iter().copied().collect();
        fx.selected = self
            .selected
            .iter()
            .filter(|id| !was_selected.contains(id))
            .map(|id| self.shape_of(*id))
            .collect();
        fx.deselected = before
            .selected
            .iter()
            .filter(|id| !now_selected.contains(id))
            .map(|id| self.shape_of(*id))
            .collect();

        for (i, node) in self.nodes.iter().enumerate() {
            let was_marked = before.marked.contains(&SelId(i as u32));
            match (was_marked, node.marked) {
                (false, true) => fx.marked.push(node.shape),
                (true, false) => fx.unmarked.push(node.shape),
                _ => {}
            }
        }
        fx
    }

    /// Select a node and, for a container, its whole subtree.
    fn select_node(&mut self, tree: &ShapeTree, index: &ShapeIndex, id: SelId, fx: &mut SelectionEffects) {
        let node = &mut self.nodes[id.index()];
        if !node.selected {
            node.selected = true;
            self.selected.push(id);
        }
        if node.is_container {
            let children = node.children.clone();
            for child in children {
                if tree.contains(self.shape_of(child)) {
                    self.select_node(tree, index, child, fx);
                }
            }
        } else if node.overlay.is_none() {
            self.materialize(tree, index, id, fx);
        }
        if self.expand_on_select {
            self.expand_ancestors(id);
        }
    }

    fn materialize(&mut self, tree: &ShapeTree, index: &ShapeIndex, id: SelId, fx: &mut SelectionEffects) {
        let shape = self.shape_of(id);
        let Some(node) = tree.get(shape) else {
            return;
        };
        let absolute = absolute_of(tree, index, shape);
        if let Some(primitive) = build_overlay(shape, node, absolute, &self.style) {
            let overlay = OverlayId(self.next_overlay);
            self.next_overlay += 1;
            self.nodes[id.index()].overlay = Some(overlay);
            fx.add_overlay(overlay, primitive);
        }
    }

    fn expand_ancestors(&mut self, id: SelId) {
        let mut current = self.nodes[id.index()].parent;
        while let Some(parent) = current {
            let node = &mut self.nodes[parent.index()];
            node.expanded = true;
            current = node.parent;
        }
    }

    /// Deselect a subtree, then every ancestor. Siblings keep their state.
    fn deselect_node(&mut self, id: SelId, fx: &mut SelectionEffects) {
        self.clear_subtree(id, fx);
        let mut current = self.nodes[id.index()].parent;
        while let Some(parent) = current {
            let node = &mut self.nodes[parent.index()];
            node.selected = false;
            node.marked = false;
            current = node.parent;
        }
        self.selected.retain(|s| self.nodes[s.index()].selected);
    }

    fn clear_subtree(&mut self, id: SelId, fx: &mut SelectionEffects) {
        let node = &mut self.nodes[id.index()];
        node.selected = false;
        node.marked = false;
        if let Some(overlay) = node.overlay.take() {
            fx.remove_overlay(overlay);
        }
        let children = node.children.clone();
        for child in children {
            self.clear_subtree(child, fx);
        }
    }

    fn clear_all(&mut self, fx: &mut SelectionEffects) {
        for node in &mut self.nodes {
            node.selected = false;
            node.marked = false;
            if let Some(overlay) = node.overlay.take() {
                fx.remove_overlay(overlay);
            }
        }
        self.selected.clear();
    }

    /// Select every node between the anchor and `target` in pre-order,
    /// both ends included. A container strictly inside the range is selected
    /// only when its whole subtree lies inside it; otherwise just its
    /// in-range descendants are. Without an anchor this selects `target`
    /// alone and makes it the anchor.
    fn select_range(&mut self, tree: &ShapeTree, index: &ShapeIndex, target: SelId, fx: &mut SelectionEffects) {
        let anchor = self
            .anchor
            .filter(|a| tree.contains(self.shape_of(*a)));
        let Some(anchor) = anchor.filter(|a| *a != target) else {
            self.select_node(tree, index, target, fx);
            self.anchor = Some(anchor.unwrap_or(target));
            return;
        };

        let (first, last) = (anchor.min(target), anchor.max(target));
        for i in first.index()..=last.index() {
            let id = SelId(i as u32);
            if !tree.contains(self.shape_of(id)) {
                continue;
            }
            let endpoint = id == first || id == last;
            if endpoint || self.subtree_end(id) <= last {
                self.select_node(tree, index, id, fx);
            }
        }
    }

    /// Last node of `id`'s subtree in pre-order.
    fn subtree_end(&self, id: SelId) -> SelId {
        let mut current = id;
        while let Some(&child) = self.nodes[current.index()].children.last() {
            current = child;
        }
        current
    }

    /// Post-order mark pass. Returns whether `id` is marked.
    fn refresh_marks(&mut self, id: SelId) -> bool {
        let node = &self.nodes[id.index()];
        if node.marked {
            return true;
        }
        let marked = if node.is_container {
            let children = node.children.clone();
            let selected = node.selected;
            let mut all = true;
            for &child in &children {
                // Every child is visited so each subtree gets its own marks.
                all &= self.refresh_marks(child);
            }
            if children.is_empty() { selected } else { all }
        } else {
            node.selected && node.overlay.is_some()
        };
        self.nodes[id.index()].marked = marked;
        marked
    }

    // ─── Presentation ────────────────────────────────────────────────────

    /// Indented outline of the shape tree: `*` marks selected rows, `+`
    /// expanded ones.
    pub fn outline(&self, tree: &ShapeTree, index: &ShapeIndex) -> String {
        let mut out = String::new();
        if !self.nodes.is_empty() {
            self.outline_node(tree, index, SelId(0), 0, &mut out);
        }
        out
    }

    fn outline_node(&self, tree: &ShapeTree, index: &ShapeIndex, id: SelId, depth: usize, out: &mut String) {
        let node = &self.nodes[id.index()];
        if !tree.contains(node.shape) {
            return;
        }
        out.push_str(&"  ".repeat(depth));
        if node.selected {
            out.push('*');
        }
        if node.expanded {
            out.push('+');
        }
        if node.selected || node.expanded {
            out.push(' ');
        }
        out.push_str(&shape_label(tree, index, node.shape).unwrap_or_default());
        out.push('\n');
        for &child in &node.children {
            self.outline_node(tree, index, child, depth + 1, out);
        }
    }
}

/// Row label: `Shape Collection {address}` for containers,
/// `{Kind} {address}` for content.
pub fn shape_label(tree: &ShapeTree, index: &ShapeIndex, shape: NodeIndex) -> Option<String> {
    let node = tree.get(shape)?;
    let address = index.address(shape)?;
    Some(match node.kind {
        ShapeKind::Collection => format!("Shape Collection {address}"),
        _ => format!("{} {address}", node.kind.name()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sb_core::{Matrix, ShapeNode};

    struct Fixture {
        tree: ShapeTree,
        index: ShapeIndex,
        group: NodeIndex,
        leaves: Vec<NodeIndex>,
    }

    /// root ── group ── leaf × 3
    fn group_of_three() -> Fixture {
        let mut tree = ShapeTree::new();
        let group = tree.add_node(tree.root, ShapeNode::new(ShapeKind::Collection));
        let leaves = (0..3)
            .map(|i| {
                tree.add_node(
                    group,
                    ShapeNode::new(ShapeKind::Image {
                        width: 10.0,
                        height: 10.0,
                    })
                    .with_transform(Matrix::translate(20.0 * i as f64, 0.0)),
                )
            })
            .collect();
        let index = ShapeIndex::build(&tree);
        Fixture {
            tree,
            index,
            group,
            leaves,
        }
    }

    fn controller(fx: &Fixture) -> SelectionController {
        SelectionController::build(&fx.tree, &BrowserConfig::default())
    }

    #[test]
    fn plain_select_replaces() {
        let f = group_of_three();
        let mut sel = controller(&f);
        let fx = sel.select(&f.tree, &f.index, f.leaves[0], Modifiers::None);
        assert_eq!(fx.selected, vec![f.leaves[0]]);
        assert_eq!(fx.overlays_added.len(), 1);

        let fx = sel.select(&f.tree, &f.index, f.leaves[1], Modifiers::None);
        assert_eq!(fx.selected, vec![f.leaves[1]]);
        assert_eq!(fx.deselected, vec![f.leaves[0]]);
        assert_eq!(fx.overlays_removed.len(), 1);
        assert_eq!(sel.selected_shapes(), vec![f.leaves[1]]);
        assert_eq!(sel.anchor(), Some(f.leaves[1]));
    }

    #[test]
    fn container_marked_only_when_all_children_marked() {
        let f = group_of_three();
        let mut sel = controller(&f);

        sel.select(&f.tree, &f.index, f.leaves[0], Modifiers::Ctrl);
        sel.select(&f.tree, &f.index, f.leaves[1], Modifiers::Ctrl);
        assert!(!sel.is_marked(f.group));

        let fx = sel.select(&f.tree, &f.index, f.leaves[2], Modifiers::Ctrl);
        assert!(sel.is_marked(f.group));
        assert!(fx.marked.contains(&f.group));
        assert!(!sel.is_selected(f.group));

        let fx = sel.select(&f.tree, &f.index, f.leaves[1], Modifiers::Ctrl);
        assert!(!sel.is_marked(f.group));
        assert!(fx.unmarked.contains(&f.group));
        assert!(fx.unmarked.contains(&f.leaves[1]));
        // Siblings keep their marks.
        assert!(sel.is_marked(f.leaves[0]));
        assert!(sel.is_marked(f.leaves[2]));
    }

    #[test]
    fn ctrl_toggle_clears_anchor_when_empty() {
        let f = group_of_three();
        let mut sel = controller(&f);
        sel.select(&f.tree, &f.index, f.leaves[0], Modifiers::Ctrl);
        assert_eq!(sel.anchor(), Some(f.leaves[0]));
        sel.select(&f.tree, &f.index, f.leaves[0], Modifiers::Ctrl);
        assert_eq!(sel.anchor(), None);
        assert!(sel.selected_shapes().is_empty());
    }

    #[test]
    fn selecting_container_selects_subtree() {
        let f = group_of_three();
        let mut sel = controller(&f);
        let fx = sel.select(&f.tree, &f.index, f.group, Modifiers::None);
        assert_eq!(fx.selected.len(), 4);
        assert_eq!(fx.overlays_added.len(), 3);
        assert!(sel.is_marked(f.group));

        // Deselecting one child deselects the container but not siblings.
        sel.select(&f.tree, &f.index, f.leaves[0], Modifiers::Ctrl);
        assert!(!sel.is_selected(f.group));
        assert!(sel.is_selected(f.leaves[1]));
        assert!(sel.is_selected(f.leaves[2]));
    }

    #[test]
    fn empty_container_marks_when_selected() {
        let mut tree = ShapeTree::new();
        let empty = tree.add_node(tree.root, ShapeNode::new(ShapeKind::Collection));
        let index = ShapeIndex::build(&tree);
        let mut sel = SelectionController::build(&tree, &BrowserConfig::default());
        assert!(!sel.is_marked(empty));
        sel.select(&tree, &index, empty, Modifiers::None);
        assert!(sel.is_marked(empty));
    }

    #[test]
    fn shift_without_anchor_selects_target_only() {
        let f = group_of_three();
        let mut sel = controller(&f);
        let fx = sel.select(&f.tree, &f.index, f.leaves[1], Modifiers::Shift);
        assert_eq!(fx.selected, vec![f.leaves[1]]);
        assert_eq!(sel.anchor(), Some(f.leaves[1]));
    }

    #[test]
    fn removal_lets_container_mark_again() {
        let mut f = group_of_three();
        let mut sel = controller(&f);
        sel.select(&f.tree, &f.index, f.leaves[0], Modifiers::None);
        let (removed, _) = sel.remove_selected_items(&mut f.tree);
        assert_eq!(removed, 1);
        assert_eq!(sel.node(f.group).unwrap().children.len(), 2);

        sel.select(&f.tree, &f.index, f.leaves[1], Modifiers::Ctrl);
        assert!(!sel.is_marked(f.group));
        let fx = sel.select(&f.tree, &f.index, f.leaves[2], Modifiers::Ctrl);
        assert!(sel.is_marked(f.group));
        assert!(fx.marked.contains(&f.group));
    }

    #[test]
    fn range_into_container_stops_at_target() {
        // root ── [loose, nested ── [a, b]]
        let mut tree = ShapeTree::new();
        let image = || {
            ShapeNode::new(ShapeKind::Image {
                width: 10.0,
                height: 10.0,
            })
        };
        let loose = tree.add_node(tree.root, image());
        let nested = tree.add_node(tree.root, ShapeNode::new(ShapeKind::Collection));
        let a = tree.add_node(nested, image());
        let b = tree.add_node(nested, image());
        let index = ShapeIndex::build(&tree);
        let mut sel = SelectionController::build(&tree, &BrowserConfig::default());

        sel.select(&tree, &index, loose, Modifiers::Ctrl);
        sel.select(&tree, &index, a, Modifiers::CtrlShift);
        assert_eq!(sel.selected_shapes(), vec![loose, a]);
        assert!(!sel.is_selected(nested));
        assert!(!sel.is_selected(b));

        // Backwards from b to loose covers the whole container.
        sel.select(&tree, &index, b, Modifiers::None);
        sel.select(&tree, &index, loose, Modifiers::Shift);
        assert!(sel.is_selected(nested));
        assert!(sel.is_selected(a));
        assert!(sel.is_marked(nested));
    }

    #[test]
    fn stale_shape_changes_nothing() {
        let mut f = group_of_three();
        let mut sel = controller(&f);
        sel.select(&f.tree, &f.index, f.leaves[0], Modifiers::None);
        f.tree.detach(f.leaves[2]);
        let fx = sel.select(&f.tree, &f.index, f.leaves[2], Modifiers::None);
        assert!(fx.is_empty());
        assert_eq!(sel.selected_shapes(), vec![f.leaves[0]]);
    }

    #[test]
    fn reselect_yields_no_net_change() {
        let f = group_of_three();
        let mut sel = controller(&f);
        sel.select(&f.tree, &f.index, f.leaves[0], Modifiers::None);
        let fx = sel.select(&f.tree, &f.index, f.leaves[0], Modifiers::None);
        assert!(fx.selected.is_empty());
        assert!(fx.deselected.is_empty());
        // The overlay is rebuilt: one out, one in.
        assert_eq!(fx.overlays_removed.len(), 1);
        assert_eq!(fx.overlays_added.len(), 1);
    }

    #[test]
    fn selection_expands_ancestors() {
        let f = group_of_three();
        let mut sel = controller(&f);
        assert!(!sel.is_expanded(f.group));
        sel.select(&f.tree, &f.index, f.leaves[2], Modifiers::None);
        assert!(sel.is_expanded(f.group));
        assert!(sel.is_expanded(f.tree.root));
    }

    #[test]
    fn outline_marks_rows() {
        let f = group_of_three();
        let mut sel = controller(&f);
        sel.select(&f.tree, &f.index, f.leaves[0], Modifiers::None);
        assert_eq!(
            sel.outline(&f.tree, &f.index),
            "+ Shape Collection 0\n  + Shape Collection 0:1\n    * ImageShape 1\n    ImageShape 1\n    ImageShape 1\n"
        );
    }
}
