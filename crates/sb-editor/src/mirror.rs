//! Tag mirror: keeps the logical-structure tree's selection in step with the
//! shape tree.
//!
//! Every propagation runs inside a [`Transaction`] that records where the
//! change started. A change that started in the shape tree updates tags but
//! never asks for shapes; a change that started in the tag tree asks for
//! shapes but ignores the shape tree's answer. Nothing is remembered between
//! transactions, so an early return cannot leave propagation switched off.

use crate::shortcuts::Modifiers;
use sb_core::{NodeIndex, ShapeTree, TagId, TagTree};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Which tree a selection change started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Shapes,
    Tags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagEvent {
    Selected(TagId),
    Deselected(TagId),
}

/// One synchronous propagation pass.
#[derive(Debug)]
pub struct Transaction {
    origin: Origin,
    events: Vec<TagEvent>,
    shape_requests: Vec<NodeIndex>,
}

impl Transaction {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            events: Vec::new(),
            shape_requests: Vec::new(),
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Tag selection changes, in order.
    pub fn events(&self) -> &[TagEvent] {
        &self.events
    }

    /// Shapes the tag tree wants selected.
    pub fn shape_requests(&self) -> &[NodeIndex] {
        &self.shape_requests
    }

    pub fn into_events(self) -> Vec<TagEvent> {
        self.events
    }
}

/// View state of one tag.
#[derive(Debug, Clone, Default)]
pub struct TagItem {
    pub selected: bool,
    pub expanded: bool,
    /// Shapes that name this tag as their parent, in pre-order.
    pub shapes: SmallVec<[NodeIndex; 1]>,
}

impl TagItem {
    /// The shape bound to this tag: the first one found.
    pub fn shape(&self) -> Option<NodeIndex> {
        self.shapes.first().copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TagMirror {
    items: HashMap<TagId, TagItem>,
    root: Option<TagId>,
    expand_on_select: bool,
}

impl TagMirror {
    /// Bind every tag of `tags` to the shapes of `shapes` that reference it.
    pub fn bind(tags: &TagTree, shapes: &ShapeTree, expand_on_select: bool) -> Self {
        let mut items: HashMap<TagId, TagItem> = tags
            .pre_order()
            .into_iter()
            .map(|id| (id, TagItem::default()))
            .collect();
        if let Some(root) = items.get_mut(&tags.root) {
            root.expanded = true;
        }

        let mut bound = 0;
        for shape in shapes.pre_order() {
            let Some(tag) = shapes.get(shape).and_then(|node| node.parent_tag) else {
                continue;
            };
            match items.get_mut(&tag) {
                Some(item) => {
                    item.shapes.push(shape);
                    bound += 1;
                }
                None => log::warn!("shape {shape:?} refers to unknown tag {tag:?}"),
            }
        }
        log::debug!("tag mirror: {} tags, {bound} bound shapes", items.len());

        Self {
            items,
            root: Some(tags.root),
            expand_on_select,
        }
    }

    pub fn item(&self, tag: TagId) -> Option<&TagItem> {
        self.items.get(&tag)
    }

    pub fn is_selected(&self, tag: TagId) -> bool {
        self.items.get(&tag).is_some_and(|item| item.selected)
    }

    pub fn is_expanded(&self, tag: TagId) -> bool {
        self.items.get(&tag).is_some_and(|item| item.expanded)
    }

    /// Selected tags in tree order.
    pub fn selected_tags(&self, tags: &TagTree) -> Vec<TagId> {
        tags.pre_order()
            .into_iter()
            .filter(|&id| self.is_selected(id))
            .collect()
    }

    // ─── Shape tree → tag tree ───────────────────────────────────────────

    /// A shape referencing `tag` was selected: select the tag and expand
    /// the path above it.
    pub fn shape_selected(&mut self, tx: &mut Transaction, tags: &TagTree, tag: TagId) {
        if tx.origin == Origin::Tags {
            return;
        }
        if self.expand_on_select {
            self.expand_path(tags, tag);
        }
        self.set_selected(tx, tag, true);
    }

    /// A shape referencing `tag` was deselected. The tag stays selected
    /// while another selected shape still references it.
    pub fn shape_deselected(&mut self, tx: &mut Transaction, tag: TagId, still_referenced: bool) {
        if tx.origin == Origin::Tags || still_referenced {
            return;
        }
        self.set_selected(tx, tag, false);
    }

    // ─── Tag tree → shape tree ───────────────────────────────────────────

    /// A click on a tag row. Plain clicks select only `tag`; with Ctrl the
    /// tag is toggled. Afterwards the bound shape of every selected tag is
    /// requested.
    pub fn click(&mut self, tx: &mut Transaction, tags: &TagTree, tag: TagId, modifiers: Modifiers) {
        debug_assert_eq!(tx.origin, Origin::Tags);
        if !self.items.contains_key(&tag) {
            log::debug!("click on unknown tag {tag:?}");
            return;
        }

        if modifiers.toggles() {
            let selected = self.is_selected(tag);
            self.set_selected(tx, tag, !selected);
        } else {
            for other in self.selected_tags(tags) {
                if other != tag {
                    self.set_selected(tx, other, false);
                }
            }
            self.set_selected(tx, tag, true);
        }
        if self.expand_on_select {
            self.expand_path(tags, tag);
        }

        tx.shape_requests = self
            .selected_tags(tags)
            .into_iter()
            .filter_map(|id| self.items.get(&id).and_then(TagItem::shape))
            .collect();
        log::debug!(
            "tag click {tag:?}: {} shapes requested",
            tx.shape_requests.len()
        );
    }

    fn set_selected(&mut self, tx: &mut Transaction, tag: TagId, selected: bool) {
        let Some(item) = self.items.get_mut(&tag) else {
            return;
        };
        if item.selected == selected {
            return;
        }
        item.selected = selected;
        log::trace!("tag {tag:?} selected={selected} ({:?})", tx.origin);
        tx.events.push(if selected {
            TagEvent::Selected(tag)
        } else {
            TagEvent::Deselected(tag)
        });
    }

    fn expand_path(&mut self, tags: &TagTree, tag: TagId) {
        for id in tags.path_to(tag) {
            if id == tag {
                break;
            }
            if let Some(item) = self.items.get_mut(&id) {
                item.expanded = true;
            }
        }
    }

    /// Indented outline of the tag tree, marked like the shape outline.
    pub fn outline(&self, tags: &TagTree) -> String {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.outline_tag(tags, root, 0, &mut out);
        }
        out
    }

    fn outline_tag(&self, tags: &TagTree, id: TagId, depth: usize, out: &mut String) {
        let Some(tag) = tags.get(id) else {
            return;
        };
        let selected = self.is_selected(id);
        let expanded = self.is_expanded(id);
        out.push_str(&"  ".repeat(depth));
        if selected {
            out.push('*');
        }
        if expanded {
            out.push('+');
        }
        if selected || expanded {
            out.push(' ');
        }
        out.push_str(&tag.label());
        out.push('\n');
        for child in tags.children(id) {
            self.outline_tag(tags, child, depth + 1, out);
        }
    }
}
