//! Browsing session: one document, one current page, both trees.
//!
//! The session owns the loader and everything derived from the current
//! page: the wrapped shape tree, its address index, the selection arena,
//! the tag mirror and the overlay layer. Loading a page (or reopening the
//! document after a mutation) rebuilds all of them from scratch.
//!
//! Every user action runs synchronously to completion and returns an
//! [`Update`] describing what changed in each tree.

use crate::mirror::{Origin, TagEvent, TagMirror, Transaction};
use crate::mutation::{keep_selected, prune_selected};
use crate::selection::{SelectionController, SelectionEffects, shape_label};
use crate::shortcuts::{Modifiers, ShortcutAction, ShortcutMap};
use kurbo::Point;
use sb_core::{
    BrowserConfig, LoadError, NodeIndex, Page, PageLoader, ShapeIndex, ShapeProperties,
    ShapeTree, TagId, view_to_page,
};
use sb_render::{OverlayLayer, find_shape_at};
use std::path::{Path, PathBuf};

/// What one action changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    pub selection: SelectionEffects,
    pub tags: Vec<TagEvent>,
}

impl Update {
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty() && self.tags.is_empty()
    }
}

pub struct Browser<L: PageLoader> {
    loader: L,
    config: BrowserConfig,
    save_path: Option<PathBuf>,

    page_index: usize,
    page: Page,
    /// The page's shapes under a synthetic identity root.
    shapes: ShapeTree,
    index: ShapeIndex,
    selection: SelectionController,
    mirror: TagMirror,
    overlays: OverlayLayer,
}

impl<L: PageLoader> Browser<L> {
    /// Open the first page of the loader's document.
    pub fn open(loader: L, config: BrowserConfig) -> Result<Self, LoadError> {
        let mut browser = Self {
            loader,
            config,
            save_path: None,
            page_index: 0,
            page: Page::new(0.0, 0.0),
            shapes: ShapeTree::new(),
            index: ShapeIndex::default(),
            selection: SelectionController::default(),
            mirror: TagMirror::default(),
            overlays: OverlayLayer::new(),
        };
        browser.initialize(0)?;
        Ok(browser)
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    /// Load page `page_index` and rebuild every derived structure.
    pub fn initialize(&mut self, page_index: usize) -> Result<(), LoadError> {
        let page = self.loader.load_page(page_index)?;
        self.shapes = page.shapes.wrapped();
        self.index.initialize(&self.shapes);
        self.selection = SelectionController::build(&self.shapes, &self.config);
        self.mirror = TagMirror::bind(
            &self.loader.document().structure,
            &self.shapes,
            self.config.expand_on_select,
        );
        self.overlays.clear();
        self.page = page;
        self.page_index = page_index;
        log::debug!(
            "page {page_index}: {} shapes, {} containers",
            self.shapes.len(),
            self.index.len()
        );
        Ok(())
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn shapes(&self) -> &ShapeTree {
        &self.shapes
    }

    pub fn index(&self) -> &ShapeIndex {
        &self.index
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn mirror(&self) -> &TagMirror {
        &self.mirror
    }

    pub fn overlays(&self) -> &OverlayLayer {
        &self.overlays
    }

    /// The page's own top-level collection, below the synthetic root.
    pub fn page_root(&self) -> Option<NodeIndex> {
        self.shapes.children(self.shapes.root).into_iter().next()
    }

    pub fn label(&self, shape: NodeIndex) -> Option<String> {
        shape_label(&self.shapes, &self.index, shape)
    }

    pub fn shape_outline(&self) -> String {
        self.selection.outline(&self.shapes, &self.index)
    }

    pub fn tag_outline(&self) -> String {
        self.mirror.outline(&self.loader.document().structure)
    }

    // ─── Shape-side selection ────────────────────────────────────────────

    /// Click at `point` in page space. Clicking empty space changes nothing.
    pub fn click(&mut self, point: Point, modifiers: Modifiers) -> Update {
        match find_shape_at(&self.shapes, point) {
            Some(shape) => self.select_shape(shape, modifiers),
            None => {
                log::trace!("click at ({}, {}) hit nothing", point.x, point.y);
                Update::default()
            }
        }
    }

    /// Click at `point` in a `view_width × view_height` view of the page.
    pub fn click_in_view(
        &mut self,
        point: Point,
        view_width: f64,
        view_height: f64,
        modifiers: Modifiers,
    ) -> Update {
        match view_to_page(&self.page, view_width, view_height, point) {
            Some(page_point) => self.click(page_point, modifiers),
            None => Update::default(),
        }
    }

    /// Select a shape row (or a hit-tested shape).
    pub fn select_shape(&mut self, shape: NodeIndex, modifiers: Modifiers) -> Update {
        let effects = self
            .selection
            .select(&self.shapes, &self.index, shape, modifiers);
        self.propagate(Transaction::new(Origin::Shapes), effects)
    }

    pub fn clear_selection(&mut self) -> Update {
        let effects = self.selection.clear();
        self.propagate(Transaction::new(Origin::Shapes), effects)
    }

    // ─── Tag-side selection ──────────────────────────────────────────────

    /// Click on a tag row: the shape selection is replaced with the shapes
    /// of every selected tag.
    pub fn click_tag(&mut self, tag: TagId, modifiers: Modifiers) -> Update {
        let mut tx = Transaction::new(Origin::Tags);
        self.mirror
            .click(&mut tx, &self.loader.document().structure, tag, modifiers);
        let requests = tx.shape_requests().to_vec();
        let effects = self
            .selection
            .select_only(&self.shapes, &self.index, &requests);
        self.propagate(tx, effects)
    }

    /// Forward shape-side effects to the tag mirror and the overlay layer.
    fn propagate(&mut self, mut tx: Transaction, effects: SelectionEffects) -> Update {
        let tags = &self.loader.document().structure;
        let tag_of = |shape: NodeIndex| self.shapes.get(shape).and_then(|n| n.parent_tag);

        for &shape in &effects.deselected {
            if let Some(tag) = tag_of(shape) {
                let still_referenced = self
                    .selection
                    .selected_shapes()
                    .into_iter()
                    .any(|s| tag_of(s) == Some(tag));
                self.mirror.shape_deselected(&mut tx, tag, still_referenced);
            }
        }
        for &shape in &effects.selected {
            if let Some(tag) = tag_of(shape) {
                self.mirror.shape_selected(&mut tx, tags, tag);
            }
        }

        effects.apply_overlays(&mut self.overlays);
        Update {
            selection: effects,
            tags: tx.into_events(),
        }
    }

    /// Properties of the first selected content shape.
    pub fn properties(&self) -> Option<ShapeProperties> {
        self.selection
            .selected_shapes()
            .into_iter()
            .filter_map(|shape| self.shapes.get(shape))
            .find(|node| !node.is_container())
            .map(ShapeProperties::from)
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Delete the selected shapes, persist and reopen the document, and
    /// reload the current page. Returns the number of shapes removed.
    pub fn delete_selected(&mut self) -> Result<usize, LoadError> {
        let pruned = prune_selected(
            &mut self.selection,
            &mut self.shapes,
            self.loader.document(),
            self.page_index,
        );
        pruned.effects.apply_overlays(&mut self.overlays);
        self.loader.rebuild_document(pruned.pages)?;
        self.initialize(self.page_index)?;
        log::debug!("deleted {} shapes", pruned.removed);
        Ok(pruned.removed)
    }

    /// Reopen the document as a single page holding only the selected
    /// shapes.
    pub fn keep_selected(&mut self) -> Result<(), LoadError> {
        let page = keep_selected(&self.selection, &self.shapes, &self.index, &self.page);
        self.loader.rebuild_document(vec![page])?;
        self.initialize(0)
    }

    pub fn save(&self, path: &Path) -> Result<(), LoadError> {
        self.loader.save_document(path)
    }

    /// Run the shortcut bound to a key event, if any. Showing properties is
    /// left to the caller, via [`Browser::properties`].
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Result<Option<ShortcutAction>, LoadError> {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return Ok(None);
        };
        log::debug!("shortcut {key:?} -> {action:?}");
        match action {
            ShortcutAction::DeleteSelected => {
                self.delete_selected()?;
            }
            ShortcutAction::KeepSelected => self.keep_selected()?,
            ShortcutAction::ClearSelection => {
                self.clear_selection();
            }
            ShortcutAction::Save => match &self.save_path {
                Some(path) => self.save(path)?,
                None => log::warn!("save requested without a save path"),
            },
            ShortcutAction::ShowProperties => {}
        }
        Ok(Some(action))
    }
}
