//! Integration tests: clicks → hit test → selection, marks and overlays.

use kurbo::{Point, Rect};
use pretty_assertions::assert_eq;
use sb_core::{BrowserConfig, Document, Matrix, MemoryLoader, NodeIndex, Page, ShapeKind, ShapeNode};
use sb_editor::{Browser, Modifiers};

fn scenario() -> Browser<MemoryLoader> {
    let loader = MemoryLoader::from_json(include_str!("fixtures/scenario.json")).unwrap();
    Browser::open(loader, BrowserConfig::default()).unwrap()
}

/// Shapes of the scenario page: (page root, nested, image, text, freehand).
fn scenario_shapes(b: &Browser<MemoryLoader>) -> (NodeIndex, NodeIndex, NodeIndex, NodeIndex, NodeIndex) {
    let tree = b.shapes();
    let root = b.page_root().unwrap();
    let kids = tree.children(root);
    let image = tree.children(kids[0])[0];
    (root, kids[0], image, kids[1], kids[2])
}

fn row_of_five() -> (Browser<MemoryLoader>, Vec<NodeIndex>) {
    let mut page = Page::new(200.0, 20.0);
    let root = page.shapes.root;
    for i in 0..5 {
        page.shapes.add_node(
            root,
            ShapeNode::new(ShapeKind::Image {
                width: 10.0,
                height: 10.0,
            })
            .with_transform(Matrix::translate(20.0 * i as f64, 0.0)),
        );
    }
    let loader = MemoryLoader::new(Document {
        pages: vec![page],
        ..Document::default()
    });
    let browser = Browser::open(loader, BrowserConfig::default()).unwrap();
    let leaves = browser.shapes().children(browser.page_root().unwrap());
    (browser, leaves)
}

/// Page root holding a text run, then a collection of two images.
fn text_then_pair() -> (Browser<MemoryLoader>, NodeIndex, NodeIndex, NodeIndex, NodeIndex) {
    let mut page = Page::new(200.0, 50.0);
    let root = page.shapes.root;
    page.shapes.add_node(
        root,
        ShapeNode::new(ShapeKind::Text {
            text: "Caption".into(),
            measured_width: 40.0,
            measured_height: 10.0,
        }),
    );
    let pair = page.shapes.add_node(
        root,
        ShapeNode::new(ShapeKind::Collection).with_transform(Matrix::translate(100.0, 0.0)),
    );
    for i in 0..2 {
        page.shapes.add_node(
            pair,
            ShapeNode::new(ShapeKind::Image {
                width: 10.0,
                height: 10.0,
            })
            .with_transform(Matrix::translate(20.0 * i as f64, 0.0)),
        );
    }
    let loader = MemoryLoader::new(Document {
        pages: vec![page],
        ..Document::default()
    });
    let browser = Browser::open(loader, BrowserConfig::default()).unwrap();
    let kids = browser.shapes().children(browser.page_root().unwrap());
    let images = browser.shapes().children(kids[1]);
    (browser, kids[0], kids[1], images[0], images[1])
}

fn sorted(mut v: Vec<NodeIndex>) -> Vec<NodeIndex> {
    v.sort();
    v
}

// ─── Scenario page ───────────────────────────────────────────────────────

#[test]
fn clicks_hit_expected_leaves() {
    let mut b = scenario();
    let (_, _, image, text, _) = scenario_shapes(&b);

    let update = b.click(Point::new(25.0, 10.0), Modifiers::None);
    assert_eq!(update.selection.selected, vec![text]);

    let update = b.click(Point::new(6.0, 6.0), Modifiers::None);
    assert_eq!(update.selection.selected, vec![image]);
    assert_eq!(update.selection.deselected, vec![text]);
}

#[test]
fn empty_click_changes_nothing() {
    let mut b = scenario();
    b.click(Point::new(25.0, 10.0), Modifiers::None);
    let update = b.click(Point::new(190.0, 90.0), Modifiers::None);
    assert!(update.is_empty());
    assert_eq!(b.selection().selected_shapes().len(), 1);
}

#[test]
fn ctrl_then_ctrl_shift_range_skips_nested_container() {
    let mut b = scenario();
    let (_, nested, image, text, freehand) = scenario_shapes(&b);

    b.click(Point::new(6.0, 6.0), Modifiers::Ctrl);
    b.click(Point::new(25.0, 10.0), Modifiers::Ctrl);
    assert_eq!(b.selection().selected_shapes(), vec![image, text]);

    // Anchor is now the text; range back to the image.
    b.click(Point::new(6.0, 6.0), Modifiers::CtrlShift);
    assert_eq!(sorted(b.selection().selected_shapes()), sorted(vec![image, text]));
    assert!(!b.selection().is_selected(nested));
    assert!(!b.selection().is_selected(freehand));
    // The nested container's only child is marked, so it is marked too.
    assert!(b.selection().is_marked(nested));
}

#[test]
fn overlays_follow_selection() {
    let mut b = scenario();
    let (_, _, image, text, _) = scenario_shapes(&b);

    b.click(Point::new(25.0, 10.0), Modifiers::None);
    assert_eq!(b.overlays().shapes(), vec![text]);
    let (_, overlay) = b.overlays().iter().next().unwrap();
    assert_eq!(overlay.bounds(), Rect::new(0.0, 0.0, 50.0, 20.0));

    b.click(Point::new(6.0, 6.0), Modifiers::Ctrl);
    assert_eq!(b.overlays().len(), 2);
    let image_overlay = b
        .overlays()
        .iter()
        .find(|(_, p)| p.shape == image)
        .map(|(_, p)| p.bounds());
    assert_eq!(image_overlay, Some(Rect::new(5.0, 5.0, 15.0, 15.0)));

    b.clear_selection();
    assert!(b.overlays().is_empty());
}

#[test]
fn view_click_selects_through_page_transform() {
    let mut b = scenario();
    let (_, _, _, text, _) = scenario_shapes(&b);
    let update = b.click_in_view(Point::new(50.0, 180.0), 400.0, 200.0, Modifiers::None);
    assert_eq!(update.selection.selected, vec![text]);
}

#[test]
fn selecting_container_selects_and_marks_subtree() {
    let mut b = scenario();
    let (root, nested, image, text, freehand) = scenario_shapes(&b);
    let update = b.select_shape(root, Modifiers::None);
    assert_eq!(update.selection.selected, vec![root, nested, image, text, freehand]);
    assert_eq!(update.selection.overlays_added.len(), 3);
    assert!(b.selection().is_marked(root));
}

#[test]
fn properties_of_selected_text() {
    let mut b = scenario();
    assert!(b.properties().is_none());
    b.click(Point::new(25.0, 10.0), Modifiers::None);
    let props = b.properties().unwrap();
    assert_eq!(props.kind, "TextShape");
    assert_eq!(props.text.as_deref(), Some("Hello"));
    assert!(props.transform.is_identity());
}

#[test]
fn labels_and_outline() {
    let mut b = scenario();
    let (root, nested, image, text, freehand) = scenario_shapes(&b);
    assert_eq!(b.label(b.shapes().root).as_deref(), Some("Shape Collection 0"));
    assert_eq!(b.label(root).as_deref(), Some("Shape Collection 0:1"));
    assert_eq!(b.label(nested).as_deref(), Some("Shape Collection 1:2"));
    assert_eq!(b.label(image).as_deref(), Some("ImageShape 2"));
    assert_eq!(b.label(text).as_deref(), Some("TextShape 1"));
    assert_eq!(b.label(freehand).as_deref(), Some("FreeHandShape 1"));

    b.click(Point::new(6.0, 6.0), Modifiers::None);
    assert_eq!(
        b.shape_outline(),
        "\
+ Shape Collection 0
  + Shape Collection 0:1
    + Shape Collection 1:2
      * ImageShape 2
    TextShape 1
    FreeHandShape 1
"
    );
}

// ─── Marks ───────────────────────────────────────────────────────────────

#[test]
fn container_marks_once_all_children_selected() {
    let (mut b, leaves) = row_of_five();
    let root = b.page_root().unwrap();

    for &leaf in &leaves[..4] {
        b.select_shape(leaf, Modifiers::Ctrl);
        assert!(!b.selection().is_marked(root));
    }
    let update = b.select_shape(leaves[4], Modifiers::Ctrl);
    assert!(update.selection.marked.contains(&root));
    assert!(b.selection().is_marked(root));

    let update = b.select_shape(leaves[2], Modifiers::Ctrl);
    assert!(update.selection.unmarked.contains(&root));
    assert!(!b.selection().is_marked(root));
}

// ─── Ranges ──────────────────────────────────────────────────────────────

#[test]
fn shift_range_is_inclusive_and_symmetric() {
    let (mut b, leaves) = row_of_five();

    b.select_shape(leaves[1], Modifiers::None);
    b.select_shape(leaves[4], Modifiers::Shift);
    let forward = sorted(b.selection().selected_shapes());
    assert_eq!(forward, leaves[1..5].to_vec());

    b.select_shape(leaves[4], Modifiers::None);
    b.select_shape(leaves[1], Modifiers::Shift);
    let backward = sorted(b.selection().selected_shapes());
    assert_eq!(forward, backward);
}

#[test]
fn shift_replaces_and_ctrl_shift_adds() {
    let (mut b, leaves) = row_of_five();

    b.select_shape(leaves[0], Modifiers::None);
    b.select_shape(leaves[1], Modifiers::Shift);
    // Ctrl moves the anchor without clearing.
    b.select_shape(leaves[3], Modifiers::Ctrl);
    b.select_shape(leaves[4], Modifiers::CtrlShift);
    assert_eq!(
        sorted(b.selection().selected_shapes()),
        vec![leaves[0], leaves[1], leaves[3], leaves[4]]
    );

    b.select_shape(leaves[2], Modifiers::Shift);
    assert_eq!(
        sorted(b.selection().selected_shapes()),
        vec![leaves[2], leaves[3]]
    );
}

#[test]
fn ctrl_shift_range_ends_inside_container() {
    let (mut b, text, pair, first, second) = text_then_pair();

    b.click(Point::new(5.0, 5.0), Modifiers::Ctrl);
    b.click(Point::new(105.0, 5.0), Modifiers::CtrlShift);
    assert_eq!(b.selection().selected_shapes(), vec![text, first]);
    assert!(!b.selection().is_selected(pair));
    assert!(!b.selection().is_selected(second));
    assert!(!b.selection().is_marked(pair));
    assert_eq!(b.overlays().len(), 2);
}

#[test]
fn shift_without_anchor_selects_target() {
    let (mut b, leaves) = row_of_five();
    b.select_shape(leaves[3], Modifiers::Shift);
    assert_eq!(b.selection().selected_shapes(), vec![leaves[3]]);
    assert_eq!(b.selection().anchor(), Some(leaves[3]));
}
