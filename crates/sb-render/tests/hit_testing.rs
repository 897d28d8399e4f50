//! Integration tests: JSON page → hit test in page and view space.

use kurbo::Point;
use sb_core::{MemoryLoader, Orientation, Page, PageLoader, page_to_view};
use sb_render::{find_shape_at, find_shape_in_view};

fn page(fixture: &str, index: usize) -> Page {
    MemoryLoader::from_json(fixture)
        .expect("fixture parses")
        .load_page(index)
        .expect("page exists")
}

#[test]
fn scenario_clicks() {
    let page = page(include_str!("fixtures/scenario.json"), 0);
    let tree = &page.shapes;
    let kids = tree.children(tree.root);
    let nested = kids[0];
    let image = tree.children(nested)[0];
    let text = kids[1];
    let freehand = kids[2];

    assert_eq!(find_shape_at(tree, Point::new(25.0, 10.0)), Some(text));
    assert_eq!(find_shape_at(tree, Point::new(6.0, 6.0)), Some(image));
    // Edges are inclusive.
    assert_eq!(find_shape_at(tree, Point::new(15.0, 15.0)), Some(image));
    assert_eq!(find_shape_at(tree, Point::new(50.0, 20.0)), Some(text));
    assert_eq!(find_shape_at(tree, Point::new(120.0, 10.0)), Some(freehand));
    assert_eq!(find_shape_at(tree, Point::new(190.0, 90.0)), None);
}

#[test]
fn untagged_child_promotes_to_tagged_group() {
    let page = page(include_str!("fixtures/tagged.json"), 0);
    let tree = &page.shapes;
    let kids = tree.children(tree.root);
    let group = kids[0];
    let intro = kids[1];

    // Image inside the tagged "fig" group, offset (10, 10).
    assert_eq!(find_shape_at(tree, Point::new(15.0, 15.0)), Some(group));
    // Tagged text is returned as-is.
    assert_eq!(find_shape_at(tree, Point::new(5.0, 105.0)), Some(intro));
}

#[test]
fn view_clicks_map_through_page_transform() {
    let page = page(include_str!("fixtures/scenario.json"), 0);
    let text = page.shapes.children(page.shapes.root)[1];

    // View is twice the page size; page y is flipped.
    let view = page_to_view(&page, 400.0, 200.0);
    let click = view.transform_point(Point::new(25.0, 10.0));
    assert_eq!(click, Point::new(50.0, 180.0));
    assert_eq!(find_shape_in_view(&page, 400.0, 200.0, click), Some(text));
}

#[test]
fn rotated_page_view_roundtrip() {
    let page = page(include_str!("fixtures/tagged.json"), 1);
    assert_eq!(page.orientation, Orientation::Rotate90);
    let text = page.shapes.children(page.shapes.root)[0];

    let view = page_to_view(&page, 200.0, 300.0);
    let click = view.transform_point(Point::new(50.0, 5.0));
    assert_eq!(find_shape_in_view(&page, 200.0, 300.0, click), Some(text));
}
