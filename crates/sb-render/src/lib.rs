pub mod hit;
pub mod overlay;

pub use hit::{find_shape_at, find_shape_in_view, shape_contains};
pub use overlay::{
    OverlayGeometry, OverlayId, OverlayLayer, OverlayPrimitive, OverlaySink, build_overlay,
};
