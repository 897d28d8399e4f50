pub mod address;
pub mod config;
pub mod geometry;
pub mod id;
pub mod loader;
pub mod model;
pub mod serial;
pub mod tags;
pub mod transform;

pub use address::{Address, ShapeIndex, own_index, parent_index};
pub use config::{BrowserConfig, OverlayStyle};
pub use id::TagType;
pub use loader::{LoadError, MemoryLoader, PageLoader};
pub use model::*;
pub use serial::{DocumentFile, TagKeys};
pub use tags::{Tag, TagId, TagPath, TagTree};
pub use transform::{Matrix, absolute_of, compose, page_to_view, parent_transform_of, view_to_page};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
