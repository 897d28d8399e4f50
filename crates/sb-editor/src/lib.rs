pub mod mirror;
pub mod mutation;
pub mod selection;
pub mod session;
pub mod shortcuts;

pub use mirror::{Origin, TagEvent, TagItem, TagMirror, Transaction};
pub use mutation::{Pruned, keep_selected, prune_selected, rebuild_page};
pub use selection::{SelectionController, SelectionEffects, SelectionNode, shape_label};
pub use session::{Browser, Update};
pub use shortcuts::{Modifiers, ShortcutAction, ShortcutMap};
