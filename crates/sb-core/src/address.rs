//! Hierarchical shape addresses and the container table.
//!
//! A pre-order walk numbers every container with a monotonically increasing
//! own-index. Containers are addressed `parent:own` (or just `own` for the
//! root); leaves carry the own-index of their container and are told apart
//! only by position among its children.
//!
//! Parent lookups go through the typed [`Address`]. The string form exists
//! for display in the shape tree and round-trips through [`own_index`] and
//! [`parent_index`].

use crate::model::ShapeTree;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use std::fmt;

// ─── Address ─────────────────────────────────────────────────────────────

/// Position of a node in the container table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// A container with its own index and its parent's own index
    /// (`None` for the root).
    Container { parent: Option<usize>, own: usize },
    /// A leaf, identified by the own index of its container.
    Leaf { parent: usize },
}

impl Address {
    pub fn is_container(&self) -> bool {
        matches!(self, Address::Container { .. })
    }

    /// Own index of a container; `None` for leaves.
    pub fn own(&self) -> Option<usize> {
        match self {
            Address::Container { own, .. } => Some(*own),
            Address::Leaf { .. } => None,
        }
    }

    /// Own index of the enclosing container; `None` for the root.
    pub fn parent(&self) -> Option<usize> {
        match self {
            Address::Container { parent, .. } => *parent,
            Address::Leaf { parent } => Some(*parent),
        }
    }

    /// Parse the string form. Whether the text names a container cannot be
    /// told from a bare number, so the caller says which it is.
    ///
    /// # Panics
    /// On non-numeric segments: addresses are only ever produced by
    /// [`ShapeIndex`], so a malformed one is a programming error.
    pub fn parse(text: &str, is_container: bool) -> Self {
        if is_container {
            Address::Container {
                parent: parent_index(text, true),
                own: own_index(text),
            }
        } else {
            Address::Leaf {
                parent: parse_segment(text),
            }
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Container {
                parent: Some(parent),
                own,
            } => write!(f, "{parent}:{own}"),
            Address::Container { parent: None, own } => write!(f, "{own}"),
            Address::Leaf { parent } => write!(f, "{parent}"),
        }
    }
}

fn parse_segment(segment: &str) -> usize {
    match segment.parse::<usize>() {
        Ok(n) => n,
        Err(_) => panic!("malformed shape address segment `{segment}`"),
    }
}

/// Own index of a container address: the text after the last `:`, or the
/// whole string when there is none.
///
/// # Panics
/// If that text is not a number.
pub fn own_index(address: &str) -> usize {
    match address.rsplit_once(':') {
        Some((_, own)) => parse_segment(own),
        None => parse_segment(address),
    }
}

/// Own index of the enclosing container. For a container this is the text
/// before `:` (root containers have none); for a leaf it is the whole text.
///
/// # Panics
/// If the relevant text is not a number.
pub fn parent_index(address: &str, is_container: bool) -> Option<usize> {
    if !is_container {
        return Some(parse_segment(address));
    }
    address
        .split_once(':')
        .map(|(parent, _)| parse_segment(parent))
}

// ─── Container table ─────────────────────────────────────────────────────

/// Flat table from own-index to container, plus the address of every node.
/// Valid for one page load; [`ShapeIndex::initialize`] starts over.
#[derive(Debug, Clone, Default)]
pub struct ShapeIndex {
    containers: Vec<NodeIndex>,
    addresses: HashMap<NodeIndex, Address>,
}

impl ShapeIndex {
    /// Walk `tree` from its root and assign addresses.
    #[must_use]
    pub fn build(tree: &ShapeTree) -> Self {
        let mut index = Self::default();
        index.initialize(tree);
        index
    }

    /// Reset the counter and table, then re-walk `tree`.
    pub fn initialize(&mut self, tree: &ShapeTree) {
        self.containers.clear();
        self.addresses.clear();
        if tree.is_container(tree.root) {
            self.visit(tree, tree.root, None);
        } else {
            log::warn!("shape tree root is not a container; nothing indexed");
        }
        log::debug!(
            "indexed {} containers, {} nodes",
            self.containers.len(),
            self.addresses.len()
        );
    }

    fn visit(&mut self, tree: &ShapeTree, idx: NodeIndex, parent: Option<usize>) {
        if tree.is_container(idx) {
            let own = self.containers.len();
            self.containers.push(idx);
            self.addresses.insert(idx, Address::Container { parent, own });
            for child in tree.children(idx) {
                self.visit(tree, child, Some(own));
            }
        } else if let Some(parent) = parent {
            self.addresses.insert(idx, Address::Leaf { parent });
        }
    }

    /// Number of containers visited.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn address(&self, idx: NodeIndex) -> Option<Address> {
        self.addresses.get(&idx).copied()
    }

    /// Container whose own index is `own`.
    pub fn container(&self, own: usize) -> Option<NodeIndex> {
        self.containers.get(own).copied()
    }

    /// Enclosing container of `idx`. `None` for the root, for nodes the walk
    /// never saw, and for out-of-range parent indices.
    pub fn parent_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.address(idx)
            .and_then(|addr| addr.parent())
            .and_then(|parent| self.container(parent))
    }

    /// Look up a node by its string address and its position among the
    /// children of its container.
    ///
    /// # Panics
    /// If `address` is malformed.
    pub fn resolve(
        &self,
        tree: &ShapeTree,
        address: &str,
        is_container: bool,
        position: usize,
    ) -> Option<NodeIndex> {
        match Address::parse(address, is_container) {
            Address::Container { own, .. } => self.container(own),
            Address::Leaf { parent } => {
                let container = self.container(parent)?;
                tree.children(container)
                    .into_iter()
                    .filter(|&c| !tree.is_container(c))
                    .nth(position)
            }
        }
    }
}
