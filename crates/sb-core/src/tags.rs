//! Logical structure tree (tags) of a document.
//!
//! Independent of the shape tree: shapes point at tags through
//! [`ShapeNode::parent_tag`](crate::model::ShapeNode::parent_tag), never the
//! other way round.

use crate::id::TagType;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Handle to a tag in a [`TagTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub NodeIndex);

/// Root-to-tag chain. Structure trees are shallow; eight levels covers
/// nearly every real document without spilling.
pub type TagPath = SmallVec<[TagId; 8]>;

/// A structure element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    /// Structure type (`P`, `Figure`, ...). `None` for the synthetic root.
    pub tag_type: Option<TagType>,
    pub title: Option<String>,
    /// Stable name used by serialized documents to reference this tag.
    pub key: Option<String>,
}

impl Tag {
    pub fn new(tag_type: &str) -> Self {
        Self {
            tag_type: Some(TagType::intern(tag_type)),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Display label: `<Type> - title`, `<Type>`, or `Tags` for the root.
    pub fn label(&self) -> String {
        match (self.tag_type, self.title.as_deref()) {
            (Some(ty), Some(title)) if !title.is_empty() => format!("<{ty}> - {title}"),
            (Some(ty), _) => format!("<{ty}>"),
            (None, _) => "Tags".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TagTree {
    pub graph: StableDiGraph<Tag, ()>,
    pub root: TagId,
}

impl TagTree {
    /// A structure tree holding only the synthetic root.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = TagId(graph.add_node(Tag::default()));
        Self { graph, root }
    }

    pub fn add_tag(&mut self, parent: TagId, tag: Tag) -> TagId {
        let id = TagId(self.graph.add_node(tag));
        self.graph.add_edge(parent.0, id.0, ());
        id
    }

    pub fn get(&self, id: TagId) -> Option<&Tag> {
        self.graph.node_weight(id.0)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    pub fn parent(&self, id: TagId) -> Option<TagId> {
        self.graph
            .neighbors_directed(id.0, petgraph::Direction::Incoming)
            .next()
            .map(TagId)
    }

    pub fn children(&self, id: TagId) -> Vec<TagId> {
        let mut children: Vec<TagId> = self
            .graph
            .neighbors_directed(id.0, petgraph::Direction::Outgoing)
            .map(TagId)
            .collect();
        children.sort();
        children
    }

    /// Chain from the root down to `id`, both ends included.
    /// Empty when `id` is not in this tree.
    pub fn path_to(&self, id: TagId) -> TagPath {
        let mut path = TagPath::new();
        if self.get(id).is_none() {
            return path;
        }
        let mut current = Some(id);
        while let Some(tag) = current {
            path.push(tag);
            current = self.parent(tag);
        }
        path.reverse();
        path
    }

    pub fn find_by_key(&self, key: &str) -> Option<TagId> {
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx].key.as_deref() == Some(key))
            .map(TagId)
    }

    /// Key of every tag: its own when set, otherwise a generated `t{n}`
    /// that no other tag in the tree uses.
    pub fn reference_keys(&self) -> HashMap<TagId, String> {
        let taken: HashSet<&str> = self
            .graph
            .node_weights()
            .filter_map(|tag| tag.key.as_deref())
            .collect();
        let mut keys = HashMap::with_capacity(self.len());
        let mut next = 0usize;
        for id in self.pre_order() {
            let key = match &self.graph[id.0].key {
                Some(key) => key.clone(),
                None => loop {
                    let candidate = format!("t{next}");
                    next += 1;
                    if !taken.contains(candidate.as_str()) {
                        break candidate;
                    }
                },
            };
            keys.insert(id, key);
        }
        keys
    }

    /// Give every keyless tag its generated reference key.
    pub fn assign_missing_keys(&mut self) {
        for (id, key) in self.reference_keys() {
            if let Some(tag) = self.graph.node_weight_mut(id.0) {
                tag.key.get_or_insert(key);
            }
        }
    }

    /// Every tag in pre-order, root first.
    pub fn pre_order(&self) -> Vec<TagId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }
}

impl Default for TagTree {
    fn default() -> Self {
        Self::new()
    }
}
