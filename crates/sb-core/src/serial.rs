//! Serialized form of a document.
//!
//! The same records back the JSON fixtures, the saved output and the
//! MessagePack bytes used when a pruned document is persisted and reopened.
//! Tags are referenced by key so records survive a rebuild of the tag tree.

use crate::loader::LoadError;
use crate::model::{Document, FreeHandPath, Orientation, Page, ShapeKind, ShapeNode, ShapeTree};
use crate::tags::{Tag, TagId, TagTree};
use crate::transform::Matrix;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reference key of each tag, from [`TagTree::reference_keys`].
pub type TagKeys = HashMap<TagId, String>;

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Root of the logical structure. Absent for untagged documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<TagRecord>,
    #[serde(default)]
    pub pages: Vec<PageFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFile {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub orientation: Orientation,
    /// The page's top-level shape collection.
    #[serde(default)]
    pub root: ShapeRecord,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    Collection,
    Text,
    Image,
    #[serde(rename = "freehand")]
    FreeHand,
    Clip,
}

/// One shape. Fields that do not apply to `kind` are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    #[serde(default)]
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Matrix::is_identity")]
    pub transform: Matrix,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub x: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub y: f64,
    /// Key of the tag this shape belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Intrinsic width of an image, measured width of a text run.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub width: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub height: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<FreeHandPath>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ShapeRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tag_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TagRecord>,
}

// ─── Records → model ─────────────────────────────────────────────────────

impl DocumentFile {
    pub fn into_document(self) -> Result<Document, LoadError> {
        let structure = match &self.structure {
            Some(root) => root.to_tree(),
            None => TagTree::new(),
        };
        let pages = self
            .pages
            .iter()
            .map(|page| page.to_page(&structure))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Document {
            title: self.title,
            pages,
            structure,
        })
    }

    /// Keyless tags are written with generated keys, and shapes refer to
    /// them by those keys.
    pub fn from_document(doc: &Document) -> Self {
        let keys = doc.structure.reference_keys();
        Self {
            title: doc.title.clone(),
            structure: Some(TagRecord::from_tree(&doc.structure, doc.structure.root, &keys)),
            pages: doc
                .pages
                .iter()
                .map(|page| PageFile::from_page(page, &keys))
                .collect(),
        }
    }
}

impl PageFile {
    pub fn to_page(&self, tags: &TagTree) -> Result<Page, LoadError> {
        let mut shapes = ShapeTree::with_root(self.root.to_node(tags)?);
        let root = shapes.root;
        for child in &self.root.children {
            child.add_to(&mut shapes, root, tags)?;
        }
        Ok(Page {
            width: self.width,
            height: self.height,
            orientation: self.orientation,
            shapes,
        })
    }

    pub fn from_page(page: &Page, keys: &TagKeys) -> Self {
        Self {
            width: page.width,
            height: page.height,
            orientation: page.orientation,
            root: ShapeRecord::from_tree(&page.shapes, page.shapes.root, keys),
        }
    }
}

impl ShapeRecord {
    fn to_node(&self, tags: &TagTree) -> Result<ShapeNode, LoadError> {
        let kind = match self.kind {
            RecordKind::Collection => ShapeKind::Collection,
            RecordKind::Text => ShapeKind::Text {
                text: self.text.clone().unwrap_or_default(),
                measured_width: self.width,
                measured_height: self.height,
            },
            RecordKind::Image => ShapeKind::Image {
                width: self.width,
                height: self.height,
            },
            RecordKind::FreeHand => ShapeKind::FreeHand {
                paths: self.paths.clone(),
            },
            RecordKind::Clip => ShapeKind::Clip {
                paths: self.paths.clone(),
            },
        };
        let parent_tag = match &self.tag {
            Some(key) => Some(
                tags.find_by_key(key)
                    .ok_or_else(|| LoadError::UnknownTag(key.clone()))?,
            ),
            None => None,
        };
        Ok(ShapeNode {
            kind,
            transform: self.transform,
            x: self.x,
            y: self.y,
            parent_tag,
        })
    }

    fn add_to(
        &self,
        tree: &mut ShapeTree,
        parent: NodeIndex,
        tags: &TagTree,
    ) -> Result<(), LoadError> {
        let idx = tree.add_node(parent, self.to_node(tags)?);
        for child in &self.children {
            child.add_to(tree, idx, tags)?;
        }
        Ok(())
    }

    pub fn from_tree(tree: &ShapeTree, idx: NodeIndex, keys: &TagKeys) -> Self {
        let Some(node) = tree.get(idx) else {
            return Self::default();
        };
        let mut record = Self {
            transform: node.transform,
            x: node.x,
            y: node.y,
            tag: node.parent_tag.and_then(|id| keys.get(&id).cloned()),
            ..Self::default()
        };
        match &node.kind {
            ShapeKind::Collection => {
                record.kind = RecordKind::Collection;
                record.children = tree
                    .children(idx)
                    .into_iter()
                    .map(|child| Self::from_tree(tree, child, keys))
                    .collect();
            }
            ShapeKind::Text {
                text,
                measured_width,
                measured_height,
            } => {
                record.kind = RecordKind::Text;
                record.text = Some(text.clone());
                record.width = *measured_width;
                record.height = *measured_height;
            }
            ShapeKind::Image { width, height } => {
                record.kind = RecordKind::Image;
                record.width = *width;
                record.height = *height;
            }
            ShapeKind::FreeHand { paths } => {
                record.kind = RecordKind::FreeHand;
                record.paths = paths.clone();
            }
            ShapeKind::Clip { paths } => {
                record.kind = RecordKind::Clip;
                record.paths = paths.clone();
            }
        }
        record
    }
}

impl TagRecord {
    fn to_tag(&self) -> Tag {
        Tag {
            tag_type: self.tag_type.as_deref().map(crate::id::TagType::intern),
            title: self.title.clone(),
            key: self.key.clone(),
        }
    }

    /// Build a tag tree with `self` as its root. Tags without a key get a
    /// generated one so every tag can be referenced after a save.
    pub fn to_tree(&self) -> TagTree {
        let mut tree = TagTree::new();
        let root = tree.root;
        tree.graph[root.0] = self.to_tag();
        for child in &self.children {
            child.add_to(&mut tree, root);
        }
        tree.assign_missing_keys();
        tree
    }

    fn add_to(&self, tree: &mut TagTree, parent: TagId) {
        let id = tree.add_tag(parent, self.to_tag());
        for child in &self.children {
            child.add_to(tree, id);
        }
    }

    pub fn from_tree(tree: &TagTree, id: TagId, keys: &TagKeys) -> Self {
        let Some(tag) = tree.get(id) else {
            return Self::default();
        };
        Self {
            key: keys.get(&id).or(tag.key.as_ref()).cloned(),
            tag_type: tag.tag_type.map(|ty| ty.as_str().to_string()),
            title: tag.title.clone(),
            children: tree
                .children(id)
                .into_iter()
                .map(|child| Self::from_tree(tree, child, keys))
                .collect(),
        }
    }
}
