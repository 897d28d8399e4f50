//! Document loader boundary: page access, persist-and-reopen after a
//! mutation, and saving.

use crate::model::{Document, Page};
use crate::serial::DocumentFile;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("page {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    #[error("shape refers to unknown tag `{0}`")]
    UnknownTag(String),

    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to persist document: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to reopen document: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// What the browser needs from whoever owns the document.
pub trait PageLoader {
    fn document(&self) -> &Document;

    /// A fresh copy of page `index`.
    fn load_page(&self, index: usize) -> Result<Page, LoadError>;

    /// Replace the document's pages, persist and reopen it. Tag structure
    /// carries over; shape addresses do not.
    fn rebuild_document(&mut self, pages: Vec<Page>) -> Result<&Document, LoadError>;

    fn save_document(&self, path: &Path) -> Result<(), LoadError>;

    fn page_count(&self) -> usize {
        self.document().pages.len()
    }
}

/// Loader backed by an in-memory document. The "temporary file" of a
/// rebuild is a MessagePack buffer kept alongside.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    document: Document,
    temp: Vec<u8>,
}

impl MemoryLoader {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            temp: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let file: DocumentFile = serde_json::from_str(json)?;
        Ok(Self::new(file.into_document()?))
    }

    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path)?;
        log::debug!("opening {}", path.display());
        Self::from_json(&json)
    }

    /// Bytes written by the last rebuild.
    pub fn temp_bytes(&self) -> &[u8] {
        &self.temp
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(&DocumentFile::from_document(
            &self.document,
        ))?)
    }
}

impl PageLoader for MemoryLoader {
    fn document(&self) -> &Document {
        &self.document
    }

    fn load_page(&self, index: usize) -> Result<Page, LoadError> {
        self.document
            .pages
            .get(index)
            .cloned()
            .ok_or(LoadError::PageOutOfRange {
                index,
                count: self.document.pages.len(),
            })
    }

    fn rebuild_document(&mut self, pages: Vec<Page>) -> Result<&Document, LoadError> {
        let pruned = Document {
            title: self.document.title.clone(),
            pages,
            structure: self.document.structure.clone(),
        };
        self.temp = rmp_serde::to_vec_named(&DocumentFile::from_document(&pruned))?;
        let reopened: DocumentFile = rmp_serde::from_slice(&self.temp)?;
        self.document = reopened.into_document()?;
        log::debug!(
            "rebuilt document: {} pages, {} bytes",
            self.document.pages.len(),
            self.temp.len()
        );
        Ok(&self.document)
    }

    fn save_document(&self, path: &Path) -> Result<(), LoadError> {
        std::fs::write(path, self.to_json()?)?;
        log::debug!("saved {}", path.display());
        Ok(())
    }
}
