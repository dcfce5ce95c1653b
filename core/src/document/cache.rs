//! Per-document page structure and history caches.

use super::types::DocumentIndex;
use crate::services::{History, PageStructure};
use std::collections::BTreeMap;
use std::sync::Arc;

/// At most one page structure per document, kept until the registry is replaced.
#[derive(Default)]
pub struct PageStateCache {
    entries: BTreeMap<DocumentIndex, Arc<dyn PageStructure>>,
}

impl PageStateCache {
    pub fn get(&self, doc: DocumentIndex) -> Option<Arc<dyn PageStructure>> {
        self.entries.get(&doc).cloned()
    }

    pub fn contains(&self, doc: DocumentIndex) -> bool {
        self.entries.contains_key(&doc)
    }

    /// First write wins. Returns true when `page` was stored.
    pub fn save_if_absent(&mut self, doc: DocumentIndex, page: Arc<dyn PageStructure>) -> bool {
        if self.entries.contains_key(&doc) {
            return false;
        }
        self.entries.insert(doc, page);
        true
    }

    /// Unconditional store, used when import rebuilds a document's pages.
    pub fn insert(&mut self, doc: DocumentIndex, page: Arc<dyn PageStructure>) {
        self.entries.insert(doc, page);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Cached page structures in document order.
    pub fn iter(&self) -> impl Iterator<Item = (DocumentIndex, &Arc<dyn PageStructure>)> {
        self.entries.iter().map(|(doc, page)| (*doc, page))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// At most one history per document, only while it has something to undo or redo.
#[derive(Default)]
pub struct HistoryCache {
    entries: BTreeMap<DocumentIndex, Arc<dyn History>>,
}

impl HistoryCache {
    pub fn get(&self, doc: DocumentIndex) -> Option<Arc<dyn History>> {
        self.entries.get(&doc).cloned()
    }

    pub fn store(&mut self, doc: DocumentIndex, history: Arc<dyn History>) {
        self.entries.insert(doc, history);
    }

    pub fn discard(&mut self, doc: DocumentIndex) -> Option<Arc<dyn History>> {
        self.entries.remove(&doc)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
