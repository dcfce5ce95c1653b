use super::types::{Document, DocumentIndex, ParsedDocument};
use std::collections::HashMap;

/// Ordered list of documents plus the index of the active one.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: Vec<Document>,
    current: DocumentIndex,
    /// Multi-page representations produced while loading, keyed by document.
    parsed: HashMap<DocumentIndex, ParsedDocument>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole registry. The current index goes back to the first document.
    pub fn replace(&mut self, documents: Vec<Document>) {
        self.documents = documents;
        self.current = DocumentIndex::FIRST;
        self.parsed.clear();
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn current(&self) -> DocumentIndex {
        self.current
    }

    pub fn get(&self, index: DocumentIndex) -> Option<&Document> {
        self.documents.get(index.0)
    }

    pub fn contains(&self, index: DocumentIndex) -> bool {
        index.0 < self.documents.len()
    }

    /// True when `target` names another document that exists.
    pub fn is_switch_target(&self, target: DocumentIndex) -> bool {
        target != self.current && self.contains(target)
    }

    pub(crate) fn set_current(&mut self, index: DocumentIndex) {
        debug_assert!(self.contains(index));
        self.current = index;
    }

    pub fn remember_parsed(&mut self, index: DocumentIndex, parsed: ParsedDocument) {
        self.parsed.insert(index, parsed);
    }

    pub fn parsed(&self, index: DocumentIndex) -> Option<&ParsedDocument> {
        self.parsed.get(&index)
    }

    pub fn indexed(&self) -> impl Iterator<Item = (DocumentIndex, &Document)> {
        self.documents
            .iter()
            .enumerate()
            .map(|(i, doc)| (DocumentIndex(i), doc))
    }
}
