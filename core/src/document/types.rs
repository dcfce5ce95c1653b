use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Position of a document in the registry. Stable for the lifetime of a loaded document set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentIndex(pub usize);

impl DocumentIndex {
    pub const FIRST: DocumentIndex = DocumentIndex(0);
}

impl fmt::Display for DocumentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Page number inside a paginated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageKey(pub u32);

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a document's content is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// One image-like page
    Single,
    /// Multi-page container that gets its own page structure
    Paginated,
}

/// A loaded document. Immutable once registered.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub content: Bytes,
    pub kind: ContainerKind,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>, kind: ContainerKind) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            kind,
        }
    }

    pub fn single(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self::new(name, content, ContainerKind::Single)
    }

    pub fn paginated(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self::new(name, content, ContainerKind::Paginated)
    }

    pub fn is_paginated(&self) -> bool {
        self.kind == ContainerKind::Paginated
    }
}

/// The three kinds of extracted entities tracked per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Axes,
    Datasets,
    Measurements,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Axes,
        EntityKind::Datasets,
        EntityKind::Measurements,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Axes => "axes",
            EntityKind::Datasets => "datasets",
            EntityKind::Measurements => "measurements",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an entity inside the active data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

/// Reference to an axes set, dataset or measurement owned by the data model.
///
/// Two handles are equal when their ids are equal; the display name rides along
/// so the metadata codec can build name-keyed maps without calling back into
/// the data model.
#[derive(Debug, Clone)]
pub struct EntityHandle {
    id: EntityId,
    name: Arc<str>,
}

impl EntityHandle {
    pub fn new(id: EntityId, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for EntityHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityHandle {}

impl Hash for EntityHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Multi-page representation produced by a parser, consumed by a page structure factory.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub page_count: u32,
    pub source: Bytes,
}

impl ParsedDocument {
    pub fn new(page_count: u32, source: impl Into<Bytes>) -> Self {
        Self {
            page_count,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn handles_compare_by_id() {
        let a = EntityHandle::new(EntityId(1), "XY");
        let renamed = EntityHandle::new(EntityId(1), "XY (renamed)");
        let other = EntityHandle::new(EntityId(2), "XY");

        assert_eq!(a, renamed);
        assert_ne!(a, other);

        let set: HashSet<_> = [a, renamed, other].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn indices_serialize_as_bare_integers() {
        assert_eq!(serde_json::to_string(&DocumentIndex(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&PageKey(2)).unwrap(), "2");
        let idx: DocumentIndex = serde_json::from_str("7").unwrap();
        assert_eq!(idx, DocumentIndex(7));
    }
}
