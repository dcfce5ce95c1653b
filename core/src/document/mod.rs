//! Per-document state for a multi-document project.
//!
//! The registry orders the documents and tracks the current one; the
//! association index records which document owns which entity; the caches
//! hold page structures and histories of every document that is not live.

pub mod associations;
pub mod cache;
pub mod events;
pub mod manager;
pub mod registry;
pub mod types;

pub use associations::{AssociationIndex, AssociationMap};
pub use cache::{HistoryCache, PageStateCache};
pub use events::DocumentEvent;
pub use manager::DocumentManager;
pub use registry::DocumentRegistry;
pub use types::{
    ContainerKind, Document, DocumentIndex, EntityHandle, EntityId, EntityKind, PageKey,
    ParsedDocument,
};
