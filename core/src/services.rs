//! Collaborator contracts consumed by the document manager.
//!
//! Everything here is implemented outside this crate: the data model, page
//! structures, undo history, rendering and parsing. The manager only sees
//! these traits, injected through [`crate::context::Services`].

use crate::document::{
    Document, DocumentIndex, EntityHandle, EntityId, EntityKind, PageKey, ParsedDocument,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Read-only view of the entities extracted so far.
pub trait DataModel: Send + Sync {
    fn axes(&self) -> Vec<EntityHandle>;
    fn datasets(&self) -> Vec<EntityHandle>;
    fn measurements(&self) -> Vec<EntityHandle>;

    fn entities(&self, kind: EntityKind) -> Vec<EntityHandle> {
        match kind {
            EntityKind::Axes => self.axes(),
            EntityKind::Datasets => self.datasets(),
            EntityKind::Measurements => self.measurements(),
        }
    }
}

/// Page assignments fed into a page structure on import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageData {
    pub axes: BTreeMap<String, PageKey>,
    pub datasets: BTreeMap<String, PageKey>,
    pub measurements: HashMap<EntityId, PageKey>,
}

/// Per-document page sub-state of a paginated document.
pub trait PageStructure: Send + Sync {
    fn axes_name_map(&self) -> BTreeMap<String, PageKey>;
    fn dataset_name_map(&self) -> BTreeMap<String, PageKey>;
    fn measurement_page_map(&self) -> HashMap<EntityId, PageKey>;
    fn load_page_data(&self, data: PageData);
}

pub trait PageStructureFactory: Send + Sync {
    fn build(&self, parsed: &ParsedDocument) -> Arc<dyn PageStructure>;
}

/// Undo/redo stack. Opaque apart from the retention queries.
pub trait History: Send + Sync {
    fn can_undo(&self) -> bool;
    fn can_redo(&self) -> bool;
    /// Push an undoable action.
    fn record(&self, label: &str);

    fn is_empty(&self) -> bool {
        !self.can_undo() && !self.can_redo()
    }
}

/// The live slot: page structure and history of whichever document is current.
pub trait LiveState: Send + Sync {
    fn page_structure(&self) -> Option<Arc<dyn PageStructure>>;
    fn install_page_structure(&self, page: Option<Arc<dyn PageStructure>>);
    fn history(&self) -> Arc<dyn History>;
    /// History variant used while a page structure is live.
    fn paginated_history(&self) -> Arc<dyn History>;
    /// Installing `None` leaves the slot with a fresh, empty history.
    fn install_history(&self, history: Option<Arc<dyn History>>);
}

/// Replaces the rendered content. Fire-and-forget from the manager's side.
pub trait ContentLoader: Send + Sync {
    fn load(&self, document: &Document, undoable: bool);
}

#[async_trait]
pub trait MultiPageParser: Send + Sync {
    /// `Ok(None)` means the bytes carry no multi-page representation.
    async fn parse(&self, document: &Document) -> anyhow::Result<Option<ParsedDocument>>;
}

pub trait NavigationView: Send + Sync {
    fn refresh(&self);
}

pub trait SelectionView: Send + Sync {
    fn show_documents(&self, documents: &[Document], current: DocumentIndex);
    fn set_document_picker_visible(&self, visible: bool);
    fn set_page_controls_visible(&self, visible: bool);
}
