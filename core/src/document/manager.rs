//! Document manager: registry, associations, caches and the switch protocol.

use super::associations::AssociationIndex;
use super::cache::{HistoryCache, PageStateCache};
use super::events::DocumentEvent;
use super::registry::DocumentRegistry;
use super::types::{Document, DocumentIndex, EntityHandle, EntityKind, ParsedDocument};
use crate::config::ImportConfig;
use crate::context::Services;
use crate::services::{History, PageStructure};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Coordinates per-document state across a loaded document set.
///
/// Exactly one document is live at a time: its page structure and history sit
/// in the injected [`crate::services::LiveState`], every other document's sit
/// in the caches held here.
pub struct DocumentManager {
    pub(crate) services: Services,
    pub(crate) import_cfg: ImportConfig,
    pub(crate) registry: DocumentRegistry,
    pub(crate) associations: AssociationIndex,
    pub(crate) pages: PageStateCache,
    pub(crate) histories: HistoryCache,
    event_tx: broadcast::Sender<DocumentEvent>,
}

impl DocumentManager {
    pub fn new(services: Services) -> Self {
        Self::with_import_config(services, ImportConfig::default())
    }

    pub fn with_import_config(services: Services, import_cfg: ImportConfig) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            services,
            import_cfg,
            registry: DocumentRegistry::new(),
            associations: AssociationIndex::new(),
            pages: PageStateCache::default(),
            histories: HistoryCache::default(),
            event_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DocumentEvent> {
        self.event_tx.subscribe()
    }

    pub(crate) fn emit(&self, event: DocumentEvent) {
        let _ = self.event_tx.send(event);
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Replace the document set. Every association and cache goes with the old set.
    pub fn load(&mut self, documents: Vec<Document>) {
        self.registry.replace(documents);
        self.associations.clear();
        self.pages.clear();
        self.histories.clear();

        let count = self.registry.len();
        tracing::info!(doc.count = count, "document set loaded");

        self.services
            .selection
            .show_documents(self.registry.documents(), self.registry.current());
        self.services.selection.set_document_picker_visible(count > 1);

        self.emit(DocumentEvent::Loaded {
            document_count: count,
            timestamp: Utc::now(),
        });
    }

    pub fn reset(&mut self) {
        self.load(Vec::new());
        self.services.selection.set_page_controls_visible(false);
    }

    pub fn documents(&self) -> &[Document] {
        self.registry.documents()
    }

    pub fn document_count(&self) -> usize {
        self.registry.len()
    }

    pub fn current_index(&self) -> DocumentIndex {
        self.registry.current()
    }

    pub fn current_document(&self) -> Option<&Document> {
        self.registry.get(self.registry.current())
    }

    /// Keep a multi-page representation produced while loading `index`, so
    /// metadata import does not parse it again.
    pub fn remember_parsed(&mut self, index: DocumentIndex, parsed: ParsedDocument) {
        if !self.registry.contains(index) {
            tracing::warn!(doc.index = %index, "parsed representation for unknown document ignored");
            return;
        }
        self.registry.remember_parsed(index, parsed);
    }

    pub fn parsed(&self, index: DocumentIndex) -> Option<&ParsedDocument> {
        self.registry.parsed(index)
    }

    pub fn cached_page_structure(&self, index: DocumentIndex) -> Option<Arc<dyn PageStructure>> {
        self.pages.get(index)
    }

    pub fn cached_history(&self, index: DocumentIndex) -> Option<Arc<dyn History>> {
        self.histories.get(index)
    }

    /// Page structure of `index`: the live one for the current document when it
    /// has not been cached yet, the cached one otherwise.
    pub fn page_structure(&self, index: DocumentIndex) -> Option<Arc<dyn PageStructure>> {
        self.pages.get(index).or_else(|| {
            (index == self.registry.current())
                .then(|| self.services.live.page_structure())
                .flatten()
        })
    }

    /// Move the live slot to `target`.
    ///
    /// Returns false, without touching any state, when `target` is the current
    /// document or lies outside the registry.
    pub fn switch(&mut self, target: DocumentIndex) -> bool {
        let from = self.registry.current();
        if !self.registry.is_switch_target(target) {
            tracing::debug!(
                target: "folio.flow",
                stage = "switch.ignored",
                doc.current = %from,
                doc.target = %target,
                doc.count = self.registry.len()
            );
            return false;
        }

        self.flush_live_page_structure();

        self.services
            .live
            .install_page_structure(self.pages.get(target));

        self.persist_live_history(from);

        self.services.live.install_history(self.histories.get(target));

        if let Some(document) = self.registry.get(target) {
            self.services.content_loader.load(document, true);
        }

        self.registry.set_current(target);

        self.services.navigation.refresh();
        self.services
            .selection
            .show_documents(self.registry.documents(), target);
        self.refresh_page_info();

        tracing::debug!(target: "folio.flow", stage = "switch.done", doc.from = %from, doc.to = %target);
        self.emit(DocumentEvent::Switched {
            from,
            to: target,
            timestamp: Utc::now(),
        });
        true
    }

    /// Page controls are shown only while a page structure is live.
    pub fn refresh_page_info(&self) {
        let paginated = self.services.live.page_structure().is_some();
        self.services.selection.set_page_controls_visible(paginated);
    }

    /// Cache the live page structure for the current document unless one is
    /// already cached.
    pub(crate) fn flush_live_page_structure(&mut self) -> bool {
        let Some(page) = self.services.live.page_structure() else {
            return false;
        };
        self.pages.save_if_absent(self.registry.current(), page)
    }

    fn persist_live_history(&mut self, doc: DocumentIndex) {
        if self.pages.contains(doc) {
            self.histories
                .store(doc, self.services.live.paginated_history());
            return;
        }

        let history = self.services.live.history();
        if history.is_empty() {
            self.histories.discard(doc);
        } else {
            self.histories.store(doc, history);
        }
    }

    pub fn add_entities<I>(&mut self, kind: EntityKind, entities: I)
    where
        I: IntoIterator<Item = EntityHandle>,
    {
        self.associations
            .add(kind, self.registry.current(), entities);
    }

    pub fn remove_entities(&mut self, kind: EntityKind, entities: &[EntityHandle]) {
        self.associations
            .remove(kind, self.registry.current(), entities);
    }

    pub fn filter_to_current(
        &self,
        kind: EntityKind,
        candidates: &[EntityHandle],
    ) -> Vec<EntityHandle> {
        self.associations
            .filter(kind, self.registry.current(), candidates)
    }

    pub fn inverse_name_map(&self, kind: EntityKind) -> BTreeMap<String, DocumentIndex> {
        self.associations.inverse_name_map(kind)
    }

    /// Entities of `kind` owned by `index`, in association order.
    pub fn entities_of(&self, kind: EntityKind, index: DocumentIndex) -> Vec<EntityHandle> {
        self.associations
            .entities(kind, index)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LiveState;
    use crate::test_support::{handle, Harness};

    #[test]
    fn switch_to_current_is_a_noop() {
        let harness = Harness::new();
        let mut manager = harness.manager();
        manager.load(harness.documents(3));
        harness.reset_counters();

        assert!(!manager.switch(DocumentIndex(0)));
        assert_eq!(harness.refreshes(), 0);
        assert_eq!(harness.loads(), 0);
        assert_eq!(manager.current_index(), DocumentIndex(0));
    }

    #[test]
    fn out_of_range_switch_is_ignored() {
        let harness = Harness::new();
        let mut manager = harness.manager();
        manager.load(harness.documents(2));
        harness.live.set_page(Some(harness.page()));
        harness.reset_counters();

        assert!(!manager.switch(DocumentIndex(2)));
        assert!(!manager.switch(DocumentIndex(usize::MAX)));

        assert_eq!(manager.current_index(), DocumentIndex(0));
        assert!(manager.cached_page_structure(DocumentIndex(0)).is_none());
        assert!(manager.cached_history(DocumentIndex(0)).is_none());
        assert_eq!(harness.refreshes(), 0);
    }

    #[test]
    fn switch_runs_protocol_and_notifies() {
        let harness = Harness::new();
        let mut manager = harness.manager();
        manager.load(harness.documents(2));
        harness.reset_counters();

        assert!(manager.switch(DocumentIndex(1)));

        assert_eq!(manager.current_index(), DocumentIndex(1));
        assert_eq!(harness.loads(), 1);
        assert_eq!(harness.last_loaded().as_deref(), Some("doc-1"));
        assert_eq!(harness.refreshes(), 1);
        assert_eq!(harness.selected(), Some(DocumentIndex(1)));
        assert_eq!(harness.page_controls(), Some(false));
    }

    #[test]
    fn empty_history_is_not_cached() {
        let harness = Harness::new();
        let mut manager = harness.manager();
        manager.load(harness.documents(2));

        manager.switch(DocumentIndex(1));

        assert!(manager.cached_history(DocumentIndex(0)).is_none());
    }

    #[test]
    fn emptied_history_drops_stale_entry() {
        let harness = Harness::new();
        let mut manager = harness.manager();
        manager.load(harness.documents(2));

        harness.live.history().record("calibrate");
        manager.switch(DocumentIndex(1));
        assert!(manager.cached_history(DocumentIndex(0)).is_some());

        manager.switch(DocumentIndex(0));
        harness.live.clear_history();
        manager.switch(DocumentIndex(1));

        assert!(manager.cached_history(DocumentIndex(0)).is_none());
    }

    #[test]
    fn round_trip_preserves_history_identity() {
        let harness = Harness::new();
        let mut manager = harness.manager();
        manager.load(harness.documents(2));

        let history = harness.live.history();
        history.record("add axes");

        manager.switch(DocumentIndex(1));
        assert!(!Arc::ptr_eq(&harness.live.history(), &history));
        manager.switch(DocumentIndex(0));

        assert!(Arc::ptr_eq(&harness.live.history(), &history));
    }

    #[test]
    fn round_trip_preserves_page_structure_identity() {
        let harness = Harness::new();
        let mut manager = harness.manager();
        manager.load(harness.documents(2));
        let page = harness.page();
        harness.live.set_page(Some(page.clone()));

        manager.switch(DocumentIndex(1));
        assert!(harness.live.page_structure().is_none());
        assert_eq!(harness.page_controls(), Some(false));

        manager.switch(DocumentIndex(0));
        let live = harness.live.page_structure().expect("page structure restored");
        assert!(Arc::ptr_eq(&live, &page));
        assert_eq!(harness.page_controls(), Some(true));
        // paginated documents keep their history even when it is empty
        assert!(manager.cached_history(DocumentIndex(0)).is_some());
    }

    #[test]
    fn first_cached_page_structure_wins() {
        let harness = Harness::new();
        let mut manager = harness.manager();
        manager.load(harness.documents(2));
        let original = harness.page();
        harness.live.set_page(Some(original.clone()));
        manager.switch(DocumentIndex(1));
        manager.switch(DocumentIndex(0));

        harness.live.set_page(Some(harness.page()));
        manager.switch(DocumentIndex(1));

        let cached = manager.cached_page_structure(DocumentIndex(0)).unwrap();
        assert!(Arc::ptr_eq(&cached, &original));
    }

    #[test]
    fn associations_follow_current_document() {
        let harness = Harness::new();
        let mut manager = harness.manager();
        manager.load(harness.documents(3));

        let (a1, a2, d1) = (handle(1, "A1"), handle(2, "A2"), handle(3, "D1"));
        manager.add_entities(EntityKind::Axes, [a1.clone(), a2.clone()]);
        manager.switch(DocumentIndex(1));
        manager.add_entities(EntityKind::Datasets, [d1.clone()]);

        assert_eq!(
            manager.filter_to_current(EntityKind::Axes, &[a1.clone(), a2.clone()]),
            Vec::<EntityHandle>::new()
        );
        assert_eq!(
            manager.filter_to_current(EntityKind::Datasets, &[d1.clone()]),
            vec![d1.clone()]
        );

        manager.remove_entities(EntityKind::Datasets, &[d1.clone()]);
        assert!(manager
            .filter_to_current(EntityKind::Datasets, &[d1])
            .is_empty());
    }

    #[test]
    fn load_discards_everything() {
        let harness = Harness::new();
        let mut manager = harness.manager();
        manager.load(harness.documents(2));
        manager.add_entities(EntityKind::Axes, [handle(1, "A1")]);
        harness.live.history().record("edit");
        manager.switch(DocumentIndex(1));

        manager.load(harness.documents(2));

        assert_eq!(manager.current_index(), DocumentIndex(0));
        assert!(manager.inverse_name_map(EntityKind::Axes).is_empty());
        assert!(manager.cached_history(DocumentIndex(0)).is_none());
        assert_eq!(harness.picker_visible(), Some(true));
    }

    #[test]
    fn reset_hides_controls() {
        let harness = Harness::new();
        let mut manager = harness.manager();
        manager.load(harness.documents(2));

        manager.reset();

        assert_eq!(manager.document_count(), 0);
        assert_eq!(harness.picker_visible(), Some(false));
        assert_eq!(harness.page_controls(), Some(false));
    }

    #[tokio::test]
    async fn switch_publishes_event() {
        let harness = Harness::new();
        let mut manager = harness.manager();
        manager.load(harness.documents(2));
        let mut rx = manager.subscribe();

        manager.switch(DocumentIndex(1));

        match rx.recv().await {
            Ok(DocumentEvent::Switched { from, to, .. }) => {
                assert_eq!(from, DocumentIndex(0));
                assert_eq!(to, DocumentIndex(1));
            }
            other => panic!("Expected Switched event, got {other:?}"),
        }
    }
}
