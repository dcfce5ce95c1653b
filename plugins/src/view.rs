use folio_core::api::{Document, DocumentIndex, NavigationView, SelectionView};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Headless navigation and selection views.
///
/// They log what a UI would show and remember the last state for callers
/// that want to print it.
#[derive(Default)]
pub struct TracingViews {
    refreshes: AtomicUsize,
    picker_visible: AtomicBool,
    page_controls_visible: AtomicBool,
    selected: Mutex<Option<(DocumentIndex, String)>>,
}

impl TracingViews {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub fn picker_visible(&self) -> bool {
        self.picker_visible.load(Ordering::Relaxed)
    }

    pub fn page_controls_visible(&self) -> bool {
        self.page_controls_visible.load(Ordering::Relaxed)
    }

    /// Selected document and its name.
    pub fn selected(&self) -> Option<(DocumentIndex, String)> {
        self.selected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl NavigationView for TracingViews {
    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(target: "folio.flow", stage = "view.refresh");
    }
}

impl SelectionView for TracingViews {
    fn show_documents(&self, documents: &[Document], current: DocumentIndex) {
        let selected = documents
            .get(current.0)
            .map(|doc| (current, doc.name.clone()));
        tracing::debug!(
            target: "folio.flow",
            stage = "view.select",
            doc.count = documents.len(),
            doc.current = %current
        );
        *self.selected.lock().unwrap_or_else(|e| e.into_inner()) = selected;
    }

    fn set_document_picker_visible(&self, visible: bool) {
        self.picker_visible.store(visible, Ordering::Relaxed);
    }

    fn set_page_controls_visible(&self, visible: bool) {
        self.page_controls_visible.store(visible, Ordering::Relaxed);
    }
}
