use folio_core::api::{ContentLoader, Document, LiveState};
use std::sync::{Arc, Mutex};

/// Tracks the rendered document. Undoable loads are recorded in the live history.
pub struct SlotContentLoader {
    live: Arc<dyn LiveState>,
    rendered: Mutex<Option<String>>,
}

impl SlotContentLoader {
    pub fn new(live: Arc<dyn LiveState>) -> Self {
        Self {
            live,
            rendered: Mutex::new(None),
        }
    }

    /// Name of the document on screen.
    pub fn rendered(&self) -> Option<String> {
        self.rendered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl ContentLoader for SlotContentLoader {
    fn load(&self, document: &Document, undoable: bool) {
        tracing::debug!(
            target: "folio.flow",
            stage = "content.load",
            doc.name = %document.name,
            bytes = document.content.len(),
            undoable
        );
        *self.rendered.lock().unwrap_or_else(|e| e.into_inner()) = Some(document.name.clone());
        if undoable {
            self.live.history().record(&format!("load {}", document.name));
        }
    }
}
