use crate::history::{PagedHistory, UndoStack};
use folio_core::api::{History, LiveState, PageStructure};
use std::sync::{Arc, RwLock};

/// The live page structure and history.
///
/// One history slot serves both variants: whatever was installed last is what
/// `history()` and `paginated_history()` hand out. A fresh history is paged
/// when a page structure is live at the time it is created.
pub struct LiveSlot {
    page: RwLock<Option<Arc<dyn PageStructure>>>,
    history: RwLock<Arc<dyn History>>,
}

impl Default for LiveSlot {
    fn default() -> Self {
        Self {
            page: RwLock::new(None),
            history: RwLock::new(Arc::new(UndoStack::new())),
        }
    }
}

impl LiveSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_history(&self) -> Arc<dyn History> {
        if self.page_structure().is_some() {
            Arc::new(PagedHistory::new())
        } else {
            Arc::new(UndoStack::new())
        }
    }
}

impl LiveState for LiveSlot {
    fn page_structure(&self) -> Option<Arc<dyn PageStructure>> {
        self.page.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn install_page_structure(&self, page: Option<Arc<dyn PageStructure>>) {
        *self.page.write().unwrap_or_else(|e| e.into_inner()) = page;
    }

    fn history(&self) -> Arc<dyn History> {
        self.history.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn paginated_history(&self) -> Arc<dyn History> {
        self.history()
    }

    fn install_history(&self, history: Option<Arc<dyn History>>) {
        let history = history.unwrap_or_else(|| self.fresh_history());
        *self.history.write().unwrap_or_else(|e| e.into_inner()) = history;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageManager;

    #[test]
    fn installing_nothing_gives_fresh_history() {
        let slot = LiveSlot::new();
        let first = slot.history();
        first.record("edit");

        slot.install_history(None);

        assert!(!Arc::ptr_eq(&slot.history(), &first));
        assert!(slot.history().is_empty());
    }

    #[test]
    fn installed_history_is_handed_back() {
        let slot = LiveSlot::new();
        let history: Arc<dyn History> = Arc::new(UndoStack::new());

        slot.install_page_structure(Some(Arc::new(PageManager::new(2))));
        slot.install_history(Some(history.clone()));

        assert!(Arc::ptr_eq(&slot.paginated_history(), &history));
        assert!(slot.page_structure().is_some());
    }
}
