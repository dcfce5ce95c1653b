//! Undo histories for single-page and paginated documents.

use folio_core::api::{History, PageKey};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Stacks {
    undo: Vec<String>,
    redo: Vec<String>,
}

impl Stacks {
    fn record(&mut self, label: &str) {
        self.undo.push(label.to_string());
        self.redo.clear();
    }

    fn undo(&mut self) -> Option<String> {
        let label = self.undo.pop()?;
        self.redo.push(label.clone());
        Some(label)
    }

    fn redo(&mut self) -> Option<String> {
        let label = self.redo.pop()?;
        self.undo.push(label.clone());
        Some(label)
    }
}

/// Plain undo/redo stack of action labels.
#[derive(Debug, Default)]
pub struct UndoStack {
    stacks: Mutex<Stacks>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn stacks(&self) -> MutexGuard<'_, Stacks> {
        self.stacks.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn undo(&self) -> Option<String> {
        self.stacks().undo()
    }

    pub fn redo(&self) -> Option<String> {
        self.stacks().redo()
    }
}

impl History for UndoStack {
    fn can_undo(&self) -> bool {
        !self.stacks().undo.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.stacks().redo.is_empty()
    }

    fn record(&self, label: &str) {
        self.stacks().record(label);
    }
}

#[derive(Debug)]
struct Paged {
    page: PageKey,
    pages: BTreeMap<PageKey, Stacks>,
}

/// One undo/redo stack per page; actions go to the selected page.
#[derive(Debug)]
pub struct PagedHistory {
    inner: Mutex<Paged>,
}

impl Default for PagedHistory {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Paged {
                page: PageKey(1),
                pages: BTreeMap::new(),
            }),
        }
    }
}

impl PagedHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, Paged> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn select_page(&self, page: PageKey) {
        self.inner().page = page;
    }

    pub fn page(&self) -> PageKey {
        self.inner().page
    }

    pub fn undo(&self) -> Option<String> {
        let mut inner = self.inner();
        let page = inner.page;
        inner.pages.get_mut(&page)?.undo()
    }

    pub fn redo(&self) -> Option<String> {
        let mut inner = self.inner();
        let page = inner.page;
        inner.pages.get_mut(&page)?.redo()
    }
}

impl History for PagedHistory {
    fn can_undo(&self) -> bool {
        let inner = self.inner();
        inner
            .pages
            .get(&inner.page)
            .is_some_and(|s| !s.undo.is_empty())
    }

    fn can_redo(&self) -> bool {
        let inner = self.inner();
        inner
            .pages
            .get(&inner.page)
            .is_some_and(|s| !s.redo.is_empty())
    }

    fn record(&self, label: &str) {
        let mut inner = self.inner();
        let page = inner.page;
        inner.pages.entry(page).or_default().record(label);
    }
}
