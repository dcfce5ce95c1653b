//! In-memory collaborators for unit tests.

use crate::config::ImportConfig;
use crate::context::Services;
use crate::document::{
    Document, DocumentIndex, DocumentManager, EntityHandle, EntityId, EntityKind, PageKey,
    ParsedDocument,
};
use crate::services::{
    ContentLoader, DataModel, History, LiveState, MultiPageParser, NavigationView, PageData,
    PageStructure, PageStructureFactory, SelectionView,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn handle(id: u64, name: &str) -> EntityHandle {
    EntityHandle::new(EntityId(id), name)
}

#[derive(Default)]
pub struct FakeHistory {
    actions: Mutex<Vec<String>>,
}

impl History for FakeHistory {
    fn can_undo(&self) -> bool {
        !self.actions.lock().unwrap().is_empty()
    }

    fn can_redo(&self) -> bool {
        false
    }

    fn record(&self, label: &str) {
        self.actions.lock().unwrap().push(label.to_string());
    }
}

#[derive(Default)]
pub struct FakePage {
    axes: BTreeMap<String, PageKey>,
    datasets: BTreeMap<String, PageKey>,
    measurements: HashMap<EntityId, PageKey>,
    loaded: Mutex<Vec<PageData>>,
}

impl FakePage {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_maps(
        axes: &[(&str, u32)],
        datasets: &[(&str, u32)],
        measurements: &[(EntityId, u32)],
    ) -> Arc<Self> {
        let names = |pairs: &[(&str, u32)]| {
            pairs
                .iter()
                .map(|(name, page)| (name.to_string(), PageKey(*page)))
                .collect()
        };
        Arc::new(Self {
            axes: names(axes),
            datasets: names(datasets),
            measurements: measurements
                .iter()
                .map(|(id, page)| (*id, PageKey(*page)))
                .collect(),
            loaded: Mutex::default(),
        })
    }

    pub fn loaded(&self) -> Vec<PageData> {
        self.loaded.lock().unwrap().clone()
    }
}

impl PageStructure for FakePage {
    fn axes_name_map(&self) -> BTreeMap<String, PageKey> {
        self.axes.clone()
    }

    fn dataset_name_map(&self) -> BTreeMap<String, PageKey> {
        self.datasets.clone()
    }

    fn measurement_page_map(&self) -> HashMap<EntityId, PageKey> {
        self.measurements.clone()
    }

    fn load_page_data(&self, data: PageData) {
        self.loaded.lock().unwrap().push(data);
    }
}

#[derive(Default)]
pub struct FakePageFactory {
    built: Mutex<Vec<Arc<FakePage>>>,
}

impl FakePageFactory {
    pub fn built(&self) -> Vec<Arc<FakePage>> {
        self.built.lock().unwrap().clone()
    }
}

impl PageStructureFactory for FakePageFactory {
    fn build(&self, _parsed: &ParsedDocument) -> Arc<dyn PageStructure> {
        let page = FakePage::empty();
        self.built.lock().unwrap().push(page.clone());
        page
    }
}

pub struct FakeLive {
    page: Mutex<Option<Arc<dyn PageStructure>>>,
    history: Mutex<Arc<dyn History>>,
}

impl Default for FakeLive {
    fn default() -> Self {
        Self {
            page: Mutex::new(None),
            history: Mutex::new(Arc::new(FakeHistory::default())),
        }
    }
}

impl FakeLive {
    pub fn set_page(&self, page: Option<Arc<dyn PageStructure>>) {
        *self.page.lock().unwrap() = page;
    }

    pub fn clear_history(&self) {
        self.install_history(None);
    }
}

impl LiveState for FakeLive {
    fn page_structure(&self) -> Option<Arc<dyn PageStructure>> {
        self.page.lock().unwrap().clone()
    }

    fn install_page_structure(&self, page: Option<Arc<dyn PageStructure>>) {
        self.set_page(page);
    }

    fn history(&self) -> Arc<dyn History> {
        self.history.lock().unwrap().clone()
    }

    fn paginated_history(&self) -> Arc<dyn History> {
        self.history()
    }

    fn install_history(&self, history: Option<Arc<dyn History>>) {
        *self.history.lock().unwrap() =
            history.unwrap_or_else(|| Arc::new(FakeHistory::default()));
    }
}

#[derive(Default)]
pub struct FakeModel {
    next_id: AtomicU64,
    entities: Mutex<HashMap<EntityKind, Vec<EntityHandle>>>,
}

impl FakeModel {
    pub fn push(&self, kind: EntityKind, name: &str) -> EntityHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let entity = EntityHandle::new(EntityId(id), name);
        self.entities
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(entity.clone());
        entity
    }

    fn of(&self, kind: EntityKind) -> Vec<EntityHandle> {
        self.entities
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }
}

impl DataModel for FakeModel {
    fn axes(&self) -> Vec<EntityHandle> {
        self.of(EntityKind::Axes)
    }

    fn datasets(&self) -> Vec<EntityHandle> {
        self.of(EntityKind::Datasets)
    }

    fn measurements(&self) -> Vec<EntityHandle> {
        self.of(EntityKind::Measurements)
    }
}

#[derive(Debug, Clone)]
pub enum ParseScript {
    Pages(u32),
    Nothing,
    Fail(String),
    Hang,
}

#[derive(Default)]
pub struct FakeParser {
    scripts: Mutex<HashMap<String, ParseScript>>,
    calls: Mutex<Vec<String>>,
}

impl FakeParser {
    pub fn script(&self, document: &str, script: ParseScript) {
        self.scripts
            .lock()
            .unwrap()
            .insert(document.to_string(), script);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MultiPageParser for FakeParser {
    async fn parse(&self, document: &Document) -> anyhow::Result<Option<ParsedDocument>> {
        self.calls.lock().unwrap().push(document.name.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(&document.name)
            .cloned()
            .unwrap_or(ParseScript::Pages(3));

        match script {
            ParseScript::Pages(count) => Ok(Some(ParsedDocument::new(
                count,
                document.content.clone(),
            ))),
            ParseScript::Nothing => Ok(None),
            ParseScript::Fail(msg) => Err(anyhow::anyhow!(msg)),
            ParseScript::Hang => std::future::pending().await,
        }
    }
}

#[derive(Default)]
pub struct Recorder {
    refreshes: AtomicUsize,
    loads: AtomicUsize,
    last_loaded: Mutex<Option<String>>,
    selected: Mutex<Option<DocumentIndex>>,
    page_controls: Mutex<Option<bool>>,
    picker_visible: Mutex<Option<bool>>,
}

impl ContentLoader for Recorder {
    fn load(&self, document: &Document, _undoable: bool) {
        self.loads.fetch_add(1, Ordering::SeqCst);
        *self.last_loaded.lock().unwrap() = Some(document.name.clone());
    }
}

impl NavigationView for Recorder {
    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

impl SelectionView for Recorder {
    fn show_documents(&self, _documents: &[Document], current: DocumentIndex) {
        *self.selected.lock().unwrap() = Some(current);
    }

    fn set_document_picker_visible(&self, visible: bool) {
        *self.picker_visible.lock().unwrap() = Some(visible);
    }

    fn set_page_controls_visible(&self, visible: bool) {
        *self.page_controls.lock().unwrap() = Some(visible);
    }
}

/// Fake collaborators wired into a [`Services`] bundle.
#[derive(Default)]
pub struct Harness {
    pub live: Arc<FakeLive>,
    pub model: Arc<FakeModel>,
    pub parser: Arc<FakeParser>,
    pub factory: Arc<FakePageFactory>,
    pub recorder: Arc<Recorder>,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn services(&self) -> Services {
        Services {
            data_model: self.model.clone(),
            live: self.live.clone(),
            page_factory: self.factory.clone(),
            parser: self.parser.clone(),
            content_loader: self.recorder.clone(),
            navigation: self.recorder.clone(),
            selection: self.recorder.clone(),
        }
    }

    pub fn manager(&self) -> DocumentManager {
        DocumentManager::new(self.services())
    }

    pub fn manager_with(&self, import_cfg: ImportConfig) -> DocumentManager {
        DocumentManager::with_import_config(self.services(), import_cfg)
    }

    /// `count` single-page documents named `doc-0`, `doc-1`, ...
    pub fn documents(&self, count: usize) -> Vec<Document> {
        (0..count)
            .map(|i| Document::single(format!("doc-{i}"), format!("image {i}").into_bytes()))
            .collect()
    }

    pub fn paginated_documents(&self, count: usize) -> Vec<Document> {
        (0..count)
            .map(|i| Document::paginated(format!("doc-{i}"), format!("%PDF {i}").into_bytes()))
            .collect()
    }

    pub fn page(&self) -> Arc<dyn PageStructure> {
        FakePage::empty()
    }

    pub fn reset_counters(&self) {
        self.recorder.refreshes.store(0, Ordering::SeqCst);
        self.recorder.loads.store(0, Ordering::SeqCst);
    }

    pub fn refreshes(&self) -> usize {
        self.recorder.refreshes.load(Ordering::SeqCst)
    }

    pub fn loads(&self) -> usize {
        self.recorder.loads.load(Ordering::SeqCst)
    }

    pub fn last_loaded(&self) -> Option<String> {
        self.recorder.last_loaded.lock().unwrap().clone()
    }

    pub fn selected(&self) -> Option<DocumentIndex> {
        *self.recorder.selected.lock().unwrap()
    }

    pub fn page_controls(&self) -> Option<bool> {
        *self.recorder.page_controls.lock().unwrap()
    }

    pub fn picker_visible(&self) -> Option<bool> {
        *self.recorder.picker_visible.lock().unwrap()
    }
}
