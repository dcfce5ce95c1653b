use crate::services::{
    ContentLoader, DataModel, LiveState, MultiPageParser, NavigationView, PageStructureFactory,
    SelectionView,
};
use std::sync::Arc;

/// Collaborators injected into the document manager at construction time.
#[derive(Clone)]
pub struct Services {
    pub data_model: Arc<dyn DataModel>,
    pub live: Arc<dyn LiveState>,
    pub page_factory: Arc<dyn PageStructureFactory>,
    pub parser: Arc<dyn MultiPageParser>,
    pub content_loader: Arc<dyn ContentLoader>,
    pub navigation: Arc<dyn NavigationView>,
    pub selection: Arc<dyn SelectionView>,
}
