use anyhow::Result;
use std::sync::Arc;

use folio_core::api::{AppConfig, DocumentManager, Services};

use crate::live::LiveSlot;
use crate::loader::SlotContentLoader;
use crate::model::InMemoryDataModel;
use crate::page::PageManagerFactory;
use crate::parser::PdfPageParser;
use crate::view::TracingViews;

/// Concrete handles behind a [`Services`] bundle, for callers that need to
/// drive the collaborators directly.
#[derive(Clone)]
pub struct ReferenceServices {
    pub model: Arc<InMemoryDataModel>,
    pub live: Arc<LiveSlot>,
    pub loader: Arc<SlotContentLoader>,
    pub views: Arc<TracingViews>,
    pub services: Services,
}

pub fn build_services() -> Result<ReferenceServices> {
    let model = Arc::new(InMemoryDataModel::new());
    let live = Arc::new(LiveSlot::new());
    let loader = Arc::new(SlotContentLoader::new(live.clone()));
    let views = Arc::new(TracingViews::new());
    let parser = Arc::new(PdfPageParser::new()?);

    let services = Services {
        data_model: model.clone(),
        live: live.clone(),
        page_factory: Arc::new(PageManagerFactory),
        parser,
        content_loader: loader.clone(),
        navigation: views.clone(),
        selection: views.clone(),
    };

    Ok(ReferenceServices {
        model,
        live,
        loader,
        views,
        services,
    })
}

pub fn build_manager(cfg: &AppConfig) -> Result<(DocumentManager, ReferenceServices)> {
    let reference = build_services()?;
    let manager =
        DocumentManager::with_import_config(reference.services.clone(), cfg.import.clone());
    Ok((manager, reference))
}
