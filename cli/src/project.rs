//! Project files: the document list, the entities extracted so far, and the
//! association metadata saved with them.

use folio_core::api::{
    AppConfig, CliError, Document, DocumentEvent, DocumentIndex, DocumentManager, EntityKind,
    Metadata,
};
use folio_plugins::factory::{build_manager, ReferenceServices};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFile {
    /// Document paths, relative to the project file.
    pub documents: Vec<PathBuf>,
    #[serde(default)]
    pub axes: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<String>,
    #[serde(default)]
    pub measurements: Vec<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl ProjectFile {
    fn names(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Axes => &self.axes,
            EntityKind::Datasets => &self.datasets,
            EntityKind::Measurements => &self.measurements,
        }
    }
}

/// A loaded project with its manager and the collaborators behind it.
pub struct OpenProject {
    pub manager: DocumentManager,
    pub reference: ReferenceServices,
}

pub async fn read_project(path: &Path) -> Result<ProjectFile, CliError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CliError::Project(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| CliError::Project(format!("invalid project file {}: {e}", path.display())))
}

/// `.pdf` files become paginated documents, everything else single-page.
pub fn is_paginated(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

pub async fn read_documents(project: &ProjectFile, base: &Path) -> Result<Vec<Document>, CliError> {
    let mut documents = Vec::with_capacity(project.documents.len());
    for relative in &project.documents {
        let path = base.join(relative);
        let content = tokio::fs::read(&path)
            .await
            .map_err(|e| CliError::Project(format!("cannot read {}: {e}", path.display())))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| relative.display().to_string());

        let document = if is_paginated(&path) {
            Document::paginated(name, content)
        } else {
            Document::single(name, content)
        };
        documents.push(document);
    }
    Ok(documents)
}

pub async fn open(path: &Path, cfg: &AppConfig) -> Result<OpenProject, CliError> {
    let project = read_project(path).await?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let documents = read_documents(&project, base).await?;

    let (mut manager, reference) = build_manager(cfg)?;
    spawn_event_log(manager.subscribe());

    manager.load(documents);
    for kind in EntityKind::ALL {
        for name in project.names(kind) {
            reference.model.push(kind, name.as_str());
        }
    }

    install_first_page_structure(&mut manager).await?;

    let metadata = project.metadata.unwrap_or_default();
    manager.import_metadata(&metadata).await?;

    Ok(OpenProject { manager, reference })
}

/// The first document is shown right after load; when it is paginated its page
/// structure goes live immediately and the parsed form is kept for import.
async fn install_first_page_structure(manager: &mut DocumentManager) -> Result<(), CliError> {
    let Some(first) = manager.current_document().filter(|d| d.is_paginated()).cloned() else {
        return Ok(());
    };

    let services = manager.services().clone();
    let Some(parsed) = services.parser.parse(&first).await? else {
        return Ok(());
    };

    services
        .live
        .install_page_structure(Some(services.page_factory.build(&parsed)));
    services.live.install_history(None);
    manager.remember_parsed(DocumentIndex::FIRST, parsed);
    manager.refresh_page_info();
    Ok(())
}

fn spawn_event_log(mut event_rx: broadcast::Receiver<DocumentEvent>) {
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            match event {
                DocumentEvent::Loaded { document_count, .. } => {
                    tracing::debug!("Loaded {} document(s)", document_count);
                }
                DocumentEvent::Switched { from, to, .. } => {
                    tracing::debug!("Switched document {} -> {}", from, to);
                }
                DocumentEvent::MetadataImported {
                    rebuilt_page_structures,
                    ..
                } => {
                    tracing::debug!(
                        "Metadata imported ({} page structure(s))",
                        rebuilt_page_structures
                    );
                }
                DocumentEvent::MetadataExported { .. } => {}
            }
        }
    });
}
