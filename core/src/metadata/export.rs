use super::types::{FileSection, Metadata, PageSection};
use crate::document::cache::PageStateCache;
use crate::document::{DocumentEvent, DocumentManager, EntityHandle, EntityKind};
use chrono::Utc;
use std::collections::BTreeMap;

impl DocumentManager {
    /// Snapshot the association graph and cached page structures.
    ///
    /// The live page structure is flushed into the cache first so that the
    /// current document's pages are part of the snapshot.
    pub fn export_metadata(&mut self) -> Metadata {
        self.flush_live_page_structure();

        let measurements = self.services.data_model.measurements();
        let mut metadata = Metadata::default();

        if self.registry.len() > 1 {
            metadata.file = Some(FileSection {
                axes: self.associations.inverse_name_map(EntityKind::Axes),
                datasets: self.associations.inverse_name_map(EntityKind::Datasets),
                measurements: measurements
                    .iter()
                    .map(|m| self.associations.owner(EntityKind::Measurements, m))
                    .collect(),
            });
        }

        if !self.pages.is_empty() {
            metadata.page = Some(page_section(&self.pages, &measurements));
        }

        tracing::debug!(
            target: "folio.flow",
            stage = "metadata.export",
            file = metadata.file.is_some(),
            page = metadata.page.is_some(),
            measurements = measurements.len()
        );
        self.emit(DocumentEvent::MetadataExported {
            has_file_section: metadata.file.is_some(),
            has_page_section: metadata.page.is_some(),
            timestamp: Utc::now(),
        });
        metadata
    }
}

/// Merge the name maps of every cached page structure, earlier documents
/// first; a measurement gets the page of the first structure that knows it.
fn page_section(pages: &PageStateCache, measurements: &[EntityHandle]) -> PageSection {
    let mut axes = BTreeMap::new();
    let mut datasets = BTreeMap::new();
    let mut measurement_maps = Vec::with_capacity(pages.len());

    for (_, page) in pages.iter() {
        for (name, key) in page.axes_name_map() {
            axes.entry(name).or_insert(key);
        }
        for (name, key) in page.dataset_name_map() {
            datasets.entry(name).or_insert(key);
        }
        measurement_maps.push(page.measurement_page_map());
    }

    let measurements = measurements
        .iter()
        .map(|m| {
            measurement_maps
                .iter()
                .find_map(|map| map.get(&m.id()).copied())
        })
        .collect();

    PageSection {
        axes,
        datasets,
        measurements,
    }
}
