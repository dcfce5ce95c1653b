//! Metadata import: file-level associations first, then page structures.
//!
//! Page reconstruction for several documents runs in two phases. Every
//! missing multi-page representation is fetched concurrently and joined.
//! No page structure is built or fed before the join.

use super::types::{FileSection, Metadata, PageSection};
use crate::document::associations::AssociationMap;
use crate::document::{
    Document, DocumentEvent, DocumentIndex, DocumentManager, EntityHandle, EntityId, EntityKind,
    PageKey, ParsedDocument,
};
use crate::error::{FetchFailure, FetchFailureReason, ImportError};
use crate::services::{MultiPageParser, PageData, PageStructure};
use chrono::Utc;
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// What an import changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// True when a `file` section replaced the associations.
    pub file_section_applied: bool,
    /// Page structures that received page data.
    pub page_structures_loaded: usize,
    /// Documents parsed during the import.
    pub fetched: usize,
}

/// Where a paginated document's page structure comes from during import.
enum PageSource {
    /// Already live; flush it into the cache.
    Live,
    Parsed(ParsedDocument),
    Fetch,
}

type FetchOutcome = (DocumentIndex, Result<Option<ParsedDocument>, FetchFailure>);

impl DocumentManager {
    #[tracing::instrument(
        name = "document.import_metadata",
        skip_all,
        fields(doc.count = self.registry.len(), file = metadata.file.is_some(), page = metadata.page.is_some())
    )]
    pub async fn import_metadata(&mut self, metadata: &Metadata) -> Result<ImportReport, ImportError> {
        let mut report = ImportReport {
            file_section_applied: self.apply_file_section(metadata.file.as_ref()),
            ..Default::default()
        };

        if let Some(page) = metadata.page.as_ref() {
            if self.registry.len() > 1 {
                let (loaded, fetched) = self.rebuild_page_structures(page).await?;
                report.page_structures_loaded = loaded;
                report.fetched = fetched;
            } else {
                report.page_structures_loaded = self.apply_single_page_section(page);
            }
        }

        tracing::info!(
            file_section = report.file_section_applied,
            page_structures = report.page_structures_loaded,
            fetched = report.fetched,
            "metadata imported"
        );
        self.emit(DocumentEvent::MetadataImported {
            rebuilt_page_structures: report.page_structures_loaded,
            timestamp: Utc::now(),
        });
        Ok(report)
    }

    fn apply_file_section(&mut self, file: Option<&FileSection>) -> bool {
        let model = self.services.data_model.clone();
        let count = self.registry.len();

        match file {
            Some(file) if count > 1 => {
                self.associations.replace(
                    EntityKind::Axes,
                    resolve_names(EntityKind::Axes, &model.axes(), &file.axes, count),
                );
                self.associations.replace(
                    EntityKind::Datasets,
                    resolve_names(EntityKind::Datasets, &model.datasets(), &file.datasets, count),
                );
                self.associations.replace(
                    EntityKind::Measurements,
                    resolve_positions(&model.measurements(), &file.measurements, count),
                );
                true
            }
            _ => {
                for kind in EntityKind::ALL {
                    self.associations
                        .assign(kind, DocumentIndex::FIRST, model.entities(kind));
                }
                false
            }
        }
    }

    fn apply_single_page_section(&mut self, page: &PageSection) -> usize {
        self.flush_live_page_structure();
        let Some(structure) = self.pages.get(DocumentIndex::FIRST) else {
            tracing::warn!("page metadata present but the document has no page structure");
            return 0;
        };

        let measurements = self.services.data_model.measurements();
        structure.load_page_data(PageData {
            axes: page.axes.clone(),
            datasets: page.datasets.clone(),
            measurements: positional_pages(&measurements, &page.measurements, |_| true),
        });
        1
    }

    /// Returns (page structures loaded, documents fetched).
    async fn rebuild_page_structures(
        &mut self,
        page: &PageSection,
    ) -> Result<(usize, usize), ImportError> {
        let current = self.registry.current();
        let live_has_pages = self.services.live.page_structure().is_some();
        let parser = self.services.parser.clone();
        let timeout = self.import_cfg.fetch_timeout();

        let mut plan = Vec::new();
        let mut fetches = Vec::new();
        for (index, document) in self.registry.indexed() {
            if !document.is_paginated() {
                continue;
            }
            let source = if index == current && live_has_pages {
                PageSource::Live
            } else if let Some(parsed) = self.registry.parsed(index) {
                PageSource::Parsed(parsed.clone())
            } else if index == current {
                PageSource::Live
            } else {
                fetches.push(fetch_pages(parser.clone(), index, document.clone(), timeout));
                PageSource::Fetch
            };
            plan.push((index, source));
        }

        let fetched_count = fetches.len();
        tracing::debug!(target: "folio.flow", stage = "import.fetch", documents = fetched_count);

        let mut fetched = HashMap::new();
        let mut failures = Vec::new();
        for (index, outcome) in join_all(fetches).await {
            match outcome {
                Ok(parsed) => {
                    fetched.insert(index, parsed);
                }
                Err(failure) => failures.push(failure),
            }
        }
        if !failures.is_empty() {
            for failure in &failures {
                tracing::error!(error.kind = "import.fetch", doc.index = %failure.index, reason = %failure);
            }
            // file-level associations are already applied
            self.services.navigation.refresh();
            return Err(ImportError::PageFetch { failures });
        }

        tracing::debug!(target: "folio.flow", stage = "import.rebuild", documents = plan.len());
        let measurements = self.services.data_model.measurements();
        let mut loaded = 0;
        for (index, source) in plan {
            let representation = match source {
                PageSource::Live => None,
                PageSource::Parsed(parsed) => Some(parsed),
                PageSource::Fetch => fetched.remove(&index).flatten(),
            };

            let Some(structure) = self.page_structure_for_import(index, representation) else {
                tracing::warn!(doc.index = %index, "no page structure available, page metadata skipped");
                continue;
            };

            structure.load_page_data(self.page_data_for(index, page, &measurements));
            loaded += 1;
        }

        self.services.navigation.refresh();
        self.refresh_page_info();
        Ok((loaded, fetched_count))
    }

    fn page_structure_for_import(
        &mut self,
        index: DocumentIndex,
        representation: Option<ParsedDocument>,
    ) -> Option<Arc<dyn PageStructure>> {
        match representation {
            Some(parsed) => {
                let structure = self.services.page_factory.build(&parsed);
                self.pages.insert(index, structure.clone());
                if index == self.registry.current() {
                    self.services
                        .live
                        .install_page_structure(Some(structure.clone()));
                }
                Some(structure)
            }
            None => {
                if index == self.registry.current() {
                    self.flush_live_page_structure();
                }
                self.pages.get(index)
            }
        }
    }

    /// Page metadata restricted to what the file-level association gave `index`.
    fn page_data_for(
        &self,
        index: DocumentIndex,
        page: &PageSection,
        measurements: &[EntityHandle],
    ) -> PageData {
        let names = |kind: EntityKind| -> HashSet<&str> {
            self.associations
                .entities(kind, index)
                .map(|set| set.iter().map(EntityHandle::name).collect())
                .unwrap_or_default()
        };
        let axes = names(EntityKind::Axes);
        let datasets = names(EntityKind::Datasets);

        PageData {
            axes: filter_names(&page.axes, &axes),
            datasets: filter_names(&page.datasets, &datasets),
            measurements: positional_pages(measurements, &page.measurements, |m| {
                self.associations
                    .contains(EntityKind::Measurements, index, m)
            }),
        }
    }
}

async fn fetch_pages(
    parser: Arc<dyn MultiPageParser>,
    index: DocumentIndex,
    document: Document,
    timeout: Option<Duration>,
) -> FetchOutcome {
    let parse = parser.parse(&document);
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, parse).await {
            Ok(result) => result.map_err(|e| FetchFailureReason::Parser(format!("{e:#}"))),
            Err(_) => Err(FetchFailureReason::Timeout),
        },
        None => parse
            .await
            .map_err(|e| FetchFailureReason::Parser(format!("{e:#}"))),
    };

    let outcome = outcome.map_err(|reason| FetchFailure {
        index,
        document: document.name.clone(),
        reason,
    });
    (index, outcome)
}

fn resolve_names(
    kind: EntityKind,
    entities: &[EntityHandle],
    names: &BTreeMap<String, DocumentIndex>,
    document_count: usize,
) -> AssociationMap {
    let mut map = AssociationMap::new();
    for entity in entities {
        let Some(&doc) = names.get(entity.name()) else {
            continue;
        };
        if doc.0 >= document_count {
            tracing::warn!(%kind, name = entity.name(), doc.index = %doc, "association to unknown document skipped");
            continue;
        }
        map.entry(doc).or_default().insert(entity.clone());
    }

    let known: HashSet<&str> = entities.iter().map(EntityHandle::name).collect();
    for name in names.keys().filter(|n| !known.contains(n.as_str())) {
        tracing::warn!(%kind, name = name.as_str(), "metadata names an entity the data model does not have");
    }
    map
}

fn resolve_positions(
    measurements: &[EntityHandle],
    owners: &[Option<DocumentIndex>],
    document_count: usize,
) -> AssociationMap {
    if measurements.len() != owners.len() {
        tracing::warn!(
            measurements = measurements.len(),
            entries = owners.len(),
            "measurement association list does not match the measurement collection"
        );
    }

    let mut map = AssociationMap::new();
    for (measurement, owner) in measurements.iter().zip(owners) {
        match owner {
            Some(doc) if doc.0 < document_count => {
                map.entry(*doc).or_default().insert(measurement.clone());
            }
            Some(doc) => {
                tracing::warn!(doc.index = %doc, "measurement association to unknown document skipped");
            }
            None => {}
        }
    }
    map
}

fn filter_names(
    pages: &BTreeMap<String, PageKey>,
    owned: &HashSet<&str>,
) -> BTreeMap<String, PageKey> {
    pages
        .iter()
        .filter(|(name, _)| owned.contains(name.as_str()))
        .map(|(name, key)| (name.clone(), *key))
        .collect()
}

fn positional_pages<F>(
    measurements: &[EntityHandle],
    pages: &[Option<PageKey>],
    keep: F,
) -> HashMap<EntityId, PageKey>
where
    F: Fn(&EntityHandle) -> bool,
{
    measurements
        .iter()
        .zip(pages)
        .filter_map(|(m, page)| page.filter(|_| keep(m)).map(|page| (m.id(), page)))
        .collect()
}
