//! Page structure of a paginated document.

use folio_core::api::{EntityId, PageData, PageKey, PageStructure, PageStructureFactory, ParsedDocument};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct PageState {
    axes: BTreeMap<String, PageKey>,
    datasets: BTreeMap<String, PageKey>,
    measurements: HashMap<EntityId, PageKey>,
}

/// Tracks the page count and which page every entity was extracted from.
/// Pages are numbered from 1.
#[derive(Debug)]
pub struct PageManager {
    page_count: u32,
    state: Mutex<PageState>,
}

impl PageManager {
    pub fn new(page_count: u32) -> Self {
        Self {
            page_count,
            state: Mutex::new(PageState {
                axes: BTreeMap::new(),
                datasets: BTreeMap::new(),
                measurements: HashMap::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn contains(&self, page: PageKey) -> bool {
        (1..=self.page_count).contains(&page.0)
    }

    pub fn assign_axes(&self, name: impl Into<String>, page: PageKey) {
        self.state().axes.insert(name.into(), page);
    }
}

impl PageStructure for PageManager {
    fn axes_name_map(&self) -> BTreeMap<String, PageKey> {
        self.state().axes.clone()
    }

    fn dataset_name_map(&self) -> BTreeMap<String, PageKey> {
        self.state().datasets.clone()
    }

    fn measurement_page_map(&self) -> HashMap<EntityId, PageKey> {
        self.state().measurements.clone()
    }

    /// Merge imported placements. Entries pointing past the last page are dropped.
    fn load_page_data(&self, data: PageData) {
        let in_range = |page: &PageKey| {
            let ok = self.contains(*page);
            if !ok {
                tracing::warn!(page = %page, page_count = self.page_count, "page placement out of range skipped");
            }
            ok
        };

        let mut state = self.state();
        state
            .axes
            .extend(data.axes.into_iter().filter(|(_, p)| in_range(p)));
        state
            .datasets
            .extend(data.datasets.into_iter().filter(|(_, p)| in_range(p)));
        state
            .measurements
            .extend(data.measurements.into_iter().filter(|(_, p)| in_range(p)));
    }
}

#[derive(Debug, Default)]
pub struct PageManagerFactory;

impl PageStructureFactory for PageManagerFactory {
    fn build(&self, parsed: &ParsedDocument) -> Arc<dyn PageStructure> {
        Arc::new(PageManager::new(parsed.page_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn contains_only_numbered_pages() {
        let pages = PageManager::new(3);
        assert!(pages.contains(PageKey(1)));
        assert!(pages.contains(PageKey(3)));
        assert!(!pages.contains(PageKey(0)));
        assert!(!pages.contains(PageKey(4)));
    }

    #[test]
    fn load_page_data_merges_and_drops_out_of_range() {
        let pages = PageManager::new(2);
        pages.assign_axes("XY", PageKey(1));

        pages.load_page_data(PageData {
            axes: [("Polar".to_string(), PageKey(2)), ("Far".to_string(), PageKey(7))].into(),
            datasets: [("D1".to_string(), PageKey(1))].into(),
            measurements: [(EntityId(4), PageKey(2))].into(),
        });

        assert_eq!(
            pages.axes_name_map(),
            BTreeMap::from([("Polar".to_string(), PageKey(2)), ("XY".to_string(), PageKey(1))])
        );
        assert_eq!(pages.dataset_name_map().get("D1"), Some(&PageKey(1)));
        assert_eq!(pages.measurement_page_map().get(&EntityId(4)), Some(&PageKey(2)));
    }

    #[test]
    fn factory_uses_parsed_page_count() {
        let built = PageManagerFactory.build(&ParsedDocument::new(5, &b"%PDF-1.7"[..]));
        assert!(built.axes_name_map().is_empty());
    }
}
