use folio_core::api::{DataModel, EntityHandle, EntityId, EntityKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Entity collections held in memory, in insertion order.
#[derive(Default)]
pub struct InMemoryDataModel {
    next_id: AtomicU64,
    axes: RwLock<Vec<EntityHandle>>,
    datasets: RwLock<Vec<EntityHandle>>,
    measurements: RwLock<Vec<EntityHandle>>,
}

impl InMemoryDataModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, kind: EntityKind) -> &RwLock<Vec<EntityHandle>> {
        match kind {
            EntityKind::Axes => &self.axes,
            EntityKind::Datasets => &self.datasets,
            EntityKind::Measurements => &self.measurements,
        }
    }

    /// Append a new entity and return its handle. Ids are never reused.
    pub fn push(&self, kind: EntityKind, name: impl Into<String>) -> EntityHandle {
        let id = EntityId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let handle = EntityHandle::new(id, name.into());
        let mut entities = self
            .collection(kind)
            .write()
            .unwrap_or_else(|e| e.into_inner());
        entities.push(handle.clone());
        handle
    }

    fn snapshot(&self, kind: EntityKind) -> Vec<EntityHandle> {
        self.collection(kind)
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl DataModel for InMemoryDataModel {
    fn axes(&self) -> Vec<EntityHandle> {
        self.snapshot(EntityKind::Axes)
    }

    fn datasets(&self) -> Vec<EntityHandle> {
        self.snapshot(EntityKind::Datasets)
    }

    fn measurements(&self) -> Vec<EntityHandle> {
        self.snapshot(EntityKind::Measurements)
    }
}
