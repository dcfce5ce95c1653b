use super::types::{DocumentIndex, EntityHandle, EntityKind};
use indexmap::IndexSet;
use std::collections::{BTreeMap, HashMap};

/// DocumentIndex → ordered set of entities, for one entity kind.
pub type AssociationMap = HashMap<DocumentIndex, IndexSet<EntityHandle>>;

/// Forward maps from document to owned entities, one per entity kind.
#[derive(Debug, Default, Clone)]
pub struct AssociationIndex {
    axes: AssociationMap,
    datasets: AssociationMap,
    measurements: AssociationMap,
}

impl AssociationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.axes.clear();
        self.datasets.clear();
        self.measurements.clear();
    }

    pub fn map(&self, kind: EntityKind) -> &AssociationMap {
        match kind {
            EntityKind::Axes => &self.axes,
            EntityKind::Datasets => &self.datasets,
            EntityKind::Measurements => &self.measurements,
        }
    }

    fn map_mut(&mut self, kind: EntityKind) -> &mut AssociationMap {
        match kind {
            EntityKind::Axes => &mut self.axes,
            EntityKind::Datasets => &mut self.datasets,
            EntityKind::Measurements => &mut self.measurements,
        }
    }

    pub fn add<I>(&mut self, kind: EntityKind, doc: DocumentIndex, entities: I)
    where
        I: IntoIterator<Item = EntityHandle>,
    {
        self.map_mut(kind).entry(doc).or_default().extend(entities);
    }

    pub fn remove<'a, I>(&mut self, kind: EntityKind, doc: DocumentIndex, entities: I)
    where
        I: IntoIterator<Item = &'a EntityHandle>,
    {
        if let Some(set) = self.map_mut(kind).get_mut(&doc) {
            for entity in entities {
                set.shift_remove(entity);
            }
        }
    }

    /// Replace everything known for `kind` with `map`.
    pub fn replace(&mut self, kind: EntityKind, map: AssociationMap) {
        *self.map_mut(kind) = map;
    }

    /// Make `entities` the whole set owned by `doc`, leaving other documents alone.
    pub fn assign<I>(&mut self, kind: EntityKind, doc: DocumentIndex, entities: I)
    where
        I: IntoIterator<Item = EntityHandle>,
    {
        self.map_mut(kind).insert(doc, entities.into_iter().collect());
    }

    pub fn entities(&self, kind: EntityKind, doc: DocumentIndex) -> Option<&IndexSet<EntityHandle>> {
        self.map(kind).get(&doc)
    }

    pub fn contains(&self, kind: EntityKind, doc: DocumentIndex, entity: &EntityHandle) -> bool {
        self.entities(kind, doc)
            .map(|set| set.contains(entity))
            .unwrap_or(false)
    }

    /// The candidates owned by `doc`, in candidate order.
    pub fn filter(
        &self,
        kind: EntityKind,
        doc: DocumentIndex,
        candidates: &[EntityHandle],
    ) -> Vec<EntityHandle> {
        let Some(set) = self.entities(kind, doc) else {
            return Vec::new();
        };
        candidates
            .iter()
            .filter(|c| set.contains(*c))
            .cloned()
            .collect()
    }

    /// Owning document of `entity`, if any.
    pub fn owner(&self, kind: EntityKind, entity: &EntityHandle) -> Option<DocumentIndex> {
        self.map(kind)
            .iter()
            .find(|(_, set)| set.contains(entity))
            .map(|(doc, _)| *doc)
    }

    /// Display name → owning document. Later documents overwrite earlier ones
    /// when names collide; names are expected to be unique per kind.
    pub fn inverse_name_map(&self, kind: EntityKind) -> BTreeMap<String, DocumentIndex> {
        let mut docs: Vec<_> = self.map(kind).iter().collect();
        docs.sort_by_key(|(doc, _)| **doc);

        let mut out = BTreeMap::new();
        for (doc, set) in docs {
            for entity in set {
                out.insert(entity.name().to_string(), *doc);
            }
        }
        out
    }
}
