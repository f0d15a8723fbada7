use crate::{
    aggregator::EntityState,
    reading::{KeyedReading, Reading},
    settings::EngineSettings,
    snapshot::Snapshot,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// All entities seen during one session, keyed by label.
///
/// Entities are created lazily on first sighting and only go away on
/// [`EntityRegistry::reset`]. Keys are kept sorted so snapshots come out in a
/// stable display order.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: BTreeMap<String, EntityState>,
    settings: EngineSettings,
}

impl EntityRegistry {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            entities: BTreeMap::new(),
            settings,
        }
    }

    /// Route one reading to its entity, creating the entity if unseen.
    pub fn ingest(&mut self, key: &str, reading: Reading) {
        self.entry(key).ingest(reading);
    }

    /// Apply a batch in arrival order. Returns the number of readings applied.
    pub fn apply(&mut self, batch: &[KeyedReading]) -> usize {
        for item in batch {
            self.ingest(&item.key, item.reading);
        }
        batch.len()
    }

    fn entry(&mut self, key: &str) -> &mut EntityState {
        let settings = &self.settings;
        self.entities.entry(key.to_string()).or_insert_with(|| {
            let capacity = settings.capacity_for(key);
            debug!(key, capacity, "tracking new entity");
            EntityState::new(settings.window, settings.outlier_sigmas, capacity)
        })
    }

    pub fn get(&self, key: &str) -> Option<&EntityState> {
        self.entities.get(key)
    }

    pub fn snapshot(&self, key: &str) -> Option<Snapshot> {
        self.entities.get(key).map(EntityState::snapshot)
    }

    /// Snapshots of every known entity, sorted by key.
    pub fn snapshots(&self) -> Vec<(String, Snapshot)> {
        self.entities
            .iter()
            .map(|(key, state)| (key.clone(), state.snapshot()))
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Discard every entity.
    pub fn reset(&mut self) {
        if !self.entities.is_empty() {
            info!(entities = self.entities.len(), "registry reset");
        }
        self.entities.clear();
    }

    /// Replace the settings used for entities created from now on.
    /// Existing entities keep the parameters they were created with.
    pub fn update_settings(&mut self, settings: EngineSettings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}
