//! Garden store
//!
//! Canonical, deduplicated plant list. Plants are inserted once (by user
//! confirmation) and never mutated afterwards; there is no delete path.

use log::{debug, warn};

use super::Plant;
use crate::storage::{SnapshotStore, GARDEN_SNAPSHOT};

/// The canonical plant list, persisted on every change.
pub struct GardenStore {
    plants: Vec<Plant>,
    store: SnapshotStore,
}

impl GardenStore {
    /// Load the persisted collection.
    pub fn load(store: SnapshotStore) -> Self {
        let plants = store.load(GARDEN_SNAPSHOT);
        Self { plants, store }
    }

    /// Insert a plant unless one with the same name (case-insensitive)
    /// already exists. The duplicate case is a silent no-op; returns whether
    /// the plant was inserted.
    pub fn add_plant(&mut self, plant: Plant) -> bool {
        if self.contains_name(&plant.name) {
            debug!("Skipping duplicate plant '{}'", plant.name);
            return false;
        }

        self.plants.push(plant);
        if let Err(e) = self.store.save(GARDEN_SNAPSHOT, &self.plants) {
            warn!("Failed to save garden snapshot: {e:#}");
        }
        true
    }

    /// Case-insensitive membership test by species name.
    pub fn contains_name(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.plants.iter().any(|p| p.name.to_lowercase() == wanted)
    }

    /// Best-effort lookup for a weak plant reference.
    pub fn get(&self, id: &str) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == id)
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::PlantRecord;

    fn plant(name: &str) -> Plant {
        Plant::from_record(
            PlantRecord {
                name: name.to_string(),
                life_span: "Perennial".to_string(),
                seasonal_info: "Spring".to_string(),
                useful_info: "Decorative".to_string(),
                environment: "Partial shade".to_string(),
                watering_frequency: "Weekly".to_string(),
                image_prompt: None,
            },
            String::new(),
        )
    }

    fn empty_store() -> (tempfile::TempDir, GardenStore) {
        let dir = tempfile::tempdir().unwrap();
        let garden = GardenStore::load(SnapshotStore::new(dir.path()));
        (dir, garden)
    }

    #[test]
    fn test_add_plant_inserts() {
        let (_dir, mut garden) = empty_store();
        assert!(garden.add_plant(plant("Tulsi")));
        assert_eq!(garden.len(), 1);
    }

    #[test]
    fn test_duplicate_name_is_silent_noop() {
        let (_dir, mut garden) = empty_store();
        assert!(garden.add_plant(plant("Aloe Vera")));
        assert!(!garden.add_plant(plant("aloe vera")));
        assert!(!garden.add_plant(plant("ALOE VERA")));
        assert_eq!(garden.len(), 1);
    }

    #[test]
    fn test_get_by_id() {
        let (_dir, mut garden) = empty_store();
        let rose = plant("Rose");
        let id = rose.id.clone();
        garden.add_plant(rose);

        assert_eq!(garden.get(&id).map(|p| p.name.as_str()), Some("Rose"));
        assert!(garden.get("dangling-id").is_none());
    }

    #[test]
    fn test_persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut garden = GardenStore::load(SnapshotStore::new(dir.path()));
            garden.add_plant(plant("Marigold"));
        }

        let reloaded = GardenStore::load(SnapshotStore::new(dir.path()));
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains_name("marigold"));
    }
}
