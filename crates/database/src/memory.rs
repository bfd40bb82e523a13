use crate::repository::{JournalRepository, PlantRepository};
use crate::DbError;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{
    JournalEntry, NewJournalEntry, NewPlant, Plant, PlantSummary, ENTRY_TYPE_FERTILIZING,
    ENTRY_TYPE_WATERING,
};
use std::sync::{Arc, Mutex, MutexGuard};

/// An in-process repository with the same observable behaviour as
/// `DbRepository`: soft-deleted plants, hard-deleted entries, scoped lookups
/// and derived care dates.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    plants: Vec<Plant>,
    entries: Vec<JournalEntry>,
    last_plant_id: i32,
    last_entry_id: i32,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panic in another test thread must not cascade into this one.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MemoryState {
    fn live_plants(&self) -> Vec<Plant> {
        let mut plants: Vec<Plant> =
            self.plants.iter().filter(|p| p.deleted_at.is_none()).cloned().collect();
        plants.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        plants
    }

    fn live_plant_mut(&mut self, id: i32) -> Option<&mut Plant> {
        self.plants.iter_mut().find(|p| p.id == id && p.deleted_at.is_none())
    }

    fn last_entry_date(&self, plant_id: i32, entry_type: &str) -> Option<chrono::NaiveDate> {
        self.entries
            .iter()
            .filter(|e| e.plant_id == plant_id && e.entry_type == entry_type)
            .map(|e| e.entry_date)
            .max()
    }
}

fn apply(plant: &mut Plant, update: &NewPlant) {
    plant.name = update.name.clone();
    plant.species = update.species;
    plant.health = update.health;
    plant.growth_stage = update.growth_stage;
    plant.planting_date = update.planting_date;
    plant.image_path = update.image_path.clone();
    plant.notes = update.notes.clone();
    plant.is_cross = update.is_cross;
    plant.generation = update.stored_generation().map(str::to_string);
}

#[async_trait]
impl PlantRepository for MemoryRepository {
    async fn list_plants(&self) -> Result<Vec<Plant>, DbError> {
        Ok(self.lock().live_plants())
    }

    async fn list_plants_with_care_dates(&self) -> Result<Vec<PlantSummary>, DbError> {
        let state = self.lock();
        Ok(state
            .live_plants()
            .into_iter()
            .map(|plant| PlantSummary {
                last_watered: state.last_entry_date(plant.id, ENTRY_TYPE_WATERING),
                last_fertilized: state.last_entry_date(plant.id, ENTRY_TYPE_FERTILIZING),
                plant,
            })
            .collect())
    }

    async fn get_plant(&self, id: i32) -> Result<Plant, DbError> {
        self.lock()
            .plants
            .iter()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn create_plant(&self, new: &NewPlant) -> Result<Plant, DbError> {
        let mut state = self.lock();
        state.last_plant_id += 1;
        let now = Utc::now();
        let mut plant = Plant {
            id: state.last_plant_id,
            name: String::new(),
            species: new.species,
            health: new.health,
            growth_stage: new.growth_stage,
            planting_date: new.planting_date,
            image_path: None,
            notes: String::new(),
            is_cross: false,
            generation: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        apply(&mut plant, new);
        state.plants.push(plant.clone());
        Ok(plant)
    }

    async fn update_plant(&self, id: i32, update: &NewPlant) -> Result<Plant, DbError> {
        let mut state = self.lock();
        let plant = state.live_plant_mut(id).ok_or(DbError::NotFound)?;
        apply(plant, update);
        plant.updated_at = Utc::now();
        Ok(plant.clone())
    }

    async fn soft_delete_plant(&self, id: i32) -> Result<(), DbError> {
        let mut state = self.lock();
        let plant = state.live_plant_mut(id).ok_or(DbError::NotFound)?;
        plant.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl JournalRepository for MemoryRepository {
    async fn list_entries(&self, plant_id: i32) -> Result<Vec<JournalEntry>, DbError> {
        let mut entries: Vec<JournalEntry> =
            self.lock().entries.iter().filter(|e| e.plant_id == plant_id).cloned().collect();
        entries.sort_by(|a, b| b.entry_date.cmp(&a.entry_date).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    async fn get_entry(&self, plant_id: i32, entry_id: i32) -> Result<JournalEntry, DbError> {
        self.lock()
            .entries
            .iter()
            .find(|e| e.id == entry_id && e.plant_id == plant_id)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn create_entry(&self, new: &NewJournalEntry) -> Result<JournalEntry, DbError> {
        let mut state = self.lock();
        // Mirrors the foreign key on journal_entries.plant_id.
        if !state.plants.iter().any(|p| p.id == new.plant_id) {
            return Err(DbError::NotFound);
        }
        state.last_entry_id += 1;
        let now = Utc::now();
        let entry = JournalEntry {
            id: state.last_entry_id,
            plant_id: new.plant_id,
            title: new.title.clone(),
            entry_type: new.entry_type.clone(),
            description: new.description.clone(),
            image_path: new.image_path.clone(),
            entry_date: new.entry_date,
            created_at: now,
            updated_at: now,
        };
        state.entries.push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(
        &self,
        plant_id: i32,
        entry_id: i32,
        update: &NewJournalEntry,
    ) -> Result<JournalEntry, DbError> {
        let mut state = self.lock();
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id && e.plant_id == plant_id)
            .ok_or(DbError::NotFound)?;
        entry.title = update.title.clone();
        entry.entry_type = update.entry_type.clone();
        entry.description = update.description.clone();
        if let Some(path) = &update.image_path {
            entry.image_path = Some(path.clone());
        }
        entry.entry_date = update.entry_date;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete_entry(&self, plant_id: i32, entry_id: i32) -> Result<JournalEntry, DbError> {
        let mut state = self.lock();
        let index = state
            .entries
            .iter()
            .position(|e| e.id == entry_id && e.plant_id == plant_id)
            .ok_or(DbError::NotFound)?;
        Ok(state.entries.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{GrowthStage, PlantHealth, Species};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_plant(name: &str) -> NewPlant {
        NewPlant {
            name: name.into(),
            species: Species::Chinense,
            health: PlantHealth::Good,
            growth_stage: GrowthStage::Seedling,
            planting_date: date(2024, 3, 1),
            image_path: None,
            notes: String::new(),
            is_cross: false,
            generation: None,
        }
    }

    fn entry(plant_id: i32, entry_type: &str, entry_date: NaiveDate) -> NewJournalEntry {
        NewJournalEntry {
            plant_id,
            title: format!("{entry_type} day"),
            entry_type: entry_type.into(),
            description: String::new(),
            image_path: None,
            entry_date,
        }
    }

    #[tokio::test]
    async fn care_dates_follow_the_latest_matching_entry() {
        let repo = MemoryRepository::new();
        let plant = repo.create_plant(&new_plant("Habanero")).await.unwrap();

        let summary = &repo.list_plants_with_care_dates().await.unwrap()[0];
        assert_eq!(summary.last_watered, None);
        assert_eq!(summary.last_fertilized, None);

        repo.create_entry(&entry(plant.id, "Watering", date(2024, 4, 2))).await.unwrap();
        repo.create_entry(&entry(plant.id, "Watering", date(2024, 4, 9))).await.unwrap();
        repo.create_entry(&entry(plant.id, "Watering", date(2024, 4, 5))).await.unwrap();
        repo.create_entry(&entry(plant.id, "Note", date(2024, 5, 1))).await.unwrap();

        let summary = &repo.list_plants_with_care_dates().await.unwrap()[0];
        assert_eq!(summary.last_watered, Some(date(2024, 4, 9)));
        assert_eq!(summary.last_fertilized, None);
    }

    #[tokio::test]
    async fn soft_deleted_plants_keep_their_entries() {
        let repo = MemoryRepository::new();
        let plant = repo.create_plant(&new_plant("Bishop's Crown")).await.unwrap();
        let note = repo.create_entry(&entry(plant.id, "Note", date(2024, 4, 2))).await.unwrap();

        repo.soft_delete_plant(plant.id).await.unwrap();

        assert!(matches!(repo.get_plant(plant.id).await, Err(DbError::NotFound)));
        assert!(repo.list_plants().await.unwrap().is_empty());
        assert!(matches!(repo.soft_delete_plant(plant.id).await, Err(DbError::NotFound)));
        assert_eq!(repo.get_entry(plant.id, note.id).await.unwrap(), note);
    }

    #[tokio::test]
    async fn entry_update_keeps_image_without_new_upload() {
        let repo = MemoryRepository::new();
        let plant = repo.create_plant(&new_plant("Aji Charapita")).await.unwrap();
        let mut new = entry(plant.id, "Note", date(2024, 4, 2));
        new.image_path = Some("/uploads/journal/leaf.jpg".into());
        let created = repo.create_entry(&new).await.unwrap();

        new.image_path = None;
        new.title = "Leaf curl".into();
        let updated = repo.update_entry(plant.id, created.id, &new).await.unwrap();

        assert_eq!(updated.title, "Leaf curl");
        assert_eq!(updated.image_path.as_deref(), Some("/uploads/journal/leaf.jpg"));
    }

    #[tokio::test]
    async fn entries_are_scoped_by_plant() {
        let repo = MemoryRepository::new();
        let first = repo.create_plant(&new_plant("One")).await.unwrap();
        let second = repo.create_plant(&new_plant("Two")).await.unwrap();
        let note = repo.create_entry(&entry(first.id, "Note", date(2024, 4, 2))).await.unwrap();

        assert!(matches!(repo.get_entry(second.id, note.id).await, Err(DbError::NotFound)));
        assert!(matches!(repo.delete_entry(second.id, note.id).await, Err(DbError::NotFound)));
        assert_eq!(repo.delete_entry(first.id, note.id).await.unwrap().id, note.id);
        assert!(repo.list_entries(first.id).await.unwrap().is_empty());
    }
}
