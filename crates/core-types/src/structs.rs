use crate::enums::{GrowthStage, PlantHealth, Species};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Journal entry type that feeds a plant's "last watered" date.
pub const ENTRY_TYPE_WATERING: &str = "Watering";
/// Journal entry type that feeds a plant's "last fertilized" date.
pub const ENTRY_TYPE_FERTILIZING: &str = "Fertilizing";

/// Entry types offered by the journal form. The column itself is free text.
pub const SUGGESTED_ENTRY_TYPES: [&str; 6] = [
    ENTRY_TYPE_WATERING,
    ENTRY_TYPE_FERTILIZING,
    "Pruning",
    "Repotting",
    "Harvest",
    "Note",
];

/// A row from the `plants` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Plant {
    pub id: i32,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub species: Species,
    #[sqlx(try_from = "String")]
    pub health: PlantHealth,
    #[sqlx(try_from = "String")]
    pub growth_stage: GrowthStage,
    pub planting_date: NaiveDate,
    pub image_path: Option<String>,
    pub notes: String,
    pub is_cross: bool,
    /// Only ever set when `is_cross` is true.
    pub generation: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A plant together with the care dates derived from its journal.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PlantSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub plant: Plant,
    pub last_watered: Option<NaiveDate>,
    pub last_fertilized: Option<NaiveDate>,
}

/// The user-editable fields of a plant, used for both inserts and updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlant {
    pub name: String,
    pub species: Species,
    pub health: PlantHealth,
    pub growth_stage: GrowthStage,
    pub planting_date: NaiveDate,
    pub image_path: Option<String>,
    pub notes: String,
    pub is_cross: bool,
    pub generation: Option<String>,
}

impl NewPlant {
    /// The generation label as it should be persisted: dropped unless the plant
    /// is a cross, and treated as absent when blank.
    pub fn stored_generation(&self) -> Option<&str> {
        if !self.is_cross {
            return None;
        }
        self.generation.as_deref().map(str::trim).filter(|g| !g.is_empty())
    }
}

impl From<&Plant> for NewPlant {
    fn from(plant: &Plant) -> Self {
        Self {
            name: plant.name.clone(),
            species: plant.species,
            health: plant.health,
            growth_stage: plant.growth_stage,
            planting_date: plant.planting_date,
            image_path: plant.image_path.clone(),
            notes: plant.notes.clone(),
            is_cross: plant.is_cross,
            generation: plant.generation.clone(),
        }
    }
}

/// A row from the `journal_entries` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i32,
    pub plant_id: i32,
    pub title: String,
    pub entry_type: String,
    pub description: String,
    pub image_path: Option<String>,
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user-editable fields of a journal entry.
///
/// On update, an `image_path` of `None` keeps whatever image the entry already has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub plant_id: i32,
    pub title: String,
    pub entry_type: String,
    pub description: String,
    pub image_path: Option<String>,
    pub entry_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habanero() -> NewPlant {
        NewPlant {
            name: "Habanero".into(),
            species: Species::Chinense,
            health: PlantHealth::Good,
            growth_stage: GrowthStage::Seedling,
            planting_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            image_path: None,
            notes: String::new(),
            is_cross: false,
            generation: None,
        }
    }

    #[test]
    fn generation_is_dropped_for_non_crosses() {
        let plant = NewPlant { generation: Some("F2".into()), ..habanero() };
        assert_eq!(plant.stored_generation(), None);
    }

    #[test]
    fn generation_is_kept_for_crosses() {
        let plant = NewPlant { is_cross: true, generation: Some(" F2 ".into()), ..habanero() };
        assert_eq!(plant.stored_generation(), Some("F2"));

        let blank = NewPlant { is_cross: true, generation: Some("  ".into()), ..habanero() };
        assert_eq!(blank.stored_generation(), None);
    }
}
