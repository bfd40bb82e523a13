pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{GrowthStage, PlantHealth, Species};
pub use error::{parse_form_date, CoreError};
pub use structs::{
    JournalEntry, NewJournalEntry, NewPlant, Plant, PlantSummary, ENTRY_TYPE_FERTILIZING,
    ENTRY_TYPE_WATERING, SUGGESTED_ENTRY_TYPES,
};
