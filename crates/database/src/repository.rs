use crate::DbError;
use async_trait::async_trait;
use core_types::{
    JournalEntry, NewJournalEntry, NewPlant, Plant, PlantSummary, ENTRY_TYPE_FERTILIZING,
    ENTRY_TYPE_WATERING,
};
use sqlx::postgres::PgPool;

/// Data access for plants. Soft-deleted plants are invisible to every method.
#[async_trait]
pub trait PlantRepository: Send + Sync {
    /// Live plants, newest first.
    async fn list_plants(&self) -> Result<Vec<Plant>, DbError>;

    /// Live plants, newest first, with their last watering / fertilizing dates.
    async fn list_plants_with_care_dates(&self) -> Result<Vec<PlantSummary>, DbError>;

    async fn get_plant(&self, id: i32) -> Result<Plant, DbError>;

    /// Inserts a plant and returns it with its generated id and timestamps.
    async fn create_plant(&self, plant: &NewPlant) -> Result<Plant, DbError>;

    /// Overwrites every editable field. `DbError::NotFound` if no live plant has `id`.
    async fn update_plant(&self, id: i32, plant: &NewPlant) -> Result<Plant, DbError>;

    /// Marks the plant deleted. Its journal entries are left untouched.
    async fn soft_delete_plant(&self, id: i32) -> Result<(), DbError>;
}

/// Data access for journal entries. Every single-entry operation is scoped by
/// both the plant id and the entry id.
#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// A plant's entries, most recent `entry_date` first.
    async fn list_entries(&self, plant_id: i32) -> Result<Vec<JournalEntry>, DbError>;

    async fn get_entry(&self, plant_id: i32, entry_id: i32) -> Result<JournalEntry, DbError>;

    async fn create_entry(&self, entry: &NewJournalEntry) -> Result<JournalEntry, DbError>;

    /// Updates the entry. A `None` image path keeps the existing image.
    async fn update_entry(
        &self,
        plant_id: i32,
        entry_id: i32,
        entry: &NewJournalEntry,
    ) -> Result<JournalEntry, DbError>;

    /// Removes the entry permanently and returns the deleted row.
    async fn delete_entry(&self, plant_id: i32, entry_id: i32) -> Result<JournalEntry, DbError>;
}

/// The `DbRepository` provides the Postgres implementation of the repository
/// traits. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

macro_rules! plant_columns {
    () => {
        "id, name, species, health, growth_stage, planting_date, image_path, notes, \
         is_cross, generation, deleted_at, created_at, updated_at"
    };
}

macro_rules! entry_columns {
    () => {
        "id, plant_id, title, entry_type, description, image_path, entry_date, created_at, updated_at"
    };
}

#[async_trait]
impl PlantRepository for DbRepository {
    async fn list_plants(&self) -> Result<Vec<Plant>, DbError> {
        let plants = sqlx::query_as::<_, Plant>(concat!(
            "SELECT ",
            plant_columns!(),
            " FROM plants WHERE deleted_at IS NULL ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(plants)
    }

    async fn list_plants_with_care_dates(&self) -> Result<Vec<PlantSummary>, DbError> {
        let plants = sqlx::query_as::<_, PlantSummary>(
            r#"
            SELECT
                p.id, p.name, p.species, p.health, p.growth_stage, p.planting_date,
                p.image_path, p.notes, p.is_cross, p.generation, p.deleted_at,
                p.created_at, p.updated_at,
                (SELECT MAX(j.entry_date) FROM journal_entries AS j
                  WHERE j.plant_id = p.id AND j.entry_type = $1) AS last_watered,
                (SELECT MAX(j.entry_date) FROM journal_entries AS j
                  WHERE j.plant_id = p.id AND j.entry_type = $2) AS last_fertilized
            FROM plants AS p
            WHERE p.deleted_at IS NULL
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .bind(ENTRY_TYPE_WATERING)
        .bind(ENTRY_TYPE_FERTILIZING)
        .fetch_all(&self.pool)
        .await?;
        Ok(plants)
    }

    async fn get_plant(&self, id: i32) -> Result<Plant, DbError> {
        sqlx::query_as::<_, Plant>(concat!(
            "SELECT ",
            plant_columns!(),
            " FROM plants WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn create_plant(&self, plant: &NewPlant) -> Result<Plant, DbError> {
        let created = sqlx::query_as::<_, Plant>(concat!(
            r#"
            INSERT INTO plants (
                name, species, health, growth_stage, planting_date,
                image_path, notes, is_cross, generation
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING "#,
            plant_columns!()
        ))
        .bind(&plant.name)
        .bind(plant.species.as_str())
        .bind(plant.health.as_str())
        .bind(plant.growth_stage.as_str())
        .bind(plant.planting_date)
        .bind(plant.image_path.as_deref())
        .bind(&plant.notes)
        .bind(plant.is_cross)
        .bind(plant.stored_generation())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(plant_id = created.id, "Plant created.");
        Ok(created)
    }

    async fn update_plant(&self, id: i32, plant: &NewPlant) -> Result<Plant, DbError> {
        sqlx::query_as::<_, Plant>(concat!(
            r#"
            UPDATE plants
            SET name = $1, species = $2, health = $3, growth_stage = $4,
                planting_date = $5, image_path = $6, notes = $7,
                is_cross = $8, generation = $9, updated_at = NOW()
            WHERE id = $10 AND deleted_at IS NULL
            RETURNING "#,
            plant_columns!()
        ))
        .bind(&plant.name)
        .bind(plant.species.as_str())
        .bind(plant.health.as_str())
        .bind(plant.growth_stage.as_str())
        .bind(plant.planting_date)
        .bind(plant.image_path.as_deref())
        .bind(&plant.notes)
        .bind(plant.is_cross)
        .bind(plant.stored_generation())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn soft_delete_plant(&self, id: i32) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE plants SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl JournalRepository for DbRepository {
    async fn list_entries(&self, plant_id: i32) -> Result<Vec<JournalEntry>, DbError> {
        let entries = sqlx::query_as::<_, JournalEntry>(concat!(
            "SELECT ",
            entry_columns!(),
            " FROM journal_entries WHERE plant_id = $1 ORDER BY entry_date DESC, id DESC"
        ))
        .bind(plant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn get_entry(&self, plant_id: i32, entry_id: i32) -> Result<JournalEntry, DbError> {
        sqlx::query_as::<_, JournalEntry>(concat!(
            "SELECT ",
            entry_columns!(),
            " FROM journal_entries WHERE id = $1 AND plant_id = $2"
        ))
        .bind(entry_id)
        .bind(plant_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn create_entry(&self, entry: &NewJournalEntry) -> Result<JournalEntry, DbError> {
        let created = sqlx::query_as::<_, JournalEntry>(concat!(
            r#"
            INSERT INTO journal_entries (
                plant_id, title, entry_type, description, image_path, entry_date
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING "#,
            entry_columns!()
        ))
        .bind(entry.plant_id)
        .bind(&entry.title)
        .bind(&entry.entry_type)
        .bind(&entry.description)
        .bind(entry.image_path.as_deref())
        .bind(entry.entry_date)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(plant_id = created.plant_id, entry_id = created.id, "Journal entry created.");
        Ok(created)
    }

    async fn update_entry(
        &self,
        plant_id: i32,
        entry_id: i32,
        entry: &NewJournalEntry,
    ) -> Result<JournalEntry, DbError> {
        sqlx::query_as::<_, JournalEntry>(concat!(
            r#"
            UPDATE journal_entries
            SET title = $1, entry_type = $2, description = $3,
                image_path = COALESCE($4, image_path),
                entry_date = $5, updated_at = NOW()
            WHERE id = $6 AND plant_id = $7
            RETURNING "#,
            entry_columns!()
        ))
        .bind(&entry.title)
        .bind(&entry.entry_type)
        .bind(&entry.description)
        .bind(entry.image_path.as_deref())
        .bind(entry.entry_date)
        .bind(entry_id)
        .bind(plant_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn delete_entry(&self, plant_id: i32, entry_id: i32) -> Result<JournalEntry, DbError> {
        sqlx::query_as::<_, JournalEntry>(concat!(
            "DELETE FROM journal_entries WHERE id = $1 AND plant_id = $2 RETURNING ",
            entry_columns!()
        ))
        .bind(entry_id)
        .bind(plant_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }
}
