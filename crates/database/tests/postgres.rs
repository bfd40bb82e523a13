//! Repository tests against a real Postgres instance.
//!
//! `sqlx::test` creates a fresh database per test from `DATABASE_URL` and
//! applies the migrations, so these are ignored by default:
//!
//! ```text
//! DATABASE_URL=postgres://... cargo test -p database -- --ignored
//! ```

use chrono::NaiveDate;
use core_types::{GrowthStage, NewJournalEntry, NewPlant, PlantHealth, Species};
use database::{DbError, DbRepository, JournalRepository, PlantRepository};
use sqlx::PgPool;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn habanero() -> NewPlant {
    NewPlant {
        name: "Habanero".into(),
        species: Species::Chinense,
        health: PlantHealth::Good,
        growth_stage: GrowthStage::Seedling,
        planting_date: date(2024, 3, 1),
        image_path: None,
        notes: "South window".into(),
        is_cross: false,
        generation: None,
    }
}

fn entry(plant_id: i32, entry_type: &str, entry_date: NaiveDate) -> NewJournalEntry {
    NewJournalEntry {
        plant_id,
        title: entry_type.to_string(),
        entry_type: entry_type.to_string(),
        description: String::new(),
        image_path: None,
        entry_date,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_then_get_round_trips(pool: PgPool) {
    let repo = DbRepository::new(pool);

    let created = repo.create_plant(&habanero()).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = repo.get_plant(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "Habanero");
    assert_eq!(fetched.species, Species::Chinense);
    assert_eq!(fetched.notes, "South window");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn generation_is_only_stored_for_crosses(pool: PgPool) {
    let repo = DbRepository::new(pool);

    let plain = NewPlant { generation: Some("F3".into()), ..habanero() };
    assert_eq!(repo.create_plant(&plain).await.unwrap().generation, None);

    let cross = NewPlant { is_cross: true, generation: Some("F3".into()), ..habanero() };
    assert_eq!(repo.create_plant(&cross).await.unwrap().generation.as_deref(), Some("F3"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn updating_a_missing_plant_is_not_found(pool: PgPool) {
    let repo = DbRepository::new(pool);

    let err = repo.update_plant(4242, &habanero()).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound));
    assert!(repo.list_plants().await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn update_bumps_updated_at(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let created = repo.create_plant(&habanero()).await.unwrap();

    let change = NewPlant { health: PlantHealth::Excellent, growth_stage: GrowthStage::Flowering, ..habanero() };
    let updated = repo.update_plant(created.id, &change).await.unwrap();

    assert_eq!(updated.health, PlantHealth::Excellent);
    assert_eq!(updated.growth_stage, GrowthStage::Flowering);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn care_dates_are_derived_from_the_journal(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let plant = repo.create_plant(&habanero()).await.unwrap();

    let summaries = repo.list_plants_with_care_dates().await.unwrap();
    assert_eq!(summaries[0].last_watered, None);
    assert_eq!(summaries[0].last_fertilized, None);

    repo.create_entry(&entry(plant.id, "Watering", date(2024, 4, 1))).await.unwrap();
    repo.create_entry(&entry(plant.id, "Watering", date(2024, 4, 8))).await.unwrap();
    repo.create_entry(&entry(plant.id, "Fertilizing", date(2024, 4, 3))).await.unwrap();
    repo.create_entry(&entry(plant.id, "Pruning", date(2024, 5, 1))).await.unwrap();

    let summaries = repo.list_plants_with_care_dates().await.unwrap();
    assert_eq!(summaries[0].plant.id, plant.id);
    assert_eq!(summaries[0].last_watered, Some(date(2024, 4, 8)));
    assert_eq!(summaries[0].last_fertilized, Some(date(2024, 4, 3)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn soft_delete_hides_plant_but_not_its_entries(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let plant = repo.create_plant(&habanero()).await.unwrap();
    let note = repo.create_entry(&entry(plant.id, "Note", date(2024, 4, 1))).await.unwrap();

    repo.soft_delete_plant(plant.id).await.unwrap();

    assert!(matches!(repo.get_plant(plant.id).await, Err(DbError::NotFound)));
    assert!(repo.list_plants().await.unwrap().is_empty());
    assert!(repo.list_plants_with_care_dates().await.unwrap().is_empty());
    assert!(matches!(repo.soft_delete_plant(plant.id).await, Err(DbError::NotFound)));
    assert_eq!(repo.get_entry(plant.id, note.id).await.unwrap(), note);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn journal_entries_are_scoped_and_ordered(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let first = repo.create_plant(&habanero()).await.unwrap();
    let second = repo.create_plant(&habanero()).await.unwrap();

    let older = repo.create_entry(&entry(first.id, "Note", date(2024, 4, 1))).await.unwrap();
    let newer = repo.create_entry(&entry(first.id, "Note", date(2024, 6, 1))).await.unwrap();

    let listed: Vec<i32> = repo.list_entries(first.id).await.unwrap().iter().map(|e| e.id).collect();
    assert_eq!(listed, vec![newer.id, older.id]);

    assert!(matches!(repo.get_entry(second.id, older.id).await, Err(DbError::NotFound)));
    assert!(matches!(repo.delete_entry(second.id, older.id).await, Err(DbError::NotFound)));

    let deleted = repo.delete_entry(first.id, older.id).await.unwrap();
    assert_eq!(deleted.id, older.id);
    assert_eq!(repo.list_entries(first.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn entry_update_falls_back_to_existing_image(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let plant = repo.create_plant(&habanero()).await.unwrap();

    let mut new = entry(plant.id, "Note", date(2024, 4, 1));
    new.image_path = Some("/uploads/journal/flower.jpg".into());
    let created = repo.create_entry(&new).await.unwrap();

    new.image_path = None;
    new.description = "First flower opened".into();
    let updated = repo.update_entry(plant.id, created.id, &new).await.unwrap();
    assert_eq!(updated.image_path.as_deref(), Some("/uploads/journal/flower.jpg"));
    assert_eq!(updated.description, "First flower opened");

    new.image_path = Some("/uploads/journal/pod.jpg".into());
    let replaced = repo.update_entry(plant.id, created.id, &new).await.unwrap();
    assert_eq!(replaced.image_path.as_deref(), Some("/uploads/journal/pod.jpg"));
}
