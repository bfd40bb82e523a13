use super::parse_id;
use crate::{error::AppError, form::FormData, storage::JOURNAL_CATEGORY, views, AppState};
use axum::{
    extract::{Path, State},
    response::Html,
};
use core_types::NewJournalEntry;
use maud::Markup;
use std::sync::Arc;

/// # GET /plants/:id/journal
pub async fn page(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    let plant_id = parse_id("id", &id)?;
    let plant = state.plants.get_plant(plant_id).await?;
    let entries = state.journal.list_entries(plant_id).await?;
    Ok(views::journal_page(&plant, &entries))
}

/// # POST /plants/:id/journal
pub async fn create(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<Markup, AppError> {
    let plant_id = parse_id("id", &id)?;
    // Entries are only added to live plants.
    state.plants.get_plant(plant_id).await?;

    let mut entry = entry_from_form(plant_id, &form)?;
    if let Some(upload) = form.image() {
        entry.image_path =
            Some(state.files.save(Some(JOURNAL_CATEGORY), &upload.file_name, &upload.bytes).await?);
    }

    let created = state.journal.create_entry(&entry).await?;
    tracing::info!(
        plant_id,
        entry_id = created.id,
        entry_type = %created.entry_type,
        "Created journal entry."
    );

    Ok(views::journal_entry(&created))
}

/// # GET /plants/:id/journal/:entryId/edit
pub async fn edit_form(
    Path((id, entry_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    let plant_id = parse_id("id", &id)?;
    let entry_id = parse_id("entryId", &entry_id)?;
    let entry = state.journal.get_entry(plant_id, entry_id).await?;
    Ok(views::edit_journal_entry_form(&entry))
}

/// # PUT /plants/:id/journal/:entryId
///
/// Without a new upload the entry keeps its image. A replaced image file is
/// removed once the row points at the new one.
pub async fn update(
    Path((id, entry_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<Markup, AppError> {
    let plant_id = parse_id("id", &id)?;
    let entry_id = parse_id("entryId", &entry_id)?;
    let existing = state.journal.get_entry(plant_id, entry_id).await?;

    let mut entry = entry_from_form(plant_id, &form)?;
    if let Some(upload) = form.image() {
        entry.image_path =
            Some(state.files.save(Some(JOURNAL_CATEGORY), &upload.file_name, &upload.bytes).await?);
    }

    let updated = state.journal.update_entry(plant_id, entry_id, &entry).await?;
    tracing::info!(plant_id, entry_id, "Updated journal entry.");

    if let Some(old) = existing.image_path.as_deref() {
        if updated.image_path.as_deref() != Some(old) {
            state.files.delete_logged(old).await;
        }
    }

    Ok(views::journal_entry(&updated))
}

/// # DELETE /plants/:id/journal/:entryId
pub async fn delete(
    Path((id, entry_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<&'static str>, AppError> {
    let plant_id = parse_id("id", &id)?;
    let entry_id = parse_id("entryId", &entry_id)?;

    let deleted = state.journal.delete_entry(plant_id, entry_id).await?;
    tracing::info!(plant_id, entry_id, "Deleted journal entry.");

    if let Some(image) = &deleted.image_path {
        state.files.delete_logged(image).await;
    }

    Ok(Html(""))
}

fn entry_from_form(plant_id: i32, form: &FormData) -> Result<NewJournalEntry, AppError> {
    Ok(NewJournalEntry {
        plant_id,
        title: form.required("title")?,
        entry_type: form.required("entry_type")?,
        description: form.text("description").to_string(),
        image_path: None,
        entry_date: form.date("entry_date")?,
    })
}
